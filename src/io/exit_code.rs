//! Process exit codes.
//!
//! Scripts that wrap `paperdex` can branch on these without parsing
//! stderr. `0` and `1` keep their usual meaning and everything from `3` up
//! names the kind of problem. `2` is left to clap, which uses it for
//! command-line usage errors.

use crate::error::IndexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    /// No index at the given location, or a file inside it is missing
    NotFound = 3,
    /// The records file does not have the expected shape
    ParseError = 4,
    IoError = 5,
    ConfigError = 6,
    /// Index files disagree with each other or with the query model
    IndexCorrupted = 7,
}

impl ExitCode {
    pub fn from_error(error: &IndexError) -> Self {
        match error {
            IndexError::NotFound { .. } | IndexError::MissingFile { .. } => Self::NotFound,
            IndexError::Schema { .. } => Self::ParseError,
            IndexError::FileRead { .. } | IndexError::FileWrite { .. } | IndexError::Io(_) => {
                Self::IoError
            }
            IndexError::ConfigError { .. } => Self::ConfigError,
            // an index built with another model cannot be queried either
            IndexError::CorruptIndex { .. } | IndexError::DimensionMismatch { .. } => {
                Self::IndexCorrupted
            }
            IndexError::InvalidArgument { .. }
            | IndexError::ProviderFailure { .. }
            | IndexError::EmptyIndex
            | IndexError::Serialization { .. } => Self::GeneralError,
        }
    }

    /// Short label for logs.
    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::GeneralError => "error",
            Self::NotFound => "index not found",
            Self::ParseError => "invalid records file",
            Self::IoError => "I/O error",
            Self::ConfigError => "configuration error",
            Self::IndexCorrupted => "index unusable",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        i32::from(code as u8)
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_codes_are_stable() {
        let codes = [
            (ExitCode::Success, 0),
            (ExitCode::GeneralError, 1),
            (ExitCode::NotFound, 3),
            (ExitCode::ParseError, 4),
            (ExitCode::IoError, 5),
            (ExitCode::ConfigError, 6),
            (ExitCode::IndexCorrupted, 7),
        ];
        for (code, value) in codes {
            assert_eq!(i32::from(code), value, "{}", code.description());
        }
    }

    #[test]
    fn test_error_mapping() {
        let missing = IndexError::MissingFile {
            path: PathBuf::from("index/metadata.json"),
        };
        assert_eq!(ExitCode::from_error(&missing), ExitCode::NotFound);

        let corrupt = IndexError::CorruptIndex {
            reason: "3 documents but 2 vectors".to_string(),
        };
        assert_eq!(ExitCode::from_error(&corrupt), ExitCode::IndexCorrupted);

        let wrong_model = IndexError::DimensionMismatch {
            expected: 384,
            actual: 1024,
        };
        assert_eq!(ExitCode::from_error(&wrong_model), ExitCode::IndexCorrupted);

        let schema = IndexError::Schema {
            reason: "all entries failed".to_string(),
        };
        assert_eq!(ExitCode::from_error(&schema), ExitCode::ParseError);

        assert_eq!(
            ExitCode::from_error(&IndexError::EmptyIndex),
            ExitCode::GeneralError
        );
    }
}
