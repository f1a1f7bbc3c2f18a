//! Error types for building and querying paper indexes.
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::vector::{VectorError, VectorId};

/// Main error type for indexing and search operations
#[derive(Error, Debug)]
pub enum IndexError {
    /// Input records do not match the expected shape
    #[error("Invalid record data: {reason}")]
    Schema { reason: String },

    #[error("Vector dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Document {id} not found: the store holds {len} documents")]
    NotFound { id: VectorId, len: usize },

    #[error("Index appears to be corrupted: {reason}")]
    CorruptIndex { reason: String },

    #[error("Index file '{path}' is missing")]
    MissingFile { path: PathBuf },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The embedding provider failed or broke its output contract
    #[error("Embedding provider failed: {reason}")]
    ProviderFailure { reason: String },

    #[error("The index contains no documents")]
    EmptyIndex,

    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("Failed to serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },
}

impl IndexError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::CorruptIndex { .. } => "CORRUPT_INDEX",
            Self::MissingFile { .. } => "MISSING_FILE",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::ProviderFailure { .. } => "PROVIDER_FAILURE",
            Self::EmptyIndex => "EMPTY_INDEX",
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization { .. } => "SERIALIZATION_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
        }
    }

    /// Error report for callers that asked for JSON output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.status_code(),
                "message": self.to_string(),
                "suggestions": self.recovery_suggestions(),
            }
        })
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Schema { .. } => vec![
                "The input must be a JSON object with a 'top_papers' list",
                "Each paper needs title, summary, year, authors and technique_type",
            ],
            Self::DimensionMismatch { .. } => vec![
                "The embedding model changed since the index was built",
                "Run 'paperdex index' again with the current model",
            ],
            Self::CorruptIndex { .. } => vec![
                "Run 'paperdex index' to rebuild from the record file",
                "Check for disk errors or filesystem corruption",
            ],
            Self::MissingFile { .. } => vec![
                "Build the index first with 'paperdex index <records.json>'",
                "Check that --index points at the directory the index was written to",
            ],
            Self::EmptyIndex => vec!["Index a record file that contains at least one valid paper"],
            Self::ProviderFailure { .. } => vec![
                "Ensure you have internet connection for the first model download",
                "Check the embedding.model setting with 'paperdex config'",
            ],
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            Self::FileWrite { .. } | Self::Io(_) => {
                vec!["Check disk space and permissions in the index directory"]
            }
            Self::ConfigError { .. } => vec![
                "Run 'paperdex init --force' to regenerate the settings file",
                "Check PAPERDEX_ environment variables for typos",
            ],
            _ => vec![],
        }
    }
}

impl From<VectorError> for IndexError {
    fn from(error: VectorError) -> Self {
        match error {
            VectorError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            VectorError::EmptyIndex => Self::EmptyIndex,
            VectorError::InvalidK(k) => Self::InvalidArgument {
                reason: format!("top_k must be at least 1, got {k}"),
            },
            VectorError::InvalidDimension { dimension, reason } => Self::ProviderFailure {
                reason: format!("embedding dimension {dimension}: {reason}"),
            },
            VectorError::IdExhausted(count) => Self::InvalidArgument {
                reason: format!("{count} documents exceed the index id range"),
            },
            VectorError::Storage(source) => Self::Io(source),
            VectorError::EmbeddingFailed(reason) => Self::ProviderFailure { reason },
            VectorError::InvalidFormat(reason) => Self::CorruptIndex { reason },
            VectorError::VersionMismatch { expected, actual } => Self::CorruptIndex {
                reason: format!("vector file version {actual}, expected {expected}"),
            },
        }
    }
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;
