//! Manifest describing how an index was built.
//!
//! The manifest records the embedding model, dimension and document count
//! so a loader can cross-check the other two files and warn when the
//! configured model differs from the one the index was built with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IndexError, IndexResult};

/// Current UTC time as seconds since the Unix epoch.
pub fn get_utc_timestamp() -> u64 {
    // Use chrono for accurate cross-platform timestamp
    Utc::now().timestamp() as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexManifest {
    /// Embedding model identifier used at build time
    pub model: String,

    pub dimension: usize,

    pub document_count: usize,

    /// Unix timestamp of the build
    pub built_at: u64,

    /// Version of the on-disk layout
    pub format_version: u32,
}

impl IndexManifest {
    /// Current manifest version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a manifest stamped with the current time
    pub fn new(model: impl Into<String>, dimension: usize, document_count: usize) -> Self {
        Self {
            model: model.into(),
            dimension,
            document_count,
            built_at: get_utc_timestamp(),
            format_version: Self::CURRENT_VERSION,
        }
    }

    /// Build time formatted as RFC 3339, e.g. `2025-01-05T10:00:00+00:00`.
    pub fn built_at_display(&self) -> String {
        i64::try_from(self.built_at)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|time| time.to_rfc3339())
            .unwrap_or_else(|| self.built_at.to_string())
    }

    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            IndexError::Serialization {
                what: "index manifest",
                source,
            }
        })?;

        std::fs::write(path, json).map_err(|source| IndexError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the manifest at `path`, or `None` if there is none.
    pub fn load(path: &Path) -> IndexResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(path).map_err(|source| IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest: Self = serde_json::from_str(&json).map_err(|e| IndexError::CorruptIndex {
            reason: format!("{} is not a valid manifest: {e}", path.display()),
        })?;

        // Check version compatibility
        if manifest.format_version > Self::CURRENT_VERSION {
            return Err(IndexError::CorruptIndex {
                reason: format!(
                    "manifest version {} is newer than supported version {}",
                    manifest.format_version,
                    Self::CURRENT_VERSION
                ),
            });
        }

        Ok(Some(manifest))
    }
}
