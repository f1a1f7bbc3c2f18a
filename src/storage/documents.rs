//! Document store kept in lockstep with the vector index.
//!
//! Position `i` holds the rendering that was embedded as vector `i` and the
//! record it was rendered from.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IndexError, IndexResult};
use crate::types::Record;
use crate::vector::VectorId;

/// Parallel arrays of rendered documents and their source records.
///
/// Serializes as `{"documents": [...], "metadata": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStore {
    documents: Vec<String>,
    metadata: Vec<Record>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document and returns the id it now occupies.
    pub fn append(&mut self, rendering: String, record: Record) -> IndexResult<VectorId> {
        let position = self.documents.len();
        let id = VectorId::from_position(position).ok_or_else(|| IndexError::InvalidArgument {
            reason: format!("{position} documents exceed the index id range"),
        })?;

        self.documents.push(rendering);
        self.metadata.push(record);
        Ok(id)
    }

    /// Returns the rendering and record stored under `id`.
    pub fn get(&self, id: VectorId) -> IndexResult<(&str, &Record)> {
        let position = id.as_position();
        match (self.documents.get(position), self.metadata.get(position)) {
            (Some(document), Some(record)) => Ok((document.as_str(), record)),
            _ => Err(IndexError::NotFound {
                id,
                len: self.len(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.metadata
    }

    /// Writes the store as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            IndexError::Serialization {
                what: "document store",
                source,
            }
        })?;

        std::fs::write(path, json).map_err(|source| IndexError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a store written by [`DocumentStore::save`].
    ///
    /// A missing file is `MissingFile`; unparsable JSON or arrays of
    /// different lengths are `CorruptIndex`.
    pub fn load(path: &Path) -> IndexResult<Self> {
        if !path.exists() {
            return Err(IndexError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let json = std::fs::read_to_string(path).map_err(|source| IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let store: Self = serde_json::from_str(&json).map_err(|e| IndexError::CorruptIndex {
            reason: format!("{} is not a valid document store: {e}", path.display()),
        })?;

        if store.documents.len() != store.metadata.len() {
            return Err(IndexError::CorruptIndex {
                reason: format!(
                    "{} lists {} documents but {} metadata entries",
                    path.display(),
                    store.documents.len(),
                    store.metadata.len()
                ),
            });
        }

        Ok(store)
    }
}
