//! Atomic save and checked load of an index directory.
//!
//! An index directory contains:
//! - `papers.index`: the flat vector set
//! - `metadata.json`: the document store
//! - `manifest.json`: build information (optional on load)
//!
//! Saving writes all files into a staging directory next to the target and
//! then swaps it into place with renames, so readers never observe a
//! directory holding files from two different builds.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{IndexError, IndexResult};
use crate::storage::{DocumentStore, IndexManifest};
use crate::vector::{FlatIndex, VectorDimension, VectorError, VectorIndex, read_vector_header};

pub const INDEX_FILE: &str = "papers.index";
pub const METADATA_FILE: &str = "metadata.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const STAGING_PREFIX: &str = ".paperdex-staging-";

/// Everything read back from an index directory.
#[derive(Debug)]
pub struct LoadedIndex {
    pub index: FlatIndex,
    pub documents: DocumentStore,
    pub manifest: Option<IndexManifest>,
}

/// Summary of an index directory, without loading a model.
#[derive(Debug, Clone, Serialize)]
pub struct IndexInfo {
    pub path: PathBuf,
    pub documents: usize,
    pub dimension: usize,
    pub model: Option<String>,
    pub built_at: Option<String>,
}

/// Manages persistence of an index directory
#[derive(Debug, Clone)]
pub struct IndexPersistence {
    base_path: PathBuf,
}

impl IndexPersistence {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn index_path(&self) -> PathBuf {
        self.base_path.join(INDEX_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.base_path.join(METADATA_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.base_path.join(MANIFEST_FILE)
    }

    /// Check if both required files exist
    pub fn exists(&self) -> bool {
        self.index_path().exists() && self.metadata_path().exists()
    }

    /// Write the index, documents and manifest as one unit.
    ///
    /// A previous index at the same location is replaced only after the new
    /// one is fully written. If the process dies between the two renames the
    /// old index survives as a `.old` sibling and the build has to be redone.
    ///
    /// An existing target is only replaced when it holds nothing but index
    /// files; otherwise the save fails with `InvalidArgument` and the
    /// directory is left as it was.
    #[must_use = "Save errors should be handled to ensure data is persisted"]
    pub fn save(
        &self,
        index: &dyn VectorIndex,
        documents: &DocumentStore,
        manifest: &IndexManifest,
    ) -> IndexResult<()> {
        if index.len() != documents.len() {
            return Err(IndexError::CorruptIndex {
                reason: format!(
                    "refusing to save {} vectors with {} documents",
                    index.len(),
                    documents.len()
                ),
            });
        }

        let target = &self.base_path;
        let name = target
            .file_name()
            .ok_or_else(|| IndexError::InvalidArgument {
                reason: format!("'{}' is not a usable index directory", target.display()),
            })?
            .to_os_string();
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        std::fs::create_dir_all(&parent).map_err(|source| IndexError::FileWrite {
            path: parent.clone(),
            source,
        })?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&parent)
            .map_err(|source| IndexError::FileWrite {
                path: parent.clone(),
                source,
            })?;
        tracing::debug!("staging index in {}", staging.path().display());

        let staged_index = staging.path().join(INDEX_FILE);
        index
            .save(&staged_index)
            .map_err(|e| write_error(&staged_index, e))?;
        documents.save(&staging.path().join(METADATA_FILE))?;
        manifest.save(&staging.path().join(MANIFEST_FILE))?;

        // From here on the staging directory must outlive the TempDir guard
        let staged = staging.keep();

        let mut backup_name = name;
        backup_name.push(".old");
        let backup = parent.join(backup_name);

        let had_previous = target.exists();
        if had_previous {
            if let Err(e) = ensure_replaceable(target).and_then(|()| ensure_replaceable(&backup)) {
                let _ = std::fs::remove_dir_all(&staged);
                return Err(e);
            }
            if backup.exists() {
                std::fs::remove_dir_all(&backup).map_err(|source| IndexError::FileWrite {
                    path: backup.clone(),
                    source,
                })?;
            }
            if let Err(source) = std::fs::rename(target, &backup) {
                let _ = std::fs::remove_dir_all(&staged);
                return Err(IndexError::FileWrite {
                    path: target.clone(),
                    source,
                });
            }
        }

        if let Err(source) = std::fs::rename(&staged, target) {
            if had_previous {
                let _ = std::fs::rename(&backup, target);
            }
            let _ = std::fs::remove_dir_all(&staged);
            return Err(IndexError::FileWrite {
                path: target.clone(),
                source,
            });
        }

        if had_previous {
            if let Err(e) = std::fs::remove_dir_all(&backup) {
                tracing::warn!(
                    "new index is in place but the previous one could not be removed from {}: {e}",
                    backup.display()
                );
            }
        }

        tracing::info!(
            "saved {} documents to {}",
            documents.len(),
            target.display()
        );
        Ok(())
    }

    /// Load and cross-check an index directory.
    ///
    /// `expected` is the dimension of the embedder that will query the
    /// index. Fails with `MissingFile` if a required file is absent and
    /// `CorruptIndex` if the files disagree about their contents.
    #[must_use = "Load errors should be handled appropriately"]
    pub fn load(&self, expected: VectorDimension) -> IndexResult<LoadedIndex> {
        let index_path = self.index_path();
        let metadata_path = self.metadata_path();
        require_file(&index_path)?;
        require_file(&metadata_path)?;

        let documents = DocumentStore::load(&metadata_path)?;
        let index = FlatIndex::load(&index_path, expected).map_err(|e| read_error(&index_path, e))?;
        let manifest = IndexManifest::load(&self.manifest_path())?;

        check_consistency(
            index.len(),
            index.dimension().get(),
            documents.len(),
            manifest.as_ref(),
        )?;

        tracing::debug!(
            "loaded {} documents of dimension {} from {}",
            documents.len(),
            index.dimension(),
            self.base_path.display()
        );

        Ok(LoadedIndex {
            index,
            documents,
            manifest,
        })
    }

    /// Describe the index without knowing which model will query it.
    pub fn info(&self) -> IndexResult<IndexInfo> {
        let index_path = self.index_path();
        let metadata_path = self.metadata_path();
        require_file(&index_path)?;
        require_file(&metadata_path)?;

        let header = read_vector_header(&index_path).map_err(|e| read_error(&index_path, e))?;
        let documents = DocumentStore::load(&metadata_path)?;
        let manifest = IndexManifest::load(&self.manifest_path())?;

        check_consistency(
            header.vector_count,
            header.dimension.get(),
            documents.len(),
            manifest.as_ref(),
        )?;

        Ok(IndexInfo {
            path: self.base_path.clone(),
            documents: documents.len(),
            dimension: header.dimension.get(),
            model: manifest.as_ref().map(|m| m.model.clone()),
            built_at: manifest.as_ref().map(IndexManifest::built_at_display),
        })
    }
}

/// A directory may be swapped out only if it holds nothing but index files.
///
/// Anything else in it (the records file, unrelated data) would be deleted
/// together with the previous index, so such a target is refused.
fn ensure_replaceable(dir: &Path) -> IndexResult<()> {
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() {
        return Err(IndexError::InvalidArgument {
            reason: format!("'{}' exists and is not a directory", dir.display()),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| IndexError::FileRead {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| IndexError::FileRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let known = [INDEX_FILE, METADATA_FILE, MANIFEST_FILE]
            .iter()
            .any(|file| name == *file);
        if !known || !entry.path().is_file() {
            return Err(IndexError::InvalidArgument {
                reason: format!(
                    "'{}' contains '{}', which is not part of an index; choose an empty or dedicated directory",
                    dir.display(),
                    name.to_string_lossy()
                ),
            });
        }
    }
    Ok(())
}

fn require_file(path: &Path) -> IndexResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(IndexError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

fn check_consistency(
    vectors: usize,
    dimension: usize,
    documents: usize,
    manifest: Option<&IndexManifest>,
) -> IndexResult<()> {
    if vectors != documents {
        return Err(IndexError::CorruptIndex {
            reason: format!("{METADATA_FILE} holds {documents} documents but {INDEX_FILE} holds {vectors} vectors"),
        });
    }

    if let Some(manifest) = manifest {
        if manifest.document_count != documents {
            return Err(IndexError::CorruptIndex {
                reason: format!(
                    "{MANIFEST_FILE} records {} documents but the index holds {documents}",
                    manifest.document_count
                ),
            });
        }
        if manifest.dimension != dimension {
            return Err(IndexError::CorruptIndex {
                reason: format!(
                    "{MANIFEST_FILE} records dimension {} but {INDEX_FILE} has {dimension}",
                    manifest.dimension
                ),
            });
        }
    }

    Ok(())
}

fn read_error(path: &Path, error: VectorError) -> IndexError {
    match error {
        VectorError::Storage(source) if source.kind() == std::io::ErrorKind::NotFound => {
            IndexError::MissingFile {
                path: path.to_path_buf(),
            }
        }
        VectorError::Storage(source) => IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    }
}

fn write_error(path: &Path, error: VectorError) -> IndexError {
    match error {
        VectorError::Storage(source) => IndexError::FileWrite {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    }
}
