//! Building an index from records.
//!
//! The indexer renders every record, embeds all renderings in a single
//! provider call and fills the vector index and the document store in the
//! same order, so vector `i` and document `i` always describe record `i`.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::display::with_spinner;
use crate::error::{IndexError, IndexResult};
use crate::indexing::loader::{RecordFailure, load_records};
use crate::indexing::render::render_document;
use crate::storage::{DocumentStore, IndexManifest, IndexPersistence};
use crate::types::Record;
use crate::vector::{EmbeddingGenerator, FlatIndex, VectorIndex, embed_checked};

/// Statistics for one build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildStats {
    pub documents: usize,
    pub dimension: usize,
    /// Time spent rendering, embedding and filling the index
    pub duration: Duration,
}

/// Outcome of [`Indexer::index_file`].
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub stats: BuildStats,
    /// Input entries that were skipped
    pub failures: Vec<RecordFailure>,
}

/// Builds and persists an index with the embedder it was given.
pub struct Indexer {
    embedder: Arc<dyn EmbeddingGenerator>,
    index: FlatIndex,
    documents: DocumentStore,
    show_progress: bool,
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("model", &self.embedder.model_name())
            .field("documents", &self.documents.len())
            .finish()
    }
}

impl Indexer {
    pub fn new(embedder: Arc<dyn EmbeddingGenerator>) -> Self {
        let index = FlatIndex::new(embedder.dimension());
        Self {
            embedder,
            index,
            documents: DocumentStore::new(),
            show_progress: false,
        }
    }

    /// Show a spinner while the embedding batch runs.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Build the index from `records`, replacing anything built before.
    ///
    /// Build failures are fatal: on error the indexer keeps its previous
    /// contents untouched.
    pub fn build(&mut self, records: Vec<Record>) -> IndexResult<BuildStats> {
        let start = Instant::now();

        let renderings: Vec<String> = records.iter().map(render_document).collect();
        let texts: Vec<&str> = renderings.iter().map(String::as_str).collect();

        tracing::info!(
            "embedding {} documents with {}",
            texts.len(),
            self.embedder.model_name()
        );
        let message = format!("Embedding {} papers", texts.len());
        let embeddings = with_spinner(self.show_progress, &message, || {
            embed_checked(self.embedder.as_ref(), &texts)
        })?;

        let mut index = FlatIndex::new(self.embedder.dimension());
        let ids = index.add(&embeddings)?;

        let mut documents = DocumentStore::new();
        for (rendering, record) in renderings.into_iter().zip(records) {
            documents.append(rendering, record)?;
        }

        if ids.len() != documents.len() {
            return Err(IndexError::CorruptIndex {
                reason: format!(
                    "built {} vectors for {} documents",
                    ids.len(),
                    documents.len()
                ),
            });
        }
        tracing::debug!("added {} vectors", ids.len());

        self.index = index;
        self.documents = documents;

        Ok(BuildStats {
            documents: self.documents.len(),
            dimension: self.index.dimension().get(),
            duration: start.elapsed(),
        })
    }

    /// Persist the built index into `dir` as one unit.
    pub fn persist(&self, dir: &Path) -> IndexResult<()> {
        let manifest = IndexManifest::new(
            self.embedder.model_name(),
            self.index.dimension().get(),
            self.documents.len(),
        );
        IndexPersistence::new(dir).save(&self.index, &self.documents, &manifest)
    }

    /// Load records from `source`, build, and persist into `dir`.
    pub fn index_file(&mut self, source: &Path, dir: &Path) -> IndexResult<IndexReport> {
        let report = load_records(source)?;
        let stats = self.build(report.records)?;
        self.persist(dir)?;

        Ok(IndexReport {
            stats,
            failures: report.failures,
        })
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }
}
