//! Search over a persisted index.

use std::path::Path;
use std::sync::Arc;

use crate::error::{IndexError, IndexResult};
use crate::search::result::{SearchResult, format_result};
use crate::storage::{DocumentStore, IndexManifest, IndexPersistence};
use crate::vector::{EmbeddingGenerator, Score, VectorIndex, embed_checked};

/// Answers queries against one loaded index.
///
/// The engine owns the vector index and document store it was loaded with
/// and never modifies them. Queries must be embedded with the same model
/// the index was built with; a mismatch in model name is only logged, and
/// a mismatch that keeps the dimension cannot be detected at all.
pub struct SearchEngine {
    embedder: Arc<dyn EmbeddingGenerator>,
    index: Box<dyn VectorIndex>,
    documents: DocumentStore,
    manifest: Option<IndexManifest>,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("model", &self.embedder.model_name())
            .field("documents", &self.documents.len())
            .field("dimension", &self.index.dimension())
            .finish()
    }
}

impl SearchEngine {
    /// Load the index persisted in `dir`.
    pub fn load(dir: &Path, embedder: Arc<dyn EmbeddingGenerator>) -> IndexResult<Self> {
        let loaded = IndexPersistence::new(dir).load(embedder.dimension())?;

        match &loaded.manifest {
            Some(manifest) if manifest.model != embedder.model_name() => {
                tracing::warn!(
                    "index in {} was built with {} but queries use {}; scores may be meaningless",
                    dir.display(),
                    manifest.model,
                    embedder.model_name()
                );
            }
            Some(_) => {}
            None => tracing::debug!("no manifest in {}, skipping model check", dir.display()),
        }

        let mut engine = Self::from_parts(embedder, Box::new(loaded.index), loaded.documents)?;
        engine.manifest = loaded.manifest;
        Ok(engine)
    }

    /// Assemble an engine from structures that are already in memory.
    ///
    /// Fails with `CorruptIndex` when the index and the store are not the
    /// same size and with `DimensionMismatch` when the embedder cannot
    /// produce vectors of the index dimension.
    pub fn from_parts(
        embedder: Arc<dyn EmbeddingGenerator>,
        index: Box<dyn VectorIndex>,
        documents: DocumentStore,
    ) -> IndexResult<Self> {
        if index.len() != documents.len() {
            return Err(IndexError::CorruptIndex {
                reason: format!(
                    "{} vectors but {} documents",
                    index.len(),
                    documents.len()
                ),
            });
        }
        if index.dimension() != embedder.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: index.dimension().get(),
                actual: embedder.dimension().get(),
            });
        }

        Ok(Self {
            embedder,
            index,
            documents,
            manifest: None,
        })
    }

    /// Up to `top_k` documents most similar to `query`, best first.
    pub fn search(&self, query: &str, top_k: usize) -> IndexResult<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(IndexError::InvalidArgument {
                reason: "query is empty".to_string(),
            });
        }
        if top_k == 0 {
            return Err(IndexError::InvalidArgument {
                reason: "top_k must be at least 1".to_string(),
            });
        }
        if self.index.is_empty() {
            return Err(IndexError::EmptyIndex);
        }

        let query_embedding = embed_checked(self.embedder.as_ref(), &[query])?
            .pop()
            .ok_or_else(|| IndexError::ProviderFailure {
                reason: "no embedding returned for the query".to_string(),
            })?;

        let neighbors = self.index.search(&query_embedding, top_k)?;
        tracing::debug!(
            "query matched {} of {} documents (top_k = {top_k})",
            neighbors.len(),
            self.index.len()
        );

        neighbors
            .into_iter()
            .map(|neighbor| {
                let (document, metadata) = self.documents.get(neighbor.id)?;
                Ok(SearchResult {
                    score: Score::from_distance(neighbor.distance),
                    document: document.to_string(),
                    metadata: metadata.clone(),
                })
            })
            .collect()
    }

    /// Search and format every result with [`format_result`].
    pub fn query_and_format(&self, query: &str, top_k: usize) -> IndexResult<Vec<String>> {
        Ok(self
            .search(query, top_k)?
            .iter()
            .map(format_result)
            .collect())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Build information, when the index was saved with a manifest.
    pub fn manifest(&self) -> Option<&IndexManifest> {
        self.manifest.as_ref()
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::{Indexer, render_document};
    use crate::types::{Record, TechniqueType};
    use crate::vector::{FlatIndex, MockEmbeddingGenerator, VectorDimension};
    use tempfile::TempDir;

    fn record(title: &str) -> Record {
        Record {
            title: title.to_string(),
            summary: format!("About {title}."),
            year: "2023".to_string(),
            month: String::new(),
            authors: vec!["Author".to_string()],
            technique_type: TechniqueType::Other,
            technique_description: String::new(),
        }
    }

    fn engine_with(embedder: MockEmbeddingGenerator, titles: &[&str]) -> SearchEngine {
        let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(embedder);
        let mut indexer = Indexer::new(embedder.clone());
        indexer
            .build(titles.iter().map(|t| record(t)).collect())
            .unwrap();
        SearchEngine::from_parts(
            embedder,
            Box::new(indexer.index().clone()),
            indexer.documents().clone(),
        )
        .unwrap()
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let embedder = MockEmbeddingGenerator::new(3)
            .with_fixed(&render_document(&record("A")), vec![1.0, 0.0, 0.0])
            .with_fixed(&render_document(&record("B")), vec![0.0, 1.0, 0.0])
            .with_fixed(&render_document(&record("C")), vec![0.0, 0.0, 1.0])
            .with_fixed("find b", vec![0.0, 1.0, 0.0]);
        let engine = engine_with(embedder, &["A", "B", "C"]);

        let results = engine.search("find b", 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].metadata.title, "B");
        assert_eq!(results[0].score.get(), 1.0);
        assert!(results[1].score < results[0].score);
        assert_eq!(results[0].document, render_document(&record("B")));
    }

    #[test]
    fn test_top_k_larger_than_corpus() {
        let engine = engine_with(MockEmbeddingGenerator::new(8), &["A", "B"]);
        assert_eq!(engine.search("anything", 10).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_arguments() {
        let engine = engine_with(MockEmbeddingGenerator::new(8), &["A"]);
        assert!(matches!(
            engine.search("query", 0),
            Err(IndexError::InvalidArgument { .. })
        ));
        assert!(matches!(
            engine.search("   ", 3),
            Err(IndexError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_empty_index() {
        let engine = engine_with(MockEmbeddingGenerator::new(8), &[]);
        assert!(engine.is_empty());
        assert!(matches!(
            engine.search("query", 3),
            Err(IndexError::EmptyIndex)
        ));
    }

    #[test]
    fn test_from_parts_checks_shapes() {
        let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(MockEmbeddingGenerator::new(4));

        let mut index = FlatIndex::new(VectorDimension::new(4).unwrap());
        index.add(&[vec![0.0; 4]]).unwrap();
        assert!(matches!(
            SearchEngine::from_parts(embedder.clone(), Box::new(index), DocumentStore::new()),
            Err(IndexError::CorruptIndex { .. })
        ));

        let other = FlatIndex::new(VectorDimension::new(2).unwrap());
        assert!(matches!(
            SearchEngine::from_parts(embedder, Box::new(other), DocumentStore::new()),
            Err(IndexError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_load_and_query_and_format() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("index");
        let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(MockEmbeddingGenerator::new(8));

        let mut indexer = Indexer::new(embedder.clone());
        indexer.build(vec![record("Alpha"), record("Beta")]).unwrap();
        indexer.persist(&dir).unwrap();

        let engine = SearchEngine::load(&dir, embedder).unwrap();
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.manifest().map(|m| m.document_count), Some(2));

        let formatted = engine.query_and_format("About Alpha.", 1).unwrap();
        assert_eq!(formatted.len(), 1);
        assert!(formatted[0].starts_with("Confidence: "));
        assert!(formatted[0].ends_with('\n'));
    }
}
