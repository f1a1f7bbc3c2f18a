//! Build, persist, reload and query an index end to end.

use crate::common::{FixedEmbedder, paper};
use paperdex::indexing::render_document;
use paperdex::{EmbeddingGenerator, IndexError, Indexer, SearchEngine, VectorIndex};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

fn abc_embedder() -> Arc<dyn EmbeddingGenerator> {
    Arc::new(
        FixedEmbedder::new(4)
            .pin(&render_document(&paper("A")), vec![1.0, 0.0, 0.0, 0.0])
            .pin(&render_document(&paper("B")), vec![0.0, 1.0, 0.0, 0.0])
            .pin(&render_document(&paper("C")), vec![0.0, 0.0, 1.0, 0.0])
            .pin("which paper is B?", vec![0.0, 1.0, 0.0, 0.0]),
    )
}

#[test]
fn test_identical_embedding_is_top_result_with_full_score() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("index");
    let embedder = abc_embedder();

    let mut indexer = Indexer::new(embedder.clone());
    indexer
        .build(vec![paper("A"), paper("B"), paper("C")])
        .unwrap();
    indexer.persist(&dir).unwrap();

    let engine = SearchEngine::load(&dir, embedder).unwrap();
    let results = engine.search("which paper is B?", 1).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].metadata.title, "B");
    assert_eq!(results[0].score.get(), 1.0);
}

#[test]
fn test_round_trip_matches_in_memory_search() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("index");
    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(16));

    let titles = ["Prompt chaining", "Tool use", "Self-refine", "Retrieval", "Evaluation"];
    let mut indexer = Indexer::new(embedder.clone());
    indexer
        .build(titles.iter().map(|t| paper(t)).collect())
        .unwrap();
    indexer.persist(&dir).unwrap();

    let in_memory = SearchEngine::from_parts(
        embedder.clone(),
        Box::new(indexer.index().clone()),
        indexer.documents().clone(),
    )
    .unwrap();
    let reloaded = SearchEngine::load(&dir, embedder).unwrap();

    for query in ["prompting", "benchmarks for reasoning", "Tool use"] {
        assert_eq!(
            in_memory.search(query, 3).unwrap(),
            reloaded.search(query, 3).unwrap(),
            "results differ for {query:?}"
        );
    }
}

#[test]
fn test_repeated_loads_are_identical() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("index");
    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(8));

    let mut indexer = Indexer::new(embedder.clone());
    indexer.build(vec![paper("X"), paper("Y")]).unwrap();
    indexer.persist(&dir).unwrap();

    let first = SearchEngine::load(&dir, embedder.clone()).unwrap();
    let second = SearchEngine::load(&dir, embedder).unwrap();

    assert_eq!(first.len(), second.len());
    assert_eq!(
        first.query_and_format("Y", 2).unwrap(),
        second.query_and_format("Y", 2).unwrap()
    );
}

#[test]
fn test_every_vector_id_resolves_to_its_document() {
    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(8));
    let records: Vec<_> = (0..25).map(|i| paper(&format!("Paper {i}"))).collect();

    let mut indexer = Indexer::new(embedder.clone());
    indexer.build(records).unwrap();

    let query = embedder.embed("Paper 7").unwrap();
    let neighbors = indexer.index().search(&query, 25).unwrap();
    assert_eq!(neighbors.len(), 25);

    let mut seen = HashSet::new();
    for neighbor in neighbors {
        let (document, record) = indexer.documents().get(neighbor.id).unwrap();
        assert_eq!(document, render_document(record));
        assert_eq!(record.title, format!("Paper {}", neighbor.id));
        assert!(seen.insert(neighbor.id));
    }
}

#[test]
fn test_scores_are_bounded_and_descending() {
    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(8));
    let mut indexer = Indexer::new(embedder.clone());
    indexer
        .build((0..10).map(|i| paper(&format!("Topic {i}"))).collect())
        .unwrap();
    let engine = SearchEngine::from_parts(
        embedder,
        Box::new(indexer.index().clone()),
        indexer.documents().clone(),
    )
    .unwrap();

    let results = engine.search("something unrelated entirely", 100).unwrap();
    assert_eq!(results.len(), 10);
    for result in &results {
        let score = result.score.get();
        assert!(score > 0.0 && score <= 1.0, "score {score} out of range");
    }
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_top_k_zero_and_empty_index() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("index");
    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(4));

    let mut indexer = Indexer::new(embedder.clone());
    indexer.build(Vec::new()).unwrap();
    indexer.persist(&dir).unwrap();

    let engine = SearchEngine::load(&dir, embedder.clone()).unwrap();
    assert!(matches!(
        engine.search("anything", 3),
        Err(IndexError::EmptyIndex)
    ));

    indexer.build(vec![paper("Only")]).unwrap();
    indexer.persist(&dir).unwrap();
    let engine = SearchEngine::load(&dir, embedder).unwrap();
    assert!(matches!(
        engine.search("anything", 0),
        Err(IndexError::InvalidArgument { .. })
    ));
    assert_eq!(engine.search("anything", 1).unwrap().len(), 1);
}
