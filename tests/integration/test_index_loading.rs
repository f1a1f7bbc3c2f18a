//! Loading index directories that are incomplete, inconsistent or built
//! with a different model.

use crate::common::{FixedEmbedder, paper};
use paperdex::indexing::render_document;
use paperdex::storage::{INDEX_FILE, MANIFEST_FILE, METADATA_FILE};
use paperdex::{
    DocumentStore, EmbeddingGenerator, FlatIndex, IndexError, IndexPersistence, Indexer,
    SearchEngine, VectorDimension, VectorIndex,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn build_into(dir: &Path, embedder: Arc<dyn EmbeddingGenerator>, titles: &[&str]) {
    let mut indexer = Indexer::new(embedder);
    indexer
        .build(titles.iter().map(|t| paper(t)).collect())
        .unwrap();
    indexer.persist(dir).unwrap();
}

#[test]
fn test_more_documents_than_vectors_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let mut index = FlatIndex::new(VectorDimension::new(4).unwrap());
    index
        .add(&[vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]])
        .unwrap();
    index.save(&dir.join(INDEX_FILE)).unwrap();

    let mut documents = DocumentStore::new();
    for title in ["One", "Two", "Three"] {
        let record = paper(title);
        documents.append(render_document(&record), record).unwrap();
    }
    documents.save(&dir.join(METADATA_FILE)).unwrap();

    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(4));
    let result = SearchEngine::load(dir, embedder);
    assert!(
        matches!(result, Err(IndexError::CorruptIndex { .. })),
        "expected CorruptIndex, got {result:?}"
    );
    assert!(matches!(
        IndexPersistence::new(dir).info(),
        Err(IndexError::CorruptIndex { .. })
    ));
}

#[test]
fn test_missing_files_are_reported() {
    let temp_dir = TempDir::new().unwrap();
    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(4));

    let nowhere = temp_dir.path().join("never-built");
    assert!(matches!(
        SearchEngine::load(&nowhere, embedder.clone()),
        Err(IndexError::MissingFile { .. })
    ));

    let dir = temp_dir.path().join("index");
    build_into(&dir, embedder.clone(), &["A", "B"]);
    std::fs::remove_file(dir.join(METADATA_FILE)).unwrap();

    match SearchEngine::load(&dir, embedder) {
        Err(IndexError::MissingFile { path }) => assert!(path.ends_with(METADATA_FILE)),
        other => panic!("expected MissingFile, got {other:?}"),
    }
}

#[test]
fn test_missing_manifest_is_tolerated() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("index");
    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(4));

    build_into(&dir, embedder.clone(), &["A", "B"]);
    std::fs::remove_file(dir.join(MANIFEST_FILE)).unwrap();

    let engine = SearchEngine::load(&dir, embedder).unwrap();
    assert_eq!(engine.len(), 2);
    assert!(engine.manifest().is_none());
}

#[test]
fn test_query_dimension_must_match_index() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("index");

    build_into(&dir, Arc::new(FixedEmbedder::new(4)), &["A", "B"]);

    let wider: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(6));
    assert!(matches!(
        SearchEngine::load(&dir, wider),
        Err(IndexError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_model_name_mismatch_still_loads() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("index");

    build_into(
        &dir,
        Arc::new(FixedEmbedder::new(4).named("model-at-build-time")),
        &["A", "B", "C"],
    );

    let other: Arc<dyn EmbeddingGenerator> =
        Arc::new(FixedEmbedder::new(4).named("model-at-query-time"));
    let engine = SearchEngine::load(&dir, other).unwrap();

    assert_eq!(
        engine.manifest().map(|m| m.model.as_str()),
        Some("model-at-build-time")
    );
    assert_eq!(engine.model_name(), "model-at-query-time");
    assert_eq!(engine.search("A", 3).unwrap().len(), 3);
}

#[test]
fn test_rebuild_replaces_previous_index() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("index");
    let embedder: Arc<dyn EmbeddingGenerator> = Arc::new(FixedEmbedder::new(4));

    build_into(&dir, embedder.clone(), &["A", "B", "C"]);
    build_into(&dir, embedder.clone(), &["D"]);

    let info = IndexPersistence::new(&dir).info().unwrap();
    assert_eq!(info.documents, 1);
    assert_eq!(info.model.as_deref(), Some("fixed-test-embedder"));

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("index")]);
}

#[test]
fn test_persist_never_deletes_records_next_to_the_target() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    let source = data.join("research_papers.json");
    std::fs::write(&source, r#"{"top_papers": []}"#).unwrap();

    let mut indexer = Indexer::new(Arc::new(FixedEmbedder::new(4)));
    indexer.build(vec![paper("A")]).unwrap();

    assert!(matches!(
        indexer.persist(&data),
        Err(IndexError::InvalidArgument { .. })
    ));
    assert_eq!(
        std::fs::read_to_string(&source).unwrap(),
        r#"{"top_papers": []}"#
    );

    indexer.persist(&data.join("index")).unwrap();
    assert!(source.is_file());
    assert!(IndexPersistence::new(data.join("index")).exists());
}
