//! Indexing record files that contain malformed entries.

use crate::common::FixedEmbedder;
use paperdex::{IndexError, IndexPersistence, Indexer, SearchEngine, TechniqueType};
use std::sync::Arc;
use tempfile::TempDir;

const MIXED_INPUT: &str = r#"{
  "top_papers": [
    {
      "title": "Chain-of-Thought Prompting Elicits Reasoning",
      "summary": "Step-by-step exemplars improve multi-step reasoning.",
      "year": 2022,
      "month": "January",
      "authors": ["Jason Wei", "Xuezhi Wang"],
      "technique_type": "Prompt Engineering Technique",
      "technique_description": "Few-shot exemplars with intermediate reasoning steps"
    },
    {
      "title": "Missing summary",
      "year": "2023",
      "authors": ["Nobody"],
      "technique_type": "Other"
    },
    "not an object",
    {
      "title": "Survey of Evaluation Benchmarks",
      "summary": "Reviews how language models are evaluated.",
      "year": "2023",
      "authors": ["Ada Lovelace"],
      "technique_type": "Other",
      "technique_description": ""
    },
    {
      "title": "Other with a description",
      "summary": "Inconsistent entry.",
      "year": "2024",
      "authors": [],
      "technique_type": "Other",
      "technique_description": "should not be here"
    }
  ]
}"#;

#[test]
fn test_malformed_entries_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("papers.json");
    std::fs::write(&source, MIXED_INPUT).unwrap();
    let dir = temp_dir.path().join("index");

    let embedder = Arc::new(FixedEmbedder::new(8));
    let mut indexer = Indexer::new(embedder.clone());
    let report = indexer.index_file(&source, &dir).unwrap();

    assert_eq!(report.stats.documents, 2);
    let positions: Vec<usize> = report.failures.iter().map(|f| f.position).collect();
    assert_eq!(positions, vec![1, 2, 4]);
    assert_eq!(report.failures[0].title.as_deref(), Some("Missing summary"));
    assert_eq!(report.failures[1].title, None);

    let records = indexer.documents().records();
    assert_eq!(records[0].year, "2022");
    assert_eq!(
        records[0].technique_type,
        TechniqueType::PromptEngineeringTechnique
    );
    assert_eq!(records[1].month, "");

    let engine = SearchEngine::load(&dir, embedder).unwrap();
    assert_eq!(engine.len(), 2);
}

#[test]
fn test_all_invalid_entries_fail_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("papers.json");
    std::fs::write(
        &source,
        r#"{"top_papers": [{"title": "No summary"}, 42]}"#,
    )
    .unwrap();
    let dir = temp_dir.path().join("index");

    let mut indexer = Indexer::new(Arc::new(FixedEmbedder::new(8)));
    assert!(matches!(
        indexer.index_file(&source, &dir),
        Err(IndexError::Schema { .. })
    ));
    assert!(!IndexPersistence::new(&dir).exists());
}

#[test]
fn test_wrong_top_level_shape_is_a_schema_error() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("papers.json");
    std::fs::write(&source, r#"[{"title": "A bare list"}]"#).unwrap();

    let mut indexer = Indexer::new(Arc::new(FixedEmbedder::new(8)));
    assert!(matches!(
        indexer.index_file(&source, &temp_dir.path().join("index")),
        Err(IndexError::Schema { .. })
    ));
}

#[test]
fn test_unreadable_source_is_a_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut indexer = Indexer::new(Arc::new(FixedEmbedder::new(8)));

    assert!(matches!(
        indexer.index_file(
            &temp_dir.path().join("missing.json"),
            &temp_dir.path().join("index")
        ),
        Err(IndexError::FileRead { .. })
    ));
}
