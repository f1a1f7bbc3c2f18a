//! Semantic retrieval over research-paper records.
//!
//! Records are rendered to text, embedded, and stored in a flat L2 index
//! next to a document store that shares its ids. Queries are embedded with
//! the same model and answered with scored, ranked records.
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use paperdex::{EmbeddingGenerator, FastEmbedGenerator, Indexer, SearchEngine, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let embedder: Arc<dyn EmbeddingGenerator> =
//!     Arc::new(FastEmbedGenerator::new(&settings.embedding_options())?);
//!
//! let mut indexer = Indexer::new(embedder.clone());
//! indexer.index_file(Path::new("research_papers.json"), Path::new("index"))?;
//!
//! let engine = SearchEngine::load(Path::new("index"), embedder)?;
//! for block in engine.query_and_format("prompt engineering", 3)? {
//!     println!("{block}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod indexing;
pub mod io;
pub mod logging;
pub mod search;
pub mod storage;
pub mod types;
pub mod vector;

// Explicit exports for better API clarity
pub use config::Settings;
pub use error::{IndexError, IndexResult};
pub use indexing::{BuildStats, IndexReport, Indexer, LoadReport, RecordFailure, load_records};
pub use search::{SearchEngine, SearchResult, format_result};
pub use storage::{DocumentStore, IndexInfo, IndexManifest, IndexPersistence};
pub use types::{Record, TechniqueType};
pub use vector::{
    EmbeddingGenerator, FastEmbedGenerator, FlatIndex, Score, VectorDimension, VectorError,
    VectorId, VectorIndex,
};
