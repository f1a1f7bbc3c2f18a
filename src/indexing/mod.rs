pub mod indexer;
pub mod loader;
pub mod render;

pub use indexer::{BuildStats, IndexReport, Indexer};
pub use loader::{LoadReport, RecordFailure, RECORDS_KEY, load_records, parse_records};
pub use render::render_document;
