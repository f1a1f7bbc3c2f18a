//! Persistence for built indexes.
//!
//! An index on disk is one directory holding the vector file, the document
//! store and a manifest. The directory is only ever replaced as a whole.

pub mod documents;
pub mod manifest;
pub mod persistence;

pub use documents::DocumentStore;
pub use manifest::{IndexManifest, get_utc_timestamp};
pub use persistence::{
    INDEX_FILE, IndexInfo, IndexPersistence, LoadedIndex, MANIFEST_FILE, METADATA_FILE,
};
