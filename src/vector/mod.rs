//! Vector retrieval primitives.
//!
//! Embeddings go in, ranked `(id, distance)` pairs come out. The module
//! owns the embedding provider seam, the flat L2 index and its binary file
//! format. Everything above it (records, documents, scores shown to users)
//! lives in `indexing` and `search`.
//!
//! # Architecture
//! Vectors are kept in one contiguous buffer and scanned exhaustively on
//! every query. Ids are insertion positions, which lets the document store
//! stay a plain parallel array.

mod embedding;
mod flat;
mod storage;
mod types;

#[cfg(test)]
pub use embedding::MockEmbeddingGenerator;
pub use embedding::{
    EmbeddingGenerator, FastEmbedGenerator, FastEmbedOptions, SUPPORTED_MODELS, embed_checked,
    parse_embedding_model,
};
pub use flat::{FlatIndex, Neighbor, VectorIndex, squared_l2};
pub use storage::{VectorFileHeader, read_vector_file, read_vector_header, write_vector_file};
pub use types::{Score, VectorDimension, VectorError, VectorId};
