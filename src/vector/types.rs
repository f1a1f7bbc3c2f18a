//! Type-safe wrappers and core types for vector retrieval.
//!
//! Newtypes here keep positional ids, dimensions and scores from being
//! mixed up with plain integers and floats as they travel between the
//! index, the document store and the search engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type-safe wrapper for vector ids.
///
/// Ids are zero-based insertion positions. The same value addresses the
/// matching entry in the document store, so an id is only meaningful
/// together with the index snapshot that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorId(u32);

impl VectorId {
    /// Creates a new `VectorId` from a position.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Creates an id from a `usize` position.
    ///
    /// Returns `None` if the position does not fit in 32 bits.
    #[must_use]
    pub fn from_position(position: usize) -> Option<Self> {
        u32::try_from(position).ok().map(Self)
    }

    /// Returns the underlying u32 value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the id as a position usable for slice indexing.
    #[must_use]
    pub const fn as_position(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Similarity score derived from a squared L2 distance.
///
/// `score = 1 / (1 + distance)`. This is a heuristic normalization, not a
/// probability: it is monotonically decreasing in distance, bounded in
/// `(0.0, 1.0]`, and exactly `1.0` for a zero distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Score(f32);

impl Score {
    /// Converts a squared L2 distance into a score.
    ///
    /// Negative or NaN distances cannot come out of the flat index; they are
    /// clamped to zero so the result stays inside the documented range.
    #[must_use]
    pub fn from_distance(distance: f32) -> Self {
        let distance = if distance.is_nan() || distance < 0.0 {
            0.0
        } else {
            distance
        };
        let score = 1.0 / (1.0 + distance);
        // Infinite distances would collapse to exactly zero.
        Self(score.max(f32::MIN_POSITIVE))
    }

    /// Returns the underlying f32 value.
    #[must_use]
    pub fn get(&self) -> f32 {
        self.0
    }

    /// Score expressed as a percentage with two decimals, e.g. `87.50%`.
    #[must_use]
    pub fn as_percentage(&self) -> String {
        format!("{:.2}%", self.0 * 100.0)
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Type-safe wrapper for vector dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Creates a new `VectorDimension` with validation.
    ///
    /// Returns an error if the dimension is zero.
    pub fn new(dim: usize) -> Result<Self, VectorError> {
        if dim == 0 {
            return Err(VectorError::InvalidDimension {
                dimension: 0,
                reason: "Vector dimension cannot be zero",
            });
        }
        Ok(Self(dim))
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Validates that a vector has the expected dimension.
    pub fn validate_vector(&self, vector: &[f32]) -> Result<(), VectorError> {
        if vector.len() != self.0 {
            return Err(VectorError::DimensionMismatch {
                expected: self.0,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during vector operations.
///
/// All error messages include actionable suggestions for resolution.
#[derive(Error, Debug)]
pub enum VectorError {
    #[error(
        "Vector dimension mismatch: expected {expected}, got {actual}\nSuggestion: Ensure all vectors use the same embedding model, or rebuild the index after changing models"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector dimension: {dimension}\nReason: {reason}")]
    InvalidDimension {
        dimension: usize,
        reason: &'static str,
    },

    #[error("Cannot search an empty index\nSuggestion: Build the index from a record file first")]
    EmptyIndex,

    #[error("Invalid neighbor count: {0}\nSuggestion: Request at least one result")]
    InvalidK(usize),

    #[error("Index is full: cannot assign an id past {0}")]
    IdExhausted(usize),

    #[error("Storage error: {0}\nSuggestion: Check disk space and file permissions")]
    Storage(#[from] std::io::Error),

    #[error(
        "Embedding generation failed: {0}\nSuggestion: Verify the embedding model is properly initialized"
    )]
    EmbeddingFailed(String),

    #[error(
        "Invalid vector file: {0}\nSuggestion: The index may be corrupted. Rebuild it from the record file"
    )]
    InvalidFormat(String),

    #[error(
        "Invalid storage version: expected {expected}, got {actual}\nSuggestion: Rebuild the index with this version"
    )]
    VersionMismatch { expected: u32, actual: u32 },
}
