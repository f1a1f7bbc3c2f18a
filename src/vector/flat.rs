//! Exact nearest-neighbor index over L2 distance.
//!
//! The flat index compares a query against every stored vector. Corpora here
//! are tens to low thousands of documents, where an exhaustive scan is both
//! exact and fast enough. Callers program against [`VectorIndex`] so an
//! approximate structure can replace it without touching indexing or search.

use std::cmp::Ordering;
use std::path::Path;

use rayon::prelude::*;

use crate::vector::storage::{read_vector_file, write_vector_file};
use crate::vector::types::{VectorDimension, VectorError, VectorId};

/// A search candidate: the id of a stored vector and its squared L2
/// distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: VectorId,
    pub distance: f32,
}

impl Neighbor {
    /// Ascending distance, then ascending id.
    fn rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Narrow interface for a nearest-neighbor index keyed by positional ids.
pub trait VectorIndex: Send + Sync {
    /// Dimension every stored vector and query must have.
    fn dimension(&self) -> VectorDimension;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends vectors and returns the ids assigned to them, in input order.
    ///
    /// Ids continue from the current size. Either every vector is added or,
    /// on a dimension mismatch, none is.
    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<Vec<VectorId>, VectorError>;

    /// Returns up to `k` neighbors ordered by ascending distance, ties broken
    /// by lower id.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorError>;

    /// Writes the full vector set to `path`.
    fn save(&self, path: &Path) -> Result<(), VectorError>;

    /// Reads an index written by [`VectorIndex::save`].
    ///
    /// Fails with `DimensionMismatch` when the stored dimension differs from
    /// `expected`, which is what happens after switching embedding models.
    fn load(path: &Path, expected: VectorDimension) -> Result<Self, VectorError>
    where
        Self: Sized;
}

/// Brute-force index storing all vectors in one contiguous buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimension: VectorDimension,
    /// Row-major vector data, `len() * dimension` values.
    data: Vec<f32>,
}

impl FlatIndex {
    /// Creates an empty index fixed to `dimension`.
    #[must_use]
    pub fn new(dimension: VectorDimension) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Returns the stored vector for `id`, if present.
    #[must_use]
    pub fn vector(&self, id: VectorId) -> Option<&[f32]> {
        let dim = self.dimension.get();
        let start = id.as_position().checked_mul(dim)?;
        self.data.get(start..start + dim)
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimension.get()
    }

    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<Vec<VectorId>, VectorError> {
        for vector in vectors {
            self.dimension.validate_vector(vector)?;
        }

        let start = self.len();
        let end = start + vectors.len();
        // Ids must stay addressable as u32 positions.
        if end > 0 && VectorId::from_position(end - 1).is_none() {
            return Err(VectorError::IdExhausted(end));
        }

        self.data.reserve(vectors.len() * self.dimension.get());
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }

        Ok((start..end)
            .filter_map(VectorId::from_position)
            .collect())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorError> {
        self.dimension.validate_vector(query)?;

        if k == 0 {
            return Err(VectorError::InvalidK(k));
        }
        if self.is_empty() {
            return Err(VectorError::EmptyIndex);
        }

        let mut candidates: Vec<Neighbor> = self
            .data
            .par_chunks_exact(self.dimension.get())
            .enumerate()
            .filter_map(|(position, vector)| {
                VectorId::from_position(position).map(|id| Neighbor {
                    id,
                    distance: squared_l2(query, vector),
                })
            })
            .collect();

        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, Neighbor::rank);
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(Neighbor::rank);

        Ok(candidates)
    }

    fn save(&self, path: &Path) -> Result<(), VectorError> {
        write_vector_file(path, self.dimension, &self.data)
    }

    fn load(path: &Path, expected: VectorDimension) -> Result<Self, VectorError> {
        let (header, data) = read_vector_file(path)?;

        if header.dimension != expected {
            return Err(VectorError::DimensionMismatch {
                expected: expected.get(),
                actual: header.dimension.get(),
            });
        }

        tracing::debug!(
            "loaded {} vectors of dimension {} from {}",
            header.vector_count,
            header.dimension,
            path.display()
        );

        Ok(Self {
            dimension: header.dimension,
            data,
        })
    }
}

/// Squared Euclidean distance between two equal-length vectors.
#[must_use]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}
