// src/core/types/embedding.rs

//! Coordinate and distance capabilities shared by every embedding shape.
//!
//! The KD-tree builder and search are written once against [`Embedding`].
//! Two shapes implement it: scalar `f32` values (always one axis) and
//! [`VectorData`] (an axis count chosen by the caller when the tree is built).

use std::fmt::Debug;

use super::VectorData;

/// An embedding the KD-tree can index.
///
/// `distance` must be a true metric (non-negative, symmetric, zero iff equal)
/// and must never be smaller than the gap on any single axis, otherwise
/// subtree pruning would drop valid neighbors.
pub trait Embedding: Clone + Debug + Send + Sync {
    /// Axis count implied by the type itself, if any.
    ///
    /// Scalars report `Some(1)`. Vectors report `None`: their dimension has to
    /// be supplied when a tree is built.
    const FIXED_DIMENSION: Option<usize>;

    /// Number of coordinates carried by this value.
    fn dimension(&self) -> usize;

    /// Coordinate on `axis`. Callers guarantee `axis < dimension`.
    fn coordinate(&self, axis: usize) -> f32;

    /// Distance to `other`, reading only the first `dimension` coordinates.
    fn distance(&self, other: &Self, dimension: usize) -> f32;
}

impl Embedding for f32 {
    const FIXED_DIMENSION: Option<usize> = Some(1);

    fn dimension(&self) -> usize {
        1
    }

    fn coordinate(&self, _axis: usize) -> f32 {
        *self
    }

    fn distance(&self, other: &Self, _dimension: usize) -> f32 {
        (self - other).abs()
    }
}

impl Embedding for VectorData {
    const FIXED_DIMENSION: Option<usize> = None;

    fn dimension(&self) -> usize {
        self.data.len()
    }

    fn coordinate(&self, axis: usize) -> f32 {
        self.data[axis]
    }

    fn distance(&self, other: &Self, dimension: usize) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .take(dimension)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }
}
