// src/core/indexing/vector/mod.rs

use std::fmt::Debug;

use crate::core::types::{Embedding, PointId};

pub mod kdtree;

use kdtree::{linear_scan_knn, validate_points, KdTreeError, Neighbor, SearchParams};

/// Trait for indexes capable of K-nearest-neighbor search.
pub trait NearestNeighborIndex<E: Embedding>: Debug + Send + Sync {
    /// Returns the name of the index backend.
    fn name(&self) -> &str;

    /// Returns the dimension of embeddings this index handles.
    fn dimension(&self) -> usize;

    /// Number of indexed points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Performs a K-Nearest Neighbor search.
    /// Returns up to `params.k` neighbors, closest first.
    fn search_knn(&self, query: &E, params: SearchParams) -> Result<Vec<Neighbor>, KdTreeError>;
}

/// Brute-force index: compares the query against every stored point.
///
/// Serves as the reference backend when checking tree results. Epsilon is
/// accepted but has no effect, the scan is always exact.
#[derive(Debug)]
pub struct LinearIndex<E> {
    points: Vec<(E, PointId)>,
    dimension: usize,
}

impl<E: Embedding> LinearIndex<E> {
    /// Stores `points` after the same dimension checks the tree builder makes.
    pub fn new(points: Vec<(E, PointId)>, dimension: usize) -> Result<Self, KdTreeError> {
        let dimension = validate_points(&points, dimension)?;
        Ok(Self { points, dimension })
    }
}

impl<E: Embedding> NearestNeighborIndex<E> for LinearIndex<E> {
    fn name(&self) -> &str {
        "linear"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn search_knn(&self, query: &E, params: SearchParams) -> Result<Vec<Neighbor>, KdTreeError> {
        params.validate()?;
        linear_scan_knn(&self.points, query, self.dimension, params.k)
    }
}
