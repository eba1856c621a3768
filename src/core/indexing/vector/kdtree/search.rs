// src/core/indexing/vector/kdtree/search.rs

//! Logic for performing K-Nearest Neighbor (KNN) search in a KD-Tree.

use super::error::KdTreeError;
use super::heap::{KnnHeap, Neighbor};
use super::tree::{KdNode, KdTree};
use crate::core::types::{Embedding, PointId};

/// How many neighbors to return and how much pruning slack to allow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub k: usize,
    /// Approximation factor. `0.0` is an exact search; larger values skip
    /// far subtrees more eagerly and may miss true neighbors.
    pub epsilon: f32,
}

impl SearchParams {
    /// An exact search for `k` neighbors.
    pub const fn exact(k: usize) -> Self {
        Self { k, epsilon: 0.0 }
    }

    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<(), KdTreeError> {
        if self.k == 0 {
            return Err(KdTreeError::InvalidK(self.k));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(KdTreeError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// Performs a K-Nearest Neighbor search, accumulating into a caller-owned heap.
///
/// The effective K is the smaller of `params.k` and the heap's capacity; a
/// larger heap is limited to `params.k` (see [`KnnHeap::limit_to`]) before the
/// traversal. The heap ends up holding at most K entries, in heap order. It is
/// not cleared first, so a heap reused across calls merges their candidates.
///
/// # Errors
/// `InvalidK`, `InvalidEpsilon`, or `DimensionMismatch` when the query does
/// not have the tree's dimension. The heap is untouched on error.
pub fn knn_search_into<E: Embedding>(
    tree: &KdTree<E>,
    query: &E,
    params: SearchParams,
    heap: &mut KnnHeap,
) -> Result<(), KdTreeError> {
    params.validate()?;
    if query.dimension() != tree.dimension {
        return Err(KdTreeError::DimensionMismatch {
            expected: tree.dimension,
            found: query.dimension(),
        });
    }

    heap.limit_to(params.k);
    let slack = 1.0 + params.epsilon;
    if let Some(root) = tree.root() {
        search_recursive(root, query, 0, tree.dimension, slack, heap);
    }
    Ok(())
}

/// Performs a K-Nearest Neighbor search in the KD-Tree.
///
/// # Returns
/// Up to `params.k` neighbors sorted by ascending distance (ties by id). If
/// the tree holds fewer than `k` points, all of them are returned.
pub fn find_knn<E: Embedding>(
    tree: &KdTree<E>,
    query: &E,
    params: SearchParams,
) -> Result<Vec<Neighbor>, KdTreeError> {
    let mut heap = KnnHeap::new(params.k.min(tree.len()));
    if params.k > tree.len() {
        log::debug!("k = {} exceeds tree size {}; returning every point", params.k, tree.len());
    }
    knn_search_into(tree, query, params, &mut heap)?;
    Ok(heap.into_sorted_vec())
}

fn search_recursive<E: Embedding>(
    node: &KdNode<E>,
    query: &E,
    depth: usize,
    dimension: usize,
    slack: f32,
    heap: &mut KnnHeap,
) {
    let axis = if dimension == 0 { 0 } else { depth % dimension };
    let query_coord = query.coordinate(axis);
    let node_coord = node.embedding().coordinate(axis);

    let (near, far) = if query_coord < node_coord {
        (node.left(), node.right())
    } else {
        (node.right(), node.left())
    };

    if let Some(near) = near {
        search_recursive(near, query, depth + 1, dimension, slack, heap);
    }

    heap.offer(query.distance(node.embedding(), dimension), node.id());

    // The gap to the splitting plane bounds the distance to anything on the
    // far side from below.
    if let Some(far) = far {
        let gap = (query_coord - node_coord).abs();
        let must_visit = match heap.worst_distance() {
            Some(worst) if heap.is_full() => gap < worst / slack,
            _ => true,
        };
        if must_visit {
            search_recursive(far, query, depth + 1, dimension, slack, heap);
        }
    }
}

/// Brute-force reference search over a slice of points.
///
/// Returns the same neighbors an exact tree search would (up to ties), sorted
/// by ascending distance.
pub fn linear_scan_knn<E: Embedding>(
    points: &[(E, PointId)],
    query: &E,
    dimension: usize,
    k: usize,
) -> Result<Vec<Neighbor>, KdTreeError> {
    SearchParams::exact(k).validate()?;
    if query.dimension() != dimension {
        return Err(KdTreeError::DimensionMismatch { expected: dimension, found: query.dimension() });
    }
    let mut heap = KnnHeap::new(k.min(points.len()));
    for (embedding, id) in points {
        heap.offer(query.distance(embedding, dimension), *id);
    }
    Ok(heap.into_sorted_vec())
}

impl<E: Embedding> KdTree<E> {
    /// Searches the tree; see [`find_knn`].
    pub fn search(&self, query: &E, params: SearchParams) -> Result<Vec<Neighbor>, KdTreeError> {
        find_knn(self, query, params)
    }
}
