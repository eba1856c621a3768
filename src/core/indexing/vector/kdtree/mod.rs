// src/core/indexing/vector/kdtree/mod.rs

//! Balanced KD-Tree for exact and approximate K-nearest-neighbor search.
//!
//! One node per point, split on the upper median of the subset with the axis
//! cycling by depth. Search descends the near side first, keeps the best K
//! candidates in a bounded max-heap and skips far subtrees whose splitting
//! plane is already farther than the current K-th best distance.

// Re-export key components for easier use.
pub use self::builder::{build_kdtree, validate_points};
pub use self::error::KdTreeError;
pub use self::heap::{KnnHeap, Neighbor};
pub use self::search::{find_knn, knn_search_into, linear_scan_knn, SearchParams};
pub use self::tree::{KdNode, KdTree};

use super::NearestNeighborIndex;
use crate::core::types::Embedding;

// Modules within the kdtree crate
mod builder;
mod error;
mod heap;
mod search;
mod tree;

impl<E: Embedding> NearestNeighborIndex<E> for KdTree<E> {
    fn name(&self) -> &str {
        "kdtree"
    }

    fn dimension(&self) -> usize {
        KdTree::dimension(self)
    }

    fn len(&self) -> usize {
        KdTree::len(self)
    }

    fn search_knn(&self, query: &E, params: SearchParams) -> Result<Vec<Neighbor>, KdTreeError> {
        find_knn(self, query, params)
    }
}
