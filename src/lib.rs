#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_possible_wrap)]
#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::all)]

//! # kdsearch: exact and approximate K-nearest-neighbor search
//!
//! `kdsearch` indexes embeddings in a balanced KD-tree and answers
//! K-nearest-neighbor queries against it.
//! It features:
//! - One tree for scalar (`f32`) and vector (`VectorData`) embeddings
//! - Balanced median build with a deterministic tie order
//! - Bounded max-heap search with subtree pruning
//! - Optional `(1 + epsilon)` approximate search
//! - A brute-force `LinearIndex` behind the same trait for comparison
//! - JSON passage loading and text-enriched reports
//!
//! ```
//! use kdsearch::core::indexing::vector::kdtree::{KdTree, SearchParams};
//!
//! let points = vec![(10.0f32, 0), (20.0, 1), (30.0, 2), (40.0, 3), (50.0, 4)];
//! let tree = KdTree::build(points, 0)?;
//! let nearest = tree.search(&25.0, SearchParams::exact(2))?;
//! assert_eq!(nearest.len(), 2);
//! assert_eq!(nearest[0].distance, 5.0);
//! # Ok::<(), kdsearch::core::indexing::vector::kdtree::KdTreeError>(())
//! ```

pub mod api;
pub mod core;

// Re-export key types for easier use by library consumers
pub use crate::api::{QueryReport, QueryRunner};
pub use crate::core::common::KdSearchError;
pub use crate::core::indexing::vector::kdtree::{KdTree, Neighbor, SearchParams};
pub use crate::core::types::{Embedding, PointId, VectorData};
pub use crate::core::Config;

/// Core result type for the library
pub type Result<T> = std::result::Result<T, KdSearchError>;
