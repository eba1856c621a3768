// src/core/indexing/vector/kdtree/error.rs

use std::fmt;

/// Custom error types for KD-Tree operations.
///
/// Every variant is reported before the tree is touched, so a failed call
/// never leaves a partially built tree behind or alters an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum KdTreeError {
    /// An embedding or query does not have the tree's dimension.
    DimensionMismatch { expected: usize, found: usize },
    /// A vector tree was requested without a dimension.
    UnconfiguredDimension,
    /// K must be at least 1.
    InvalidK(usize),
    /// Epsilon must be finite and non-negative.
    InvalidEpsilon(f32),
}

impl fmt::Display for KdTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdTreeError::DimensionMismatch { expected, found } => write!(
                f,
                "KD-Tree Dimension Mismatch: expected {}, found {}",
                expected, found
            ),
            KdTreeError::UnconfiguredDimension => {
                write!(f, "KD-Tree Unconfigured Dimension: vector trees need a dimension > 0")
            }
            KdTreeError::InvalidK(k) => write!(f, "KD-Tree Invalid K: {} (must be >= 1)", k),
            KdTreeError::InvalidEpsilon(eps) => {
                write!(f, "KD-Tree Invalid Epsilon: {} (must be finite and >= 0)", eps)
            }
        }
    }
}

impl std::error::Error for KdTreeError {}
