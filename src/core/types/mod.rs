// src/core/types/mod.rs

//! Value types shared by the index, the record loader and the runner.

pub mod embedding;

pub use embedding::Embedding;

use serde::{Deserialize, Serialize};

/// Caller-supplied identifier attached to every indexed point.
///
/// This is an opaque label used to correlate results back to external records,
/// not a position in any array. Duplicates are allowed.
pub type PointId = i64;

/// A vector embedding. Its dimension is the length of `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorData {
    pub data: Vec<f32>,
}

impl VectorData {
    #[must_use]
    pub fn from_vec(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl From<Vec<f32>> for VectorData {
    fn from(data: Vec<f32>) -> Self {
        Self::from_vec(data)
    }
}
