use std::fmt;

use crate::core::indexing::vector::kdtree::KdTreeError;

/// Crate-level error returned by the record loader, configuration layer,
/// query runner and (via `From`) the KD-tree core.
#[derive(Debug)]
pub enum KdSearchError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Configuration(String),
    InvalidInput { message: String },
    DimensionMismatch { expected: usize, found: usize },
    UnconfiguredDimension,
    InvalidK(usize),
    InvalidEpsilon(f32),
}

impl fmt::Display for KdSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {}", e),
            Self::Json(e) => write!(f, "JSON Deserialization Error: {}", e),
            Self::Configuration(s) => write!(f, "Configuration error: {}", s),
            Self::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            Self::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {}, found {}", expected, found)
            }
            Self::UnconfiguredDimension => {
                write!(f, "Vector dimension is not configured")
            }
            Self::InvalidK(k) => write!(f, "K must be positive, got {}", k),
            Self::InvalidEpsilon(eps) => {
                write!(f, "Epsilon must be a finite non-negative number, got {}", eps)
            }
        }
    }
}

impl std::error::Error for KdSearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

// Manual From implementations
impl From<std::io::Error> for KdSearchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for KdSearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<KdTreeError> for KdSearchError {
    fn from(err: KdTreeError) -> Self {
        match err {
            KdTreeError::DimensionMismatch { expected, found } => {
                Self::DimensionMismatch { expected, found }
            }
            KdTreeError::UnconfiguredDimension => Self::UnconfiguredDimension,
            KdTreeError::InvalidK(k) => Self::InvalidK(k),
            KdTreeError::InvalidEpsilon(eps) => Self::InvalidEpsilon(eps),
        }
    }
}

impl KdSearchError {
    /// Shorthand for an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }
}
