pub mod error;
pub use error::KdSearchError;
