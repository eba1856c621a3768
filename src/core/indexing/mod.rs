pub mod vector;

// Re-export the index trait for convenience.
pub use vector::NearestNeighborIndex;
