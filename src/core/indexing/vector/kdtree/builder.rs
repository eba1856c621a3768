// src/core/indexing/vector/kdtree/builder.rs

//! Logic for building a balanced KD-Tree from a set of points.

use std::cmp::Ordering;

use super::error::KdTreeError;
use super::tree::{KdNode, KdTree};
use crate::core::types::{Embedding, PointId};

/// A point waiting to be placed in the tree.
type BuildPoint<E> = (E, PointId);

/// Builds a balanced KD-Tree from `(embedding, id)` pairs.
///
/// The split axis cycles with depth (`depth % dimension`) and every node holds
/// the upper median (index `n / 2`) of its subset under a total order: the
/// coordinate on the split axis, then the following axes in cyclic order, then
/// the id. The same input therefore always produces the same tree, duplicate
/// embeddings included.
///
/// # Arguments
/// * `points`: The points to index. Their order does not affect the result.
/// * `dimension`: The axis count. `0` means "use the type's own dimension",
///   which only scalars have.
///
/// # Errors
/// * `UnconfiguredDimension` if `dimension` is 0 for a vector embedding type.
/// * `DimensionMismatch` if any embedding does not have exactly `dimension`
///   coordinates. Nothing is allocated in that case.
pub fn build_kdtree<E: Embedding>(
    points: Vec<(E, PointId)>,
    dimension: usize,
) -> Result<KdTree<E>, KdTreeError> {
    let dimension = validate_points(&points, dimension)?;

    let len = points.len();
    let root = build_recursive(points, dimension, 0);
    log::debug!("built KD-Tree over {} points (dimension {})", len, dimension);

    Ok(KdTree { root, dimension, len })
}

/// Resolves the index dimension from the caller's value and the type's own,
/// then checks every point against it.
///
/// Returns the resolved dimension.
pub fn validate_points<E: Embedding>(
    points: &[(E, PointId)],
    dimension: usize,
) -> Result<usize, KdTreeError> {
    let dimension = match (dimension, E::FIXED_DIMENSION) {
        (0, Some(fixed)) => fixed,
        (0, None) => return Err(KdTreeError::UnconfiguredDimension),
        (requested, _) => requested,
    };

    if let Some((embedding, _)) = points.iter().find(|(e, _)| e.dimension() != dimension) {
        return Err(KdTreeError::DimensionMismatch {
            expected: dimension,
            found: embedding.dimension(),
        });
    }
    Ok(dimension)
}

/// Total order used to pick medians at a node splitting on `axis`.
fn compare_points<E: Embedding>(
    a: &BuildPoint<E>,
    b: &BuildPoint<E>,
    axis: usize,
    dimension: usize,
) -> Ordering {
    (0..dimension)
        .map(|offset| (axis + offset) % dimension)
        .map(|ax| a.0.coordinate(ax).total_cmp(&b.0.coordinate(ax)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.1.cmp(&b.1))
}

fn build_recursive<E: Embedding>(
    mut points: Vec<BuildPoint<E>>,
    dimension: usize,
    depth: usize,
) -> Option<Box<KdNode<E>>> {
    if points.is_empty() {
        return None;
    }

    let axis = if dimension == 0 { 0 } else { depth % dimension };
    let mid = points.len() / 2;

    // Under a total order, selection puts exactly the median a full sort would
    // at `mid`, with the lower-ranked points before it and the rest after.
    points.select_nth_unstable_by(mid, |a, b| compare_points(a, b, axis, dimension));

    let right_points = points.split_off(mid + 1);
    let (embedding, id) = points.pop()?;
    let left_points = points;

    let mut node = KdNode::new(embedding, id);
    node.left = build_recursive(left_points, dimension, depth + 1);
    node.right = build_recursive(right_points, dimension, depth + 1);
    Some(Box::new(node))
}

impl<E: Embedding> KdTree<E> {
    /// Builds a tree; see [`build_kdtree`].
    pub fn build(points: Vec<(E, PointId)>, dimension: usize) -> Result<Self, KdTreeError> {
        build_kdtree(points, dimension)
    }
}
