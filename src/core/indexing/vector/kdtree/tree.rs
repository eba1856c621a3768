// src/core/indexing/vector/kdtree/tree.rs

//! Defines the core KD-Tree structures: `KdNode` and `KdTree`.

use crate::core::types::{Embedding, PointId};

/// Represents one indexed point in the KD-Tree.
///
/// Every node holds a point; there are no separate leaf buckets. A node owns
/// its two subtrees exclusively and is never mutated once the builder has
/// returned it.
#[derive(Debug)]
pub struct KdNode<E> {
    pub(super) embedding: E,
    pub(super) id: PointId,
    pub(super) left: Option<Box<KdNode<E>>>,
    pub(super) right: Option<Box<KdNode<E>>>,
}

impl<E> KdNode<E> {
    pub(super) fn new(embedding: E, id: PointId) -> Self {
        Self { embedding, id, left: None, right: None }
    }

    pub fn embedding(&self) -> &E {
        &self.embedding
    }

    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn left(&self) -> Option<&KdNode<E>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&KdNode<E>> {
        self.right.as_deref()
    }
}

/// Represents a KD-Tree.
///
/// The dimension is fixed when the tree is built and every later query is
/// checked against it. Searching only borrows the tree, so any number of
/// threads may query the same tree at once.
#[derive(Debug)]
pub struct KdTree<E> {
    pub(super) root: Option<Box<KdNode<E>>>,
    pub(super) dimension: usize,
    pub(super) len: usize,
}

impl<E: Embedding> KdTree<E> {
    /// Creates an empty tree for a given dimension.
    /// Populated trees come from [`super::builder::build_kdtree`].
    pub fn new(dimension: usize) -> Self {
        KdTree { root: None, dimension, len: 0 }
    }

    /// Returns the dimensionality of the embeddings this tree indexes.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&KdNode<E>> {
        self.root.as_deref()
    }

    /// Number of levels on the longest root-to-leaf path; 0 for an empty tree.
    pub fn height(&self) -> usize {
        fn height_of<E>(node: Option<&KdNode<E>>) -> usize {
            match node {
                None => 0,
                Some(n) => 1 + height_of(n.left()).max(height_of(n.right())),
            }
        }
        height_of(self.root())
    }

    /// Visits every node in pre-order together with its depth (root = 0).
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&KdNode<E>, usize),
    {
        fn walk_node<E, F: FnMut(&KdNode<E>, usize)>(node: &KdNode<E>, depth: usize, visit: &mut F) {
            visit(node, depth);
            if let Some(left) = node.left() {
                walk_node(left, depth + 1, visit);
            }
            if let Some(right) = node.right() {
                walk_node(right, depth + 1, visit);
            }
        }
        if let Some(root) = self.root() {
            walk_node(root, 0, &mut visit);
        }
    }

    /// Releases every node, children before their parent, and returns how
    /// many nodes were released.
    ///
    /// Consuming `self` makes a second release or a later search impossible.
    /// Simply dropping the tree releases the same nodes.
    pub fn free(mut self) -> usize {
        fn release<E>(node: Option<Box<KdNode<E>>>) -> usize {
            match node {
                None => 0,
                Some(mut n) => {
                    let released = release(n.left.take()) + release(n.right.take());
                    drop(n);
                    released + 1
                }
            }
        }
        let released = release(self.root.take());
        log::debug!("released {} KD-Tree nodes", released);
        released
    }
}
