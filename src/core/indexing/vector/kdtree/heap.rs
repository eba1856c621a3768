// src/core/indexing/vector/kdtree/heap.rs

//! Size-bounded max-heap holding the best K candidates of one search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::core::types::PointId;

/// One search result: the distance to the query and the point's id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub distance: f32,
    pub id: PointId,
}

impl Eq for Neighbor {}

// Larger distance compares greater, so `BinaryHeap` (a max-heap) keeps the
// current worst candidate at `peek()`. Ids break ties to keep the order total.
impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance).then_with(|| self.id.cmp(&other.id))
    }
}

/// The K closest candidates seen so far.
///
/// Owned by exactly one search; never share one between concurrent queries.
#[derive(Debug, Clone)]
pub struct KnnHeap {
    capacity: usize,
    items: BinaryHeap<Neighbor>,
}

impl KnnHeap {
    pub fn new(capacity: usize) -> Self {
        // k+1 to handle push then pop
        Self { capacity, items: BinaryHeap::with_capacity(capacity.saturating_add(1)) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Distance of the current worst candidate, if any.
    pub fn worst_distance(&self) -> Option<f32> {
        self.items.peek().map(|n| n.distance)
    }

    /// Offers a candidate. Below capacity it is always kept; at capacity it
    /// replaces the worst candidate only if strictly closer. Returns whether
    /// the candidate was kept.
    pub fn offer(&mut self, distance: f32, id: PointId) -> bool {
        if !self.is_full() {
            self.items.push(Neighbor { distance, id });
            return true;
        }
        match self.items.peek() {
            Some(worst) if distance < worst.distance => {
                self.items.pop();
                self.items.push(Neighbor { distance, id });
                true
            }
            _ => false,
        }
    }

    /// Lowers the capacity to `capacity` if it is smaller, dropping the worst
    /// candidates that no longer fit.
    pub fn limit_to(&mut self, capacity: usize) {
        if capacity >= self.capacity {
            return;
        }
        self.capacity = capacity;
        while self.items.len() > capacity {
            self.items.pop();
        }
    }

    /// Remaining candidates in arbitrary (heap) order.
    pub fn into_vec(self) -> Vec<Neighbor> {
        self.items.into_vec()
    }

    /// Remaining candidates, closest first.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.items.into_sorted_vec()
    }
}
