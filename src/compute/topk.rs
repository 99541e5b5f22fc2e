//! Bounded max-heap for k-nearest-neighbour ranking.

use placemap_types::place::Place;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordered by squared distance to the query target (max-heap, so
/// the worst candidate sits at the root).
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: u64,
    place: Place,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.cmp(&other.distance)
    }
}

/// Keeps the `k` places closest to a fixed target.
///
/// Built per query and dropped afterwards. Once full, a new place is only
/// admitted when it is strictly closer than the current worst candidate, so
/// ties never displace an earlier place.
///
/// # Examples
///
/// ```
/// use placemap::compute::BoundedTopK;
/// use placemap::{Place, ServiceMask};
///
/// let mut top = BoundedTopK::new(2, 0, 0);
/// top.offer(Place::new(5, 0, ServiceMask::NONE));
/// top.offer(Place::new(1, 0, ServiceMask::NONE));
/// top.offer(Place::new(3, 0, ServiceMask::NONE));
///
/// let xs: Vec<i32> = top.into_sorted_vec().iter().map(|p| p.x()).collect();
/// assert_eq!(xs, vec![1, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedTopK {
    heap: BinaryHeap<Candidate>,
    capacity: usize,
    target: (i32, i32),
}

impl BoundedTopK {
    pub fn new(k: usize, target_x: i32, target_y: i32) -> Self {
        Self {
            // k is caller-supplied; cap the up-front reservation.
            heap: BinaryHeap::with_capacity(k.min(1024)),
            capacity: k,
            target: (target_x, target_y),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Squared distance from `place` to the target.
    pub fn distance_to_target(&self, place: &Place) -> u64 {
        place.distance_squared_to(self.target.0, self.target.1)
    }

    /// Offer a place, returning whether it was admitted.
    pub fn offer(&mut self, place: Place) -> bool {
        let distance = self.distance_to_target(&place);
        if self.heap.len() < self.capacity {
            self.heap.push(Candidate { distance, place });
            return true;
        }
        match self.heap.peek_mut() {
            Some(mut worst) if distance < worst.distance => {
                // Dropping the PeekMut guard sifts the replacement down.
                *worst = Candidate { distance, place };
                true
            }
            _ => false,
        }
    }

    /// Current worst-of-the-best candidate.
    pub fn peek_worst(&self) -> Option<&Place> {
        self.heap.peek().map(|candidate| &candidate.place)
    }

    /// Distance a subtree must beat to be worth visiting.
    ///
    /// `None` while the heap still has room, since every candidate is admitted
    /// until then.
    pub fn pruning_distance(&self) -> Option<u64> {
        if self.is_full() {
            self.heap.peek().map(|candidate| candidate.distance)
        } else {
            None
        }
    }

    /// Empty the heap, returning places in ascending distance order.
    pub fn drain(&mut self) -> Vec<Place> {
        let mut results = Vec::with_capacity(self.heap.len());
        while let Some(candidate) = self.heap.pop() {
            results.push(candidate.place);
        }
        results.reverse();
        results
    }

    pub fn into_sorted_vec(mut self) -> Vec<Place> {
        self.drain()
    }
}
