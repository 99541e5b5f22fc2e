//! Region quadtree over a fixed world rectangle.

use super::{NearestQuery, PlaceIndex};
use crate::compute::topk::BoundedTopK;
use crate::compute::validation::validate_in_world;
use crate::error::Result;
use placemap_types::bbox::BoundingBox;
use placemap_types::place::Place;
use placemap_types::service::ServiceMask;
use placemap_types::stats::IndexStats;
use std::mem;

/// Places a leaf holds before it splits.
pub const DEFAULT_LEAF_CAPACITY: usize = 64;

/// Quadtree splitting leaves into four quadrants once they overflow.
///
/// A leaf holding `capacity` places splits before accepting another one, and
/// its places are routed to the children with the same rule used for inserts.
/// Leaves covering a single coordinate cannot split and grow past capacity
/// instead. Nodes never merge back after deletions.
#[derive(Debug, Clone)]
pub struct QuadTree {
    root: Node,
    capacity: usize,
}

#[derive(Debug, Clone)]
struct Node {
    bounds: BoundingBox,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Leaf(Vec<Place>),
    /// Children in [`BoundingBox::quadrants`] order.
    Internal(Box<[Node; 4]>),
}

impl Node {
    fn leaf(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    fn split(&mut self) {
        let children = Box::new(self.bounds.quadrants().map(Node::leaf));
        let previous = mem::replace(&mut self.kind, NodeKind::Internal(children));
        if let (NodeKind::Leaf(bucket), NodeKind::Internal(children)) = (previous, &mut self.kind) {
            log::debug!("Splitting {} holding {} places", self.bounds, bucket.len());
            for place in bucket {
                let quadrant = self.bounds.quadrant_of(place.x(), place.y());
                if let NodeKind::Leaf(child) = &mut children[quadrant].kind {
                    child.push(place);
                }
            }
        }
    }

    fn insert(&mut self, place: Place, capacity: usize) {
        let mut node = self;
        loop {
            if let NodeKind::Leaf(bucket) = &node.kind
                && bucket.len() >= capacity
                && node.bounds.can_split()
            {
                node.split();
            }
            let quadrant = node.bounds.quadrant_of(place.x(), place.y());
            match &mut node.kind {
                NodeKind::Leaf(bucket) => {
                    bucket.push(place);
                    return;
                }
                NodeKind::Internal(children) => node = &mut children[quadrant],
            }
        }
    }

    fn range_into(&self, rect: &BoundingBox, out: &mut Vec<Place>) {
        if !self.bounds.intersects(rect) {
            return;
        }
        match &self.kind {
            NodeKind::Leaf(bucket) => out.extend(
                bucket
                    .iter()
                    .filter(|place| rect.contains(place.x(), place.y())),
            ),
            NodeKind::Internal(children) => {
                for child in children.iter() {
                    child.range_into(rect, out);
                }
            }
        }
    }

    fn nearest_into(&self, query: &NearestQuery, limit: Option<u64>, top: &mut BoundedTopK) {
        match &self.kind {
            NodeKind::Leaf(bucket) => {
                for place in bucket.iter().filter(|place| query.accepts(place)) {
                    let distance = top.distance_to_target(place);
                    if limit.is_none_or(|limit| distance <= limit) {
                        top.offer(*place);
                    }
                }
            }
            NodeKind::Internal(children) => {
                let mut order: [(u64, usize); 4] = std::array::from_fn(|quadrant| {
                    let distance = children[quadrant]
                        .bounds
                        .min_distance_squared(query.x, query.y);
                    (distance, quadrant)
                });
                order.sort_unstable();
                for (distance, quadrant) in order {
                    // Children are sorted, so nothing after a pruned one can do better.
                    if limit.is_some_and(|limit| distance > limit) {
                        break;
                    }
                    if top.pruning_distance().is_some_and(|worst| distance >= worst) {
                        break;
                    }
                    children[quadrant].nearest_into(query, limit, top);
                }
            }
        }
    }

    fn count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(bucket) => bucket.len(),
            NodeKind::Internal(children) => children.iter().map(Node::count).sum(),
        }
    }

    fn collect_stats(&self, depth: usize, stats: &mut IndexStats) {
        stats.max_depth = stats.max_depth.max(depth);
        match &self.kind {
            NodeKind::Leaf(bucket) => {
                stats.leaves += 1;
                stats.places += bucket.len();
            }
            NodeKind::Internal(children) => {
                stats.internal_nodes += 1;
                for child in children.iter() {
                    child.collect_stats(depth + 1, stats);
                }
            }
        }
    }
}

impl QuadTree {
    /// Create an empty tree over `world`.
    ///
    /// A capacity of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemap::{BoundingBox, PlaceIndex, QuadTree, Service};
    ///
    /// let mut tree = QuadTree::new(BoundingBox::new(0, 0, 1000, 1000), 4);
    /// tree.insert(10, 20, Service::Park.mask()).unwrap();
    /// assert_eq!(tree.count_places(), 1);
    /// ```
    pub fn new(world: BoundingBox, capacity: usize) -> Self {
        Self {
            root: Node::leaf(world),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn bucket(&self, x: i32, y: i32) -> Option<&Vec<Place>> {
        if !self.root.bounds.contains(x, y) {
            return None;
        }
        let mut node = &self.root;
        loop {
            match &node.kind {
                NodeKind::Leaf(bucket) => return Some(bucket),
                NodeKind::Internal(children) => node = &children[node.bounds.quadrant_of(x, y)],
            }
        }
    }

    fn bucket_mut(&mut self, x: i32, y: i32) -> Option<&mut Vec<Place>> {
        if !self.root.bounds.contains(x, y) {
            return None;
        }
        let mut node = &mut self.root;
        loop {
            let quadrant = node.bounds.quadrant_of(x, y);
            match &mut node.kind {
                NodeKind::Leaf(bucket) => return Some(bucket),
                NodeKind::Internal(children) => node = &mut children[quadrant],
            }
        }
    }
}

impl PlaceIndex for QuadTree {
    fn bounds(&self) -> BoundingBox {
        self.root.bounds
    }

    fn insert(&mut self, x: i32, y: i32, services: ServiceMask) -> Result<()> {
        validate_in_world(&self.root.bounds, x, y)?;
        self.root.insert(Place::new(x, y, services), self.capacity);
        Ok(())
    }

    fn delete(&mut self, x: i32, y: i32) -> bool {
        let Some(bucket) = self.bucket_mut(x, y) else {
            return false;
        };
        match bucket.iter().position(|place| place.is_at(x, y)) {
            Some(position) => {
                bucket.remove(position);
                true
            }
            None => false,
        }
    }

    fn get(&self, x: i32, y: i32) -> Option<Place> {
        self.bucket(x, y)?
            .iter()
            .find(|place| place.is_at(x, y))
            .copied()
    }

    fn update_services(
        &mut self,
        x: i32,
        y: i32,
        edit: &mut dyn FnMut(&mut ServiceMask),
    ) -> bool {
        let place = self
            .bucket_mut(x, y)
            .and_then(|bucket| bucket.iter_mut().find(|place| place.is_at(x, y)));
        match place {
            Some(place) => {
                edit(place.services_mut());
                true
            }
            None => false,
        }
    }

    fn range_query(&self, rect: &BoundingBox) -> Vec<Place> {
        let mut results = Vec::new();
        self.root.range_into(rect, &mut results);
        log::trace!("Range query {} matched {} places", rect, results.len());
        results
    }

    fn k_nearest(&self, query: &NearestQuery) -> Vec<Place> {
        if query.is_vacuous() {
            return Vec::new();
        }
        let mut top = BoundedTopK::new(query.k, query.x, query.y);
        self.root
            .nearest_into(query, query.max_distance_squared(), &mut top);
        let results = top.into_sorted_vec();
        log::trace!(
            "Nearest query at ({}, {}) returned {} of {} requested",
            query.x,
            query.y,
            results.len(),
            query.k
        );
        results
    }

    fn count_places(&self) -> usize {
        self.root.count()
    }

    fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::default();
        self.root.collect_stats(0, &mut stats);
        stats
    }

    fn clear(&mut self) {
        self.root = Node::leaf(self.root.bounds);
    }
}
