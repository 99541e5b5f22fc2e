//! Point KD-tree alternating between the x and y axes.
//!
//! Traversals use explicit stacks since the tree is not rebalanced and sorted
//! inserts degrade it into a list.

use super::{NearestQuery, PlaceIndex};
use crate::compute::topk::BoundedTopK;
use crate::compute::validation::validate_in_world;
use crate::error::Result;
use placemap_types::bbox::BoundingBox;
use placemap_types::place::Place;
use placemap_types::service::ServiceMask;
use placemap_types::stats::IndexStats;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn next(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    fn pick(self, x: i32, y: i32) -> i32 {
        match self {
            Axis::X => x,
            Axis::Y => y,
        }
    }

    fn key(self, place: &Place) -> i32 {
        self.pick(place.x(), place.y())
    }

    /// Inclusive lower and exclusive upper edge of `rect` along this axis.
    fn span(self, rect: &BoundingBox) -> (i64, i64) {
        match self {
            Axis::X => (rect.min_x(), rect.end_x()),
            Axis::Y => (rect.min_y(), rect.end_y()),
        }
    }
}

struct KdNode {
    place: Place,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
}

impl KdNode {
    fn new(place: Place) -> Self {
        Self {
            place,
            left: None,
            right: None,
        }
    }
}

type Slot = Option<Box<KdNode>>;

/// KD-tree holding one place per node.
///
/// Keys strictly below a node's split value go left, everything else goes
/// right. Deleting an inner node pulls up the minimum of a subtree along the
/// node's split axis so that ordering survives.
pub struct KdTree {
    bounds: BoundingBox,
    root: Slot,
    len: usize,
}

impl KdTree {
    /// Create an empty tree accepting places inside `world`.
    pub fn new(world: BoundingBox) -> Self {
        Self {
            bounds: world,
            root: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("bounds", &self.bounds)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl Drop for KdTree {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Walk down from `slot` to the first node accepted by `hit`, routing on
/// `(x, y)`. Returns the slot holding that node and its split axis.
fn descend<'a>(
    mut slot: &'a mut Slot,
    mut axis: Axis,
    x: i32,
    y: i32,
    hit: impl Fn(&Place) -> bool,
) -> Option<(&'a mut Slot, Axis)> {
    loop {
        let found = match slot.as_deref() {
            Some(node) => hit(&node.place),
            None => return None,
        };
        if found {
            return Some((slot, axis));
        }
        let Some(node) = slot else {
            return None;
        };
        slot = if axis.pick(x, y) < axis.key(&node.place) {
            &mut node.left
        } else {
            &mut node.right
        };
        axis = axis.next();
    }
}

/// Smallest place along `axis` in the subtree rooted at `node`.
fn find_min(node: &KdNode, node_axis: Axis, axis: Axis) -> Place {
    let mut best = node.place;
    let mut stack = vec![(node, node_axis)];
    while let Some((node, node_axis)) = stack.pop() {
        if axis.key(&node.place) < axis.key(&best) {
            best = node.place;
        }
        if let Some(left) = node.left.as_deref() {
            stack.push((left, node_axis.next()));
        }
        // Right keys are never below the split when splitting on `axis`.
        if node_axis != axis
            && let Some(right) = node.right.as_deref()
        {
            stack.push((right, node_axis.next()));
        }
    }
    best
}

/// Remove the node held in `slot`.
fn remove_node(mut slot: &mut Slot, mut axis: Axis) {
    loop {
        // A leaf is unlinked before `slot` is reborrowed for the descent.
        if slot
            .as_deref()
            .is_none_or(|node| node.left.is_none() && node.right.is_none())
        {
            *slot = None;
            return;
        }
        let Some(node) = slot.as_mut() else {
            return;
        };
        let replacement = if let Some(right) = node.right.as_deref() {
            find_min(right, axis.next(), axis)
        } else if let Some(left) = node.left.take() {
            let min = find_min(&left, axis.next(), axis);
            node.right = Some(left);
            min
        } else {
            return;
        };
        node.place = replacement;
        let (x, y) = replacement.coordinates();
        let Some(next) = descend(&mut node.right, axis.next(), x, y, |place| {
            *place == replacement
        }) else {
            return;
        };
        (slot, axis) = next;
    }
}

impl PlaceIndex for KdTree {
    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn insert(&mut self, x: i32, y: i32, services: ServiceMask) -> Result<()> {
        validate_in_world(&self.bounds, x, y)?;
        let mut slot = &mut self.root;
        let mut axis = Axis::X;
        while let Some(node) = slot {
            slot = if axis.pick(x, y) < axis.key(&node.place) {
                &mut node.left
            } else {
                &mut node.right
            };
            axis = axis.next();
        }
        *slot = Some(Box::new(KdNode::new(Place::new(x, y, services))));
        self.len += 1;
        Ok(())
    }

    fn delete(&mut self, x: i32, y: i32) -> bool {
        match descend(&mut self.root, Axis::X, x, y, |place| place.is_at(x, y)) {
            Some((slot, axis)) => {
                remove_node(slot, axis);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    fn get(&self, x: i32, y: i32) -> Option<Place> {
        let mut current = self.root.as_deref();
        let mut axis = Axis::X;
        while let Some(node) = current {
            if node.place.is_at(x, y) {
                return Some(node.place);
            }
            current = if axis.pick(x, y) < axis.key(&node.place) {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
            axis = axis.next();
        }
        None
    }

    fn update_services(
        &mut self,
        x: i32,
        y: i32,
        edit: &mut dyn FnMut(&mut ServiceMask),
    ) -> bool {
        let node = descend(&mut self.root, Axis::X, x, y, |place| place.is_at(x, y))
            .and_then(|(slot, _)| slot.as_mut());
        match node {
            Some(node) => {
                edit(node.place.services_mut());
                true
            }
            None => false,
        }
    }

    fn range_query(&self, rect: &BoundingBox) -> Vec<Place> {
        let mut results = Vec::new();
        let mut stack: Vec<(&KdNode, Axis)> =
            self.root.as_deref().map(|n| (n, Axis::X)).into_iter().collect();
        while let Some((node, axis)) = stack.pop() {
            if rect.contains(node.place.x(), node.place.y()) {
                results.push(node.place);
            }
            let key = i64::from(axis.key(&node.place));
            let (low, high) = axis.span(rect);
            if let Some(right) = node.right.as_deref()
                && key < high
            {
                stack.push((right, axis.next()));
            }
            if let Some(left) = node.left.as_deref()
                && low < key
            {
                stack.push((left, axis.next()));
            }
        }
        log::trace!("Range query {} matched {} places", rect, results.len());
        results
    }

    fn k_nearest(&self, query: &NearestQuery) -> Vec<Place> {
        if query.is_vacuous() {
            return Vec::new();
        }
        let limit = query.max_distance_squared();
        let mut top = BoundedTopK::new(query.k, query.x, query.y);
        // Each entry carries a lower bound on distances inside its subtree.
        let mut stack: Vec<(&KdNode, Axis, u64)> = self
            .root
            .as_deref()
            .map(|n| (n, Axis::X, 0))
            .into_iter()
            .collect();
        while let Some((node, axis, bound)) = stack.pop() {
            if limit.is_some_and(|limit| bound > limit) {
                continue;
            }
            if top.pruning_distance().is_some_and(|worst| bound >= worst) {
                continue;
            }
            if query.accepts(&node.place) {
                let distance = top.distance_to_target(&node.place);
                if limit.is_none_or(|limit| distance <= limit) {
                    top.offer(node.place);
                }
            }

            let target = axis.pick(query.x, query.y);
            let key = axis.key(&node.place);
            let gap = (i64::from(target) - i64::from(key)).unsigned_abs();
            let far_bound = bound.max(gap.saturating_mul(gap));
            let (near, far) = if target < key {
                (node.left.as_deref(), node.right.as_deref())
            } else {
                (node.right.as_deref(), node.left.as_deref())
            };
            if let Some(far) = far {
                stack.push((far, axis.next(), far_bound));
            }
            if let Some(near) = near {
                stack.push((near, axis.next(), bound));
            }
        }
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
        self.len
    }

    fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::default();
        let mut stack: Vec<(&KdNode, usize)> =
            self.root.as_deref().map(|n| (n, 0)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            stats.places += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if node.left.is_none() && node.right.is_none() {
                stats.leaves += 1;
            } else {
                stats.internal_nodes += 1;
            }
            let children = [node.left.as_deref(), node.right.as_deref()];
            stack.extend(children.into_iter().flatten().map(|child| (child, depth + 1)));
        }
        stats
    }

    fn clear(&mut self) {
        // Unlink nodes one by one so dropping a degenerate tree cannot recurse deeply.
        let mut stack: Vec<Box<KdNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.len = 0;
    }
}
