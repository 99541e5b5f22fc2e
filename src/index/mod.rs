//! Spatial index backends.
//!
//! [`QuadTree`] is the default backend. [`KdTree`] answers the same queries and
//! is selectable through [`Backend`] for comparison.

use crate::compute::topk::BoundedTopK;
use crate::config::Config;
use crate::error::Result;
use placemap_types::bbox::BoundingBox;
use placemap_types::place::Place;
use placemap_types::service::ServiceMask;
use placemap_types::stats::IndexStats;
use serde::{Deserialize, Serialize};
use std::fmt;

mod kdtree;
mod quadtree;

pub use kdtree::KdTree;
pub use quadtree::{DEFAULT_LEAF_CAPACITY, QuadTree};

/// How a place's services are compared with the requested mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMatch {
    /// The place offers at least one requested service.
    #[default]
    Any,
    /// The place offers every requested service.
    All,
}

/// Parameters of a k-nearest-neighbour search.
///
/// # Examples
///
/// ```
/// use placemap::{NearestQuery, Service, ServiceMatch};
///
/// let query = NearestQuery::new(100, 100, 5, Service::Atm | Service::Pharmacy)
///     .matching(ServiceMatch::All)
///     .within(250.0);
/// assert_eq!(query.k, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestQuery {
    pub x: i32,
    pub y: i32,
    pub k: usize,
    pub services: ServiceMask,
    pub matching: ServiceMatch,
    /// Inclusive Euclidean radius around the target.
    pub max_distance: Option<f64>,
}

impl NearestQuery {
    pub fn new(x: i32, y: i32, k: usize, services: ServiceMask) -> Self {
        Self {
            x,
            y,
            k,
            services,
            matching: ServiceMatch::Any,
            max_distance: None,
        }
    }

    pub fn matching(mut self, matching: ServiceMatch) -> Self {
        self.matching = matching;
        self
    }

    pub fn within(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    /// Whether a place's services satisfy the query.
    pub fn accepts(&self, place: &Place) -> bool {
        match self.matching {
            ServiceMatch::Any => place.services().contains_any(self.services),
            ServiceMatch::All => place.services().contains_all(self.services),
        }
    }

    /// Largest admissible squared distance, if the query has a radius.
    ///
    /// A negative or NaN radius admits nothing.
    pub fn max_distance_squared(&self) -> Option<u64> {
        self.max_distance.map(|radius| {
            if radius.is_nan() || radius < 0.0 {
                return 0;
            }
            // floor(r^2) bounds every integer squared distance <= r^2.
            let squared = (radius * radius).floor();
            if squared >= u64::MAX as f64 {
                u64::MAX
            } else {
                squared as u64
            }
        })
    }

    /// True when no place can ever be returned.
    pub(crate) fn is_vacuous(&self) -> bool {
        self.k == 0
            || (self.matching == ServiceMatch::Any && self.services.is_empty())
            || self.max_distance.is_some_and(|r| r.is_nan() || r < 0.0)
    }
}

/// Index backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    QuadTree,
    KdTree,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::QuadTree => write!(f, "quad_tree"),
            Backend::KdTree => write!(f, "kd_tree"),
        }
    }
}

/// Operations shared by every place index.
///
/// Lookups are by exact coordinate pair. When several places share a
/// coordinate, point operations act on the first one found.
pub trait PlaceIndex: Send + Sync {
    /// World rectangle accepted by [`insert`](Self::insert).
    fn bounds(&self) -> BoundingBox;

    /// Insert a place, failing with `OutOfBounds` outside the world.
    fn insert(&mut self, x: i32, y: i32, services: ServiceMask) -> Result<()>;

    /// Remove one place at `(x, y)`, returning whether one was found.
    fn delete(&mut self, x: i32, y: i32) -> bool;

    fn get(&self, x: i32, y: i32) -> Option<Place>;

    /// Apply `edit` to the mask of the place at `(x, y)`.
    fn update_services(&mut self, x: i32, y: i32, edit: &mut dyn FnMut(&mut ServiceMask))
    -> bool;

    /// Replace the services of the place at `(x, y)`.
    fn edit_services(&mut self, x: i32, y: i32, services: ServiceMask) -> bool {
        self.update_services(x, y, &mut |mask| *mask = services)
    }

    fn add_services(&mut self, x: i32, y: i32, services: ServiceMask) -> bool {
        self.update_services(x, y, &mut |mask| *mask |= services)
    }

    fn remove_services(&mut self, x: i32, y: i32, services: ServiceMask) -> bool {
        self.update_services(x, y, &mut |mask| *mask = *mask - services)
    }

    /// Every place inside `rect`.
    fn range_query(&self, rect: &BoundingBox) -> Vec<Place>;

    /// Up to `k` places inside `rect` offering any of `services`, closest to
    /// the centre of `rect` first.
    fn range_query_by_service(
        &self,
        rect: &BoundingBox,
        services: ServiceMask,
        k: usize,
    ) -> Vec<Place> {
        if k == 0 || services.is_empty() {
            return Vec::new();
        }
        let (center_x, center_y) = rect.midpoint();
        let clamp = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let mut top = BoundedTopK::new(k, clamp(center_x), clamp(center_y));
        for place in self.range_query(rect) {
            if place.services().contains_any(services) {
                top.offer(place);
            }
        }
        top.into_sorted_vec()
    }

    /// Up to `query.k` matching places, nearest first.
    fn k_nearest(&self, query: &NearestQuery) -> Vec<Place>;

    fn k_nearest_by_service(&self, x: i32, y: i32, k: usize, services: ServiceMask) -> Vec<Place> {
        self.k_nearest(&NearestQuery::new(x, y, k, services))
    }

    fn count_places(&self) -> usize;

    fn stats(&self) -> IndexStats;

    /// Drop every place.
    fn clear(&mut self);
}

/// Build an empty index for `config`.
pub fn create_index(config: &Config) -> Result<Box<dyn PlaceIndex>> {
    config.check()?;
    log::debug!(
        "Creating {} index over {} (leaf capacity {})",
        config.backend,
        config.world,
        config.leaf_capacity
    );
    let index: Box<dyn PlaceIndex> = match config.backend {
        Backend::QuadTree => Box::new(QuadTree::new(config.world, config.leaf_capacity)),
        Backend::KdTree => Box::new(KdTree::new(config.world)),
    };
    Ok(index)
}
