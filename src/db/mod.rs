//! The `PlaceMap` facade over an index backend.
//!
//! `PlaceMap` owns one [`PlaceIndex`] chosen by [`Config::backend`], counts
//! mutations in [`MapStats`] and logs rejected inserts. With the `sync` feature
//! [`SyncPlaceMap`] shares a map between threads.

use crate::compute::encode_services;
use crate::config::Config;
use crate::error::Result;
use crate::index::{Backend, NearestQuery, PlaceIndex, create_index};
use placemap_types::bbox::BoundingBox;
use placemap_types::place::Place;
use placemap_types::service::ServiceMask;
use placemap_types::stats::{IndexStats, MapStats};
use std::fmt;

#[cfg(feature = "sync")]
mod sync;

#[cfg(feature = "sync")]
pub use sync::SyncPlaceMap;

/// Index of places keyed by integer coordinates.
///
/// # Examples
///
/// ```
/// use placemap::{BoundingBox, PlaceMap, Service};
///
/// # fn main() -> placemap::Result<()> {
/// let mut map = PlaceMap::builder()
///     .world(BoundingBox::new(0, 0, 1_000, 1_000))
///     .leaf_capacity(16)
///     .build()?;
///
/// map.insert(120, 80, Service::Restaurant | Service::Atm)?;
/// map.insert(900, 900, Service::Atm.mask())?;
///
/// let nearest = map.k_nearest_by_service(100, 100, 1, Service::Atm.mask());
/// assert_eq!(nearest[0].coordinates(), (120, 80));
/// # Ok(())
/// # }
/// ```
pub struct PlaceMap {
    index: Box<dyn PlaceIndex>,
    config: Config,
    stats: MapStats,
}

impl PlaceMap {
    /// Create an empty map with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create an empty map, failing if `config` is invalid.
    pub fn with_config(config: Config) -> Result<Self> {
        let index = create_index(&config)?;
        Ok(Self {
            index,
            config,
            stats: MapStats::new(),
        })
    }

    pub fn builder() -> crate::builder::PlaceMapBuilder {
        crate::builder::PlaceMapBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> Backend {
        self.config.backend
    }

    /// World rectangle places must fall inside.
    pub fn bounds(&self) -> BoundingBox {
        self.index.bounds()
    }

    /// Insert a place offering `services`.
    ///
    /// Fails with [`OutOfBounds`](crate::PlaceMapError::OutOfBounds) outside the world, leaving
    /// the map unchanged.
    pub fn insert(&mut self, x: i32, y: i32, services: impl Into<ServiceMask>) -> Result<()> {
        match self.index.insert(x, y, services.into()) {
            Ok(()) => {
                self.stats.record_insert();
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected insert: {}", e);
                self.stats.record_rejected_insert();
                Err(e)
            }
        }
    }

    /// Insert a place whose services are given by name.
    pub fn insert_named<S: AsRef<str>>(&mut self, x: i32, y: i32, services: &[S]) -> Result<()> {
        let mask = encode_services(services)?;
        self.insert(x, y, mask)
    }

    /// Remove one place at `(x, y)`.
    pub fn delete(&mut self, x: i32, y: i32) -> bool {
        let found = self.index.delete(x, y);
        self.stats.record_delete(found);
        found
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Place> {
        self.index.get(x, y)
    }

    /// Replace the services of the place at `(x, y)`.
    pub fn edit_services(&mut self, x: i32, y: i32, services: impl Into<ServiceMask>) -> bool {
        let found = self.index.edit_services(x, y, services.into());
        self.stats.record_edit(found);
        found
    }

    pub fn add_services(&mut self, x: i32, y: i32, services: impl Into<ServiceMask>) -> bool {
        let found = self.index.add_services(x, y, services.into());
        self.stats.record_edit(found);
        found
    }

    pub fn remove_services(&mut self, x: i32, y: i32, services: impl Into<ServiceMask>) -> bool {
        let found = self.index.remove_services(x, y, services.into());
        self.stats.record_edit(found);
        found
    }

    /// Every place inside `rect`.
    pub fn range_query(&self, rect: &BoundingBox) -> Vec<Place> {
        self.index.range_query(rect)
    }

    /// Places inside the rectangle at `(x, y)` with signed extents.
    ///
    /// Fails with [`InvalidInput`](crate::PlaceMapError::InvalidInput) for negative extents.
    pub fn range_query_checked(
        &self,
        x: i32,
        y: i32,
        width: i64,
        height: i64,
    ) -> Result<Vec<Place>> {
        let rect = crate::compute::validation::bounding_box(x, y, width, height)?;
        Ok(self.range_query(&rect))
    }

    /// Up to `k` places inside `rect` offering any of `services`, closest to
    /// the centre of `rect` first.
    pub fn range_query_by_service(
        &self,
        rect: &BoundingBox,
        services: impl Into<ServiceMask>,
        k: usize,
    ) -> Vec<Place> {
        self.index.range_query_by_service(rect, services.into(), k)
    }

    /// Up to `k` places offering any of `services`, nearest first.
    pub fn k_nearest_by_service(
        &self,
        x: i32,
        y: i32,
        k: usize,
        services: impl Into<ServiceMask>,
    ) -> Vec<Place> {
        self.index.k_nearest_by_service(x, y, k, services.into())
    }

    pub fn k_nearest(&self, query: &NearestQuery) -> Vec<Place> {
        self.index.k_nearest(query)
    }

    pub fn count_places(&self) -> usize {
        self.index.count_places()
    }

    pub fn len(&self) -> usize {
        self.count_places()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every place. Operation counters are kept.
    pub fn clear(&mut self) {
        log::debug!("Clearing {} places", self.count_places());
        self.index.clear();
    }

    /// Shape of the underlying index.
    pub fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn stats(&self) -> &MapStats {
        &self.stats
    }
}

impl fmt::Debug for PlaceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceMap")
            .field("config", &self.config)
            .field("places", &self.count_places())
            .field("stats", &self.stats)
            .finish()
    }
}
