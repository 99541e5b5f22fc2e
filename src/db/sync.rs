//! Thread-safe wrapper for concurrent map access.
//!
//! `SyncPlaceMap` wraps a [`PlaceMap`] in `Arc<RwLock<_>>`. Queries take the
//! read lock and run concurrently; inserts, deletes and service edits take the
//! write lock.
//!
//! # Examples
//!
//! ```rust
//! use placemap::{Service, SyncPlaceMap};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let map = SyncPlaceMap::new()?;
//!
//! let writer = map.clone();
//! let handle = thread::spawn(move || {
//!     writer.insert(10, 10, Service::Hospital).unwrap();
//! });
//! handle.join().unwrap();
//!
//! assert_eq!(map.k_nearest_by_service(0, 0, 1, Service::Hospital).len(), 1);
//! # Ok(())
//! # }
//! ```

use super::PlaceMap;
use crate::{BoundingBox, Config, IndexStats, MapStats, NearestQuery, Place, Result, ServiceMask};
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe wrapper around `PlaceMap` using `Arc<RwLock<PlaceMap>>`.
///
/// Cloning is cheap and every clone shares the same map.
#[derive(Clone)]
pub struct SyncPlaceMap {
    inner: Arc<RwLock<PlaceMap>>,
}

impl SyncPlaceMap {
    /// Creates an empty map with the default configuration.
    pub fn new() -> Result<Self> {
        Ok(Self::from_map(PlaceMap::new()?))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self::from_map(PlaceMap::with_config(config)?))
    }

    pub fn from_map(map: PlaceMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    // ===== Mutations =====

    pub fn insert(&self, x: i32, y: i32, services: impl Into<ServiceMask>) -> Result<()> {
        self.inner.write().insert(x, y, services)
    }

    pub fn insert_named<S: AsRef<str>>(&self, x: i32, y: i32, services: &[S]) -> Result<()> {
        self.inner.write().insert_named(x, y, services)
    }

    pub fn delete(&self, x: i32, y: i32) -> bool {
        self.inner.write().delete(x, y)
    }

    pub fn edit_services(&self, x: i32, y: i32, services: impl Into<ServiceMask>) -> bool {
        self.inner.write().edit_services(x, y, services)
    }

    pub fn add_services(&self, x: i32, y: i32, services: impl Into<ServiceMask>) -> bool {
        self.inner.write().add_services(x, y, services)
    }

    pub fn remove_services(&self, x: i32, y: i32, services: impl Into<ServiceMask>) -> bool {
        self.inner.write().remove_services(x, y, services)
    }

    pub fn clear(&self) {
        self.inner.write().clear()
    }

    // ===== Queries =====

    pub fn get(&self, x: i32, y: i32) -> Option<Place> {
        self.inner.read().get(x, y)
    }

    pub fn range_query(&self, rect: &BoundingBox) -> Vec<Place> {
        self.inner.read().range_query(rect)
    }

    pub fn range_query_by_service(
        &self,
        rect: &BoundingBox,
        services: impl Into<ServiceMask>,
        k: usize,
    ) -> Vec<Place> {
        self.inner.read().range_query_by_service(rect, services, k)
    }

    pub fn k_nearest_by_service(
        &self,
        x: i32,
        y: i32,
        k: usize,
        services: impl Into<ServiceMask>,
    ) -> Vec<Place> {
        self.inner.read().k_nearest_by_service(x, y, k, services)
    }

    pub fn k_nearest(&self, query: &NearestQuery) -> Vec<Place> {
        self.inner.read().k_nearest(query)
    }

    pub fn count_places(&self) -> usize {
        self.inner.read().count_places()
    }

    pub fn index_stats(&self) -> IndexStats {
        self.inner.read().index_stats()
    }

    /// Snapshot of the mutation counters.
    pub fn stats(&self) -> MapStats {
        self.inner.read().stats().clone()
    }

    /// Run `f` with shared access to the wrapped map.
    pub fn read<R>(&self, f: impl FnOnce(&PlaceMap) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the wrapped map.
    pub fn write<R>(&self, f: impl FnOnce(&mut PlaceMap) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Service;
    use std::thread;

    #[test]
    fn test_concurrent_inserts() {
        let map = SyncPlaceMap::with_config(
            Config::default().with_world(BoundingBox::new(0, 0, 1_000, 1_000)),
        )
        .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let map = map.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        map.insert(t * 200 + i, i, Service::Atm).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.count_places(), 400);
        assert_eq!(map.stats().inserts, 400);
        let first_thread = BoundingBox::new(0, 0, 200, 1_000);
        assert_eq!(map.range_query(&first_thread).len(), 100);
        assert_eq!(map.range_query_by_service(&first_thread, Service::Atm, 5).len(), 5);
    }

    #[test]
    fn test_readers_see_writes() {
        let map = SyncPlaceMap::new().unwrap();
        map.insert(5, 5, Service::Park).unwrap();
        assert!(map.add_services(5, 5, Service::Library));

        let reader = map.clone();
        let services = thread::spawn(move || reader.get(5, 5).map(|p| p.services()))
            .join()
            .unwrap();
        assert_eq!(services, Some(Service::Park | Service::Library));

        assert!(map.delete(5, 5));
        assert_eq!(map.read(|m| m.len()), 0);
    }
}
