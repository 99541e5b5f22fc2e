//! Builder for place maps.

use crate::config::Config;
use crate::db::PlaceMap;
use crate::error::Result;
use crate::index::Backend;
use placemap_types::bbox::BoundingBox;

/// Builder collecting map settings before the index is created.
#[derive(Debug, Default)]
pub struct PlaceMapBuilder {
    config: Config,
}

impl PlaceMapBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the world rectangle places must fall inside.
    pub fn world(mut self, world: BoundingBox) -> Self {
        self.config = self.config.with_world(world);
        self
    }

    pub fn leaf_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_leaf_capacity(capacity);
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.config = self.config.with_backend(backend);
        self
    }

    /// Replace every setting with `config`.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the map, failing if the collected configuration is invalid.
    pub fn build(self) -> Result<PlaceMap> {
        PlaceMap::with_config(self.config)
    }

    #[cfg(feature = "sync")]
    pub fn build_sync(self) -> Result<crate::db::SyncPlaceMap> {
        Ok(crate::db::SyncPlaceMap::from_map(self.build()?))
    }
}
