//! Configuration for place maps.
//!
//! Values can be built in code with the `with_*` methods or loaded from JSON
//! (and TOML with the `toml` feature). Loaded configurations are validated
//! before they are returned.
use crate::compute::validation::{LARGE_LEAF_CAPACITY, validate_leaf_capacity, validate_world};
use crate::error::Result;
use serde::de::Error;

pub use crate::index::Backend;
pub use placemap_types::bbox::BoundingBox;

/// Place map configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Places a quadtree leaf holds before splitting
    #[serde(default = "Config::default_leaf_capacity")]
    pub leaf_capacity: usize,

    #[serde(default)]
    pub backend: Backend,

    /// Rectangle every place must fall inside
    #[serde(default = "Config::default_world")]
    pub world: BoundingBox,
}

impl Config {
    const fn default_world() -> BoundingBox {
        BoundingBox::new(0, 0, 10_000_000, 10_000_000)
    }

    const fn default_leaf_capacity() -> usize {
        crate::index::DEFAULT_LEAF_CAPACITY
    }

    pub fn with_world(mut self, world: BoundingBox) -> Self {
        self.world = world;
        self
    }

    pub fn with_leaf_capacity(mut self, capacity: usize) -> Self {
        if capacity > LARGE_LEAF_CAPACITY {
            log::warn!(
                "Leaf capacity of {} is very large; every leaf is scanned linearly \
                during queries and deletes.",
                capacity
            );
        }

        self.leaf_capacity = capacity;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.check().map_err(|e| e.to_string())
    }

    /// Validate, reporting failures as [`InvalidConfig`](crate::PlaceMapError::InvalidConfig).
    pub fn check(&self) -> Result<()> {
        validate_world(&self.world)?;
        validate_leaf_capacity(self.leaf_capacity)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            leaf_capacity: Self::default_leaf_capacity(),
            backend: Backend::default(),
            world: Self::default_world(),
        }
    }
}
