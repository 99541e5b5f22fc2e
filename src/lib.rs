//! In-memory index of places with service bitmasks.
//!
//! ## Features
//! - **Quadtree index**: places are bucketed in leaves that split into four
//!   quadrants on overflow; a KD-tree backend answers the same queries
//! - **Range queries**: every place inside a half-open rectangle
//! - **Service-filtered nearest neighbours**: branch-and-bound search with a
//!   bounded max-heap, optionally limited to a walking radius
//! - **Service edits**: replace, add or remove services of a place in place
//! - **Thread-safe wrapper**: `SyncPlaceMap` (with the `sync` feature)
//!
//! ```rust
//! use placemap::{BoundingBox, NearestQuery, PlaceMap, Service, ServiceMatch};
//!
//! let mut map = PlaceMap::builder()
//!     .world(BoundingBox::new(0, 0, 10_000, 10_000))
//!     .build()?;
//!
//! map.insert(100, 100, Service::Restaurant | Service::Atm)?;
//! map.insert(150, 90, Service::Pharmacy)?;
//! map.insert_named(4_000, 4_000, &["Hospital", "Pharmacy"])?;
//!
//! // Everything in the lower-left 1000 x 1000 block
//! let block = map.range_query(&BoundingBox::new(0, 0, 1_000, 1_000));
//! assert_eq!(block.len(), 2);
//!
//! // Nearest pharmacy
//! let nearest = map.k_nearest_by_service(0, 0, 1, Service::Pharmacy);
//! assert_eq!(nearest[0].coordinates(), (150, 90));
//!
//! // Places offering both services within 200 units
//! let query = NearestQuery::new(0, 0, 5, Service::Restaurant | Service::Atm)
//!     .matching(ServiceMatch::All)
//!     .within(200.0);
//! assert_eq!(map.k_nearest(&query).len(), 1);
//! # Ok::<(), placemap::PlaceMapError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod db;
pub mod error;
pub mod index;

pub use builder::PlaceMapBuilder;
pub use db::PlaceMap;
pub use error::{PlaceMapError, Result};

#[cfg(feature = "sync")]
pub use db::SyncPlaceMap;

pub use config::Config;
pub use index::{Backend, KdTree, NearestQuery, PlaceIndex, QuadTree, ServiceMatch};

pub use placemap_types::bbox::BoundingBox;
pub use placemap_types::place::Place;
pub use placemap_types::service::{Service, ServiceMask};
pub use placemap_types::stats::{IndexStats, MapStats};

pub use compute::validation;
pub use compute::{decode_services, encode_services};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{PlaceMap, PlaceMapBuilder, PlaceMapError, Result};

    #[cfg(feature = "sync")]
    pub use crate::SyncPlaceMap;

    pub use crate::{BoundingBox, Place, Service, ServiceMask};

    pub use crate::{Backend, Config, NearestQuery, PlaceIndex, ServiceMatch};

    pub use crate::{decode_services, encode_services, validation};
}
