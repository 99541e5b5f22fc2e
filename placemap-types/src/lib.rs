//! # placemap-types
//!
//! Core data types for the placemap spatial index.
//!
//! - **Bounding boxes**: `BoundingBox`, half-open integer rectangles used both
//!   for the world extent and for range queries
//! - **Places**: `Place`, an integer coordinate tagged with a service mask
//! - **Services**: `Service` and `ServiceMask`, the category catalogue and its
//!   bitmask encoding
//! - **Statistics**: `IndexStats` and `MapStats`
//!
//! All types are serializable with Serde.
//!
//! ## Examples
//!
//! ```rust
//! use placemap_types::bbox::BoundingBox;
//! use placemap_types::place::Place;
//! use placemap_types::service::{Service, ServiceMask};
//!
//! let world = BoundingBox::new(0, 0, 1_000, 1_000);
//! let cafe = Place::new(120, 455, ServiceMask::from(Service::Restaurant));
//! assert!(world.contains(cafe.x(), cafe.y()));
//! ```

pub mod bbox;
pub mod place;
pub mod service;
pub mod stats;
