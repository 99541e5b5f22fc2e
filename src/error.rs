//! Error types for placemap operations.

use placemap_types::bbox::BoundingBox;
use thiserror::Error;

/// Errors surfaced by the place index and its configuration.
///
/// Missing places are not errors: `delete` and the service edits report them
/// with a `false` return, and queries that match nothing return an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceMapError {
    /// An insert targeted a coordinate outside the configured world.
    #[error("Place ({x}, {y}) is out of bounds of world {world}")]
    OutOfBounds { x: i32, y: i32, world: BoundingBox },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A service name that is not part of the catalogue.
    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlaceMapError>;
