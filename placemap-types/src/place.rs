use crate::service::ServiceMask;
use serde::{Deserialize, Serialize};

/// A location on the map together with the services it offers.
///
/// Identity is the coordinate pair; the service mask is the only mutable part
/// of a place once it has been indexed.
///
/// # Examples
///
/// ```
/// use placemap_types::place::Place;
/// use placemap_types::service::{Service, ServiceMask};
///
/// let atm = Place::new(3, 4, ServiceMask::from(Service::Atm));
/// assert_eq!(atm.distance_squared_to(0, 0), 25);
/// assert_eq!(atm.distance_to(0, 0), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place {
    x: i32,
    y: i32,
    services: ServiceMask,
}

impl Place {
    pub const fn new(x: i32, y: i32, services: ServiceMask) -> Self {
        Self { x, y, services }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn coordinates(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn services(&self) -> ServiceMask {
        self.services
    }

    /// Mutable access to the service mask. Coordinates stay fixed.
    pub fn services_mut(&mut self) -> &mut ServiceMask {
        &mut self.services
    }

    /// True if this place sits exactly at `(x, y)`.
    pub fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }

    /// Squared Euclidean distance to `(x, y)`, exact for every `i32` input.
    pub fn distance_squared_to(&self, x: i32, y: i32) -> u64 {
        distance_squared(self.x, self.y, x, y)
    }

    /// Euclidean distance to `(x, y)`.
    pub fn distance_to(&self, x: i32, y: i32) -> f64 {
        (self.distance_squared_to(x, y) as f64).sqrt()
    }
}

/// Squared Euclidean distance between two integer coordinates.
///
/// Each axis term fits in `u64`; the sum saturates instead of wrapping.
pub fn distance_squared(ax: i32, ay: i32, bx: i32, by: i32) -> u64 {
    let dx = (i64::from(ax) - i64::from(bx)).unsigned_abs();
    let dy = (i64::from(ay) - i64::from(by)).unsigned_abs();
    (dx * dx).saturating_add(dy * dy)
}
