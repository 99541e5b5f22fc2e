use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Sub};
use std::str::FromStr;

/// Service categories a place can offer.
///
/// The discriminant is the bit position inside a [`ServiceMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Service {
    Atm = 0,
    Restaurant = 1,
    Hospital = 2,
    Park = 3,
    ShoppingMall = 4,
    BusStation = 5,
    Library = 6,
    Pharmacy = 7,
    School = 8,
    ConvenienceStore = 9,
}

impl Service {
    /// Every known service, in bit order.
    pub const ALL: [Service; 10] = [
        Service::Atm,
        Service::Restaurant,
        Service::Hospital,
        Service::Park,
        Service::ShoppingMall,
        Service::BusStation,
        Service::Library,
        Service::Pharmacy,
        Service::School,
        Service::ConvenienceStore,
    ];

    /// Human-readable name, as accepted by [`Service::from_name`].
    pub const fn name(self) -> &'static str {
        match self {
            Service::Atm => "ATM",
            Service::Restaurant => "Restaurant",
            Service::Hospital => "Hospital",
            Service::Park => "Park",
            Service::ShoppingMall => "ShoppingMall",
            Service::BusStation => "BusStation",
            Service::Library => "Library",
            Service::Pharmacy => "Pharmacy",
            Service::School => "School",
            Service::ConvenienceStore => "ConvenienceStore",
        }
    }

    /// Look up a service by its exact name.
    pub fn from_name(name: &str) -> Option<Service> {
        Service::ALL.into_iter().find(|service| service.name() == name)
    }

    pub const fn bit(self) -> u32 {
        1 << self as u8
    }

    pub const fn mask(self) -> ServiceMask {
        ServiceMask(self.bit())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing a name that is not in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownServiceName(pub String);

impl fmt::Display for UnknownServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown service name: {}", self.0)
    }
}

impl std::error::Error for UnknownServiceName {}

impl FromStr for Service {
    type Err = UnknownServiceName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::from_name(s).ok_or_else(|| UnknownServiceName(s.to_string()))
    }
}

/// Bitmask of offered (or requested) services.
///
/// Bits beyond the known catalogue are preserved untouched, so masks produced
/// by a newer catalogue survive a round trip through this type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ServiceMask(u32);

impl ServiceMask {
    pub const NONE: ServiceMask = ServiceMask(0);

    /// Mask with every catalogued service set.
    pub const ALL: ServiceMask = ServiceMask((1 << Service::ALL.len()) - 1);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, service: Service) -> bool {
        self.0 & service.bit() != 0
    }

    /// True if at least one service in `query` is offered.
    pub const fn contains_any(self, query: ServiceMask) -> bool {
        self.0 & query.0 != 0
    }

    /// True if every service in `query` is offered.
    pub const fn contains_all(self, query: ServiceMask) -> bool {
        self.0 & query.0 == query.0
    }

    pub fn insert(&mut self, service: Service) {
        self.0 |= service.bit();
    }

    pub fn remove(&mut self, service: Service) {
        self.0 &= !service.bit();
    }

    /// Bits outside the known catalogue.
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !Self::ALL.0
    }

    /// Known services present in the mask, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Service> {
        Service::ALL
            .into_iter()
            .filter(move |service| self.contains(*service))
    }
}

impl From<Service> for ServiceMask {
    fn from(service: Service) -> Self {
        service.mask()
    }
}

impl FromIterator<Service> for ServiceMask {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ServiceMask::NONE, |mask, service| mask | service)
    }
}

impl BitOr for ServiceMask {
    type Output = ServiceMask;

    fn bitor(self, rhs: ServiceMask) -> ServiceMask {
        ServiceMask(self.0 | rhs.0)
    }
}

impl BitOr<Service> for ServiceMask {
    type Output = ServiceMask;

    fn bitor(self, rhs: Service) -> ServiceMask {
        ServiceMask(self.0 | rhs.bit())
    }
}

impl BitOr for Service {
    type Output = ServiceMask;

    fn bitor(self, rhs: Service) -> ServiceMask {
        ServiceMask(self.bit() | rhs.bit())
    }
}

impl BitOrAssign for ServiceMask {
    fn bitor_assign(&mut self, rhs: ServiceMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ServiceMask {
    type Output = ServiceMask;

    fn bitand(self, rhs: ServiceMask) -> ServiceMask {
        ServiceMask(self.0 & rhs.0)
    }
}

/// Set difference: services in `self` that are not in `rhs`.
impl Sub for ServiceMask {
    type Output = ServiceMask;

    fn sub(self, rhs: ServiceMask) -> ServiceMask {
        ServiceMask(self.0 & !rhs.0)
    }
}

impl fmt::Display for ServiceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}
