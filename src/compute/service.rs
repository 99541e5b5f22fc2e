//! Conversion between service names and [`ServiceMask`] values.

use crate::error::{PlaceMapError, Result};
use placemap_types::service::{Service, ServiceMask};

/// Name emitted by [`decode_services`] for bits outside the catalogue.
pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Encode a list of service names into a mask.
///
/// Names are matched exactly after trimming surrounding whitespace.
///
/// # Examples
///
/// ```
/// use placemap::compute::encode_services;
/// use placemap::Service;
///
/// let mask = encode_services(["Restaurant", "Park"]).unwrap();
/// assert_eq!(mask, Service::Restaurant | Service::Park);
/// assert!(encode_services(["Casino"]).is_err());
/// ```
pub fn encode_services<I, S>(names: I) -> Result<ServiceMask>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mask = ServiceMask::NONE;
    for name in names {
        let name = name.as_ref().trim();
        let service = Service::from_name(name)
            .ok_or_else(|| PlaceMapError::UnknownService(name.to_string()))?;
        mask.insert(service);
    }
    Ok(mask)
}

/// Decode a mask into service names, in bit order.
///
/// Never fails: every set bit beyond the catalogue yields one
/// [`UNKNOWN_SERVICE`] entry.
pub fn decode_services(mask: ServiceMask) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = mask.iter().map(Service::name).collect();
    let unknown = mask.unknown_bits().count_ones() as usize;
    names.extend(std::iter::repeat_n(UNKNOWN_SERVICE, unknown));
    names
}

/// True if `mask` offers at least one of the services in `query`.
pub fn contains_any(mask: ServiceMask, query: ServiceMask) -> bool {
    mask.contains_any(query)
}
