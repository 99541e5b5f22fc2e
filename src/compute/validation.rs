//! Validation for coordinates, query rectangles and index configuration.

use crate::error::{PlaceMapError, Result};
use placemap_types::bbox::BoundingBox;

/// Leaf capacities above this are accepted but logged.
pub const LARGE_LEAF_CAPACITY: usize = 100_000;

/// Build a query rectangle from signed extents.
///
/// # Examples
///
/// ```
/// use placemap::compute::validation::bounding_box;
///
/// assert!(bounding_box(0, 0, 10, 10).is_ok());
/// assert!(bounding_box(0, 0, -1, 10).is_err());
/// ```
pub fn bounding_box(x: i32, y: i32, width: i64, height: i64) -> Result<BoundingBox> {
    let width = u32::try_from(width).map_err(|_| {
        PlaceMapError::InvalidInput(format!(
            "Rectangle width must be within [0, {}], got: {}",
            u32::MAX,
            width
        ))
    })?;
    let height = u32::try_from(height).map_err(|_| {
        PlaceMapError::InvalidInput(format!(
            "Rectangle height must be within [0, {}], got: {}",
            u32::MAX,
            height
        ))
    })?;
    Ok(BoundingBox::new(x, y, width, height))
}

/// Validate a world rectangle for use as an index root.
///
/// The world must cover at least one coordinate and every coordinate it covers
/// must be representable as `i32`.
pub fn validate_world(world: &BoundingBox) -> Result<()> {
    if world.is_empty() {
        return Err(PlaceMapError::InvalidConfig(format!(
            "World must have a positive width and height, got: {}",
            world
        )));
    }
    let limit = i64::from(i32::MAX) + 1;
    if world.end_x() > limit || world.end_y() > limit {
        return Err(PlaceMapError::InvalidConfig(format!(
            "World {} extends past the i32 coordinate range",
            world
        )));
    }
    Ok(())
}

pub fn validate_leaf_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(PlaceMapError::InvalidConfig(
            "Leaf capacity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Check that `(x, y)` lies inside `world`.
pub fn validate_in_world(world: &BoundingBox, x: i32, y: i32) -> Result<()> {
    if world.contains(x, y) {
        Ok(())
    } else {
        Err(PlaceMapError::OutOfBounds {
            x,
            y,
            world: *world,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_extents_are_rejected() {
        assert!(matches!(
            bounding_box(0, 0, -5, 5),
            Err(PlaceMapError::InvalidInput(_))
        ));
        assert!(matches!(
            bounding_box(0, 0, 5, -1),
            Err(PlaceMapError::InvalidInput(_))
        ));
        assert!(bounding_box(0, 0, i64::from(u32::MAX) + 1, 1).is_err());
        assert_eq!(
            bounding_box(-4, 2, 0, 3).unwrap(),
            BoundingBox::new(-4, 2, 0, 3)
        );
    }

    #[test]
    fn test_world_validation() {
        assert!(validate_world(&BoundingBox::new(0, 0, 100, 100)).is_ok());
        assert!(validate_world(&BoundingBox::new(0, 0, 0, 100)).is_err());
        assert!(validate_world(&BoundingBox::new(i32::MAX, 0, 1, 1)).is_ok());
        assert!(validate_world(&BoundingBox::new(i32::MAX, 0, 2, 1)).is_err());
    }

    #[test]
    fn test_point_in_world() {
        let world = BoundingBox::new(0, 0, 10, 10);
        assert!(validate_in_world(&world, 9, 9).is_ok());
        assert_eq!(
            validate_in_world(&world, 10, 3),
            Err(PlaceMapError::OutOfBounds {
                x: 10,
                y: 3,
                world
            })
        );
    }

    #[test]
    fn test_capacity_validation() {
        assert!(validate_leaf_capacity(0).is_err());
        assert!(validate_leaf_capacity(1).is_ok());
    }
}
