use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D axis-aligned integer rectangle.
///
/// Covers the half-open ranges `[x, x + width)` and `[y, y + height)`. The
/// same convention drives [`contains`](Self::contains),
/// [`intersects`](Self::intersects) and [`quadrants`](Self::quadrants), so a
/// point inside a box belongs to exactly one of its quadrants.
///
/// Edges are computed in `i64`, so a box may extend past `i32::MAX` without
/// overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Smallest x coordinate inside the box
    pub x: i32,
    /// Smallest y coordinate inside the box
    pub y: i32,
    /// Extent along the x axis
    pub width: u32,
    /// Extent along the y axis
    pub height: u32,
}

impl BoundingBox {
    /// Create a new bounding box from its lower corner and extents.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemap_types::bbox::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(0, 0, 100, 50);
    /// assert!(bbox.contains(99, 49));
    /// assert!(!bbox.contains(100, 49));
    /// ```
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest x coordinate inside the box.
    pub fn min_x(&self) -> i64 {
        i64::from(self.x)
    }

    /// Smallest y coordinate inside the box.
    pub fn min_y(&self) -> i64 {
        i64::from(self.y)
    }

    /// Exclusive upper x edge.
    pub fn end_x(&self) -> i64 {
        self.min_x() + i64::from(self.width)
    }

    /// Exclusive upper y edge.
    pub fn end_y(&self) -> i64 {
        self.min_y() + i64::from(self.height)
    }

    /// Number of integer coordinates covered by the box.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// True if the box covers no coordinates at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a coordinate lies inside the box.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        x >= self.min_x() && x < self.end_x() && y >= self.min_y() && y < self.end_y()
    }

    /// Check if this bounding box shares at least one coordinate with another.
    ///
    /// Boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x() < other.end_x()
            && other.min_x() < self.end_x()
            && self.min_y() < other.end_y()
            && other.min_y() < self.end_y()
    }

    /// Vertical and horizontal split lines, `(mid_x, mid_y)`.
    ///
    /// Coordinates equal to a midpoint belong to the upper half.
    pub fn midpoint(&self) -> (i64, i64) {
        (
            self.min_x() + i64::from(self.width / 2),
            self.min_y() + i64::from(self.height / 2),
        )
    }

    /// Whether the box can be divided into strictly smaller quadrants.
    pub fn can_split(&self) -> bool {
        self.width > 1 || self.height > 1
    }

    /// Index of the quadrant owning `(x, y)`.
    ///
    /// Bit 0 is set for the upper x half, bit 1 for the upper y half, which
    /// matches the order of [`quadrants`](Self::quadrants).
    pub fn quadrant_of(&self, x: i32, y: i32) -> usize {
        let (mid_x, mid_y) = self.midpoint();
        let east = usize::from(i64::from(x) >= mid_x);
        let north = usize::from(i64::from(y) >= mid_y);
        east | (north << 1)
    }

    /// Split the box into four quadrants that tile it exactly.
    ///
    /// The lower halves take `size / 2`, the upper halves the remainder, so odd
    /// extents lose no coordinates.
    pub fn quadrants(&self) -> [BoundingBox; 4] {
        let low_w = self.width / 2;
        let low_h = self.height / 2;
        let high_w = self.width - low_w;
        let high_h = self.height - low_h;
        // Upper halves start strictly inside the box whenever they are non-empty,
        // so these offsets stay within i32 for any box whose coordinates do.
        let mid_x = self.x.wrapping_add_unsigned(low_w);
        let mid_y = self.y.wrapping_add_unsigned(low_h);
        [
            BoundingBox::new(self.x, self.y, low_w, low_h),
            BoundingBox::new(mid_x, self.y, high_w, low_h),
            BoundingBox::new(self.x, mid_y, low_w, high_h),
            BoundingBox::new(mid_x, mid_y, high_w, high_h),
        ]
    }

    /// Smallest squared distance from `(x, y)` to any coordinate in the box.
    ///
    /// Zero when the point is inside, `u64::MAX` for an empty box.
    pub fn min_distance_squared(&self, x: i32, y: i32) -> u64 {
        if self.is_empty() {
            return u64::MAX;
        }
        let dx = axis_gap(i64::from(x), self.min_x(), self.end_x() - 1);
        let dy = axis_gap(i64::from(y), self.min_y(), self.end_y() - 1);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }
}

fn axis_gap(value: i64, low: i64, high: i64) -> u64 {
    if value < low {
        (low - value).unsigned_abs()
    } else if value > high {
        (value - high).unsigned_abs()
    } else {
        0
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})x[{}, {})",
            self.min_x(),
            self.end_x(),
            self.min_y(),
            self.end_y()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let bbox = BoundingBox::new(10, 20, 5, 5);
        assert!(bbox.contains(10, 20));
        assert!(bbox.contains(14, 24));
        assert!(!bbox.contains(15, 24));
        assert!(!bbox.contains(14, 25));
        assert!(!bbox.contains(9, 20));
    }

    #[test]
    fn test_edge_touching_boxes_do_not_intersect() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(10, 0, 10, 10);
        let c = BoundingBox::new(9, 9, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn test_quadrants_tile_odd_extents() {
        let bbox = BoundingBox::new(-3, 7, 7, 5);
        let quadrants = bbox.quadrants();
        let total: u64 = quadrants.iter().map(BoundingBox::area).sum();
        assert_eq!(total, bbox.area());

        for x in -3..4 {
            for y in 7..12 {
                let owners: Vec<usize> = quadrants
                    .iter()
                    .enumerate()
                    .filter(|(_, q)| q.contains(x, y))
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(owners, vec![bbox.quadrant_of(x, y)], "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_midpoint_belongs_to_upper_quadrant() {
        let bbox = BoundingBox::new(0, 0, 10, 10);
        assert_eq!(bbox.midpoint(), (5, 5));
        assert_eq!(bbox.quadrant_of(5, 5), 3);
        assert_eq!(bbox.quadrant_of(4, 5), 2);
        assert_eq!(bbox.quadrant_of(5, 4), 1);
        assert_eq!(bbox.quadrant_of(4, 4), 0);
    }

    #[test]
    fn test_min_distance_squared() {
        let bbox = BoundingBox::new(0, 0, 10, 10);
        assert_eq!(bbox.min_distance_squared(5, 5), 0);
        assert_eq!(bbox.min_distance_squared(12, 5), 9);
        assert_eq!(bbox.min_distance_squared(-2, -3), 13);
        assert_eq!(bbox.min_distance_squared(9, 9), 0);
        assert_eq!(BoundingBox::new(0, 0, 0, 4).min_distance_squared(0, 0), u64::MAX);
    }

    #[test]
    fn test_split_of_unit_cell() {
        let cell = BoundingBox::new(4, 4, 1, 1);
        assert!(!cell.can_split());
        assert!(BoundingBox::new(4, 4, 1, 2).can_split());
    }

    #[test]
    fn test_edges_do_not_overflow() {
        let bbox = BoundingBox::new(i32::MAX - 1, 0, u32::MAX, 1);
        assert!(bbox.contains(i32::MAX, 0));
        assert_eq!(bbox.end_x(), i64::from(i32::MAX) - 1 + i64::from(u32::MAX));
    }
}
