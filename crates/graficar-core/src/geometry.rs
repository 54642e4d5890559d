//! Geometric primitives for chart layout: `Point`, `Size`, `Rect`.
//!
//! All chart math runs in `f64`; the host renderer narrows to its own
//! precision at the paint boundary.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D point in plot-area pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: (other.x - self.x).mul_add(t, self.x),
            y: (other.y - self.y).mul_add(t, self.y),
        }
    }

    /// Both coordinates are finite (not NaN or infinite).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp both coordinates into `[-limit, limit]`.
    ///
    /// Zero-range zoom can push axis math toward infinity; the engine clamps
    /// coordinates before they reach visual elements.
    #[must_use]
    pub fn clamped(&self, limit_x: f64, limit_y: f64) -> Self {
        Self {
            x: self.x.clamp(-limit_x, limit_x),
            y: self.y.clamp(-limit_y, limit_y),
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A 2D size, typically the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Aspect ratio (width / height), zero for degenerate heights.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            0.0
        } else {
            self.width / self.height
        }
    }

    /// Scale both dimensions by a factor.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// A rectangle defined by top-left position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f64,
    /// Y position of top-left corner
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from two corner points, normalizing so width/height are
    /// non-negative regardless of corner order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Create from size at origin.
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Top-left point.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Size of the rectangle.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point containment with a tolerance band around the edges.
    ///
    /// Tooltip placement uses a 1px tolerance so positions on the plot border
    /// still count as inside.
    #[must_use]
    pub fn contains_with_tolerance(&self, point: &Point, tolerance: f64) -> bool {
        point.x >= self.x - tolerance
            && point.x <= self.x + self.width + tolerance
            && point.y >= self.y - tolerance
            && point.y <= self.y + self.height + tolerance
    }

    /// Point containment (inclusive edges).
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        self.contains_with_tolerance(point, 0.0)
    }

    /// Check if this rectangle intersects another.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Intersection with another rectangle, `None` when disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);

        if right > x && bottom > y {
            Some(Self::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Union with another rectangle.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);

        Self::new(x, y, right - x, bottom - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_lerp() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(10.0, 20.0);
        let mid = p1.lerp(&p2, 0.5);
        assert_eq!(mid, Point::new(5.0, 10.0));
    }

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_clamped() {
        let p = Point::new(1e9, -1e9);
        let c = p.clamped(100.0, 50.0);
        assert_eq!(c, Point::new(100.0, -50.0));
    }

    #[test]
    fn test_rect_from_corners_any_order() {
        let r = Rect::from_corners(Point::new(10.0, 30.0), Point::new(4.0, 8.0));
        assert_eq!(r, Rect::new(4.0, 8.0, 6.0, 22.0));
    }

    #[test]
    fn test_rect_contains_with_tolerance() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(r.contains_with_tolerance(&Point::new(-0.5, 50.0), 1.0));
        assert!(!r.contains_with_tolerance(&Point::new(-1.5, 50.0), 1.0));
    }

    #[test]
    fn test_rect_intersection() {
        let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
        let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
        let inter = r1.intersection(&r2).unwrap();
        assert_eq!(inter, Rect::new(50.0, 50.0, 50.0, 50.0));
        assert!(r1.intersection(&Rect::new(500.0, 500.0, 10.0, 10.0)).is_none());
    }

    #[test]
    fn test_size_aspect_ratio_degenerate() {
        assert_eq!(Size::new(10.0, 0.0).aspect_ratio(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_clamped_within_limits(x in -1e12f64..1e12, y in -1e12f64..1e12) {
            let c = Point::new(x, y).clamped(200.0, 300.0);
            prop_assert!(c.x >= -200.0 && c.x <= 200.0);
            prop_assert!(c.y >= -300.0 && c.y <= 300.0);
        }

        #[test]
        fn prop_distance_symmetric(x1 in -1e3f64..1e3, y1 in -1e3f64..1e3, x2 in -1e3f64..1e3, y2 in -1e3f64..1e3) {
            let p1 = Point::new(x1, y1);
            let p2 = Point::new(x2, y2);
            prop_assert!((p1.distance(&p2) - p2.distance(&p1)).abs() < 1e-9);
        }

        #[test]
        fn prop_rect_contains_center(x in -1e3f64..1e3, y in -1e3f64..1e3, w in 0.1f64..1e3, h in 0.1f64..1e3) {
            let r = Rect::new(x, y, w, h);
            prop_assert!(r.contains_point(&r.center()));
        }
    }
}
