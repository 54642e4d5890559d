//! Visual element contracts.
//!
//! The engine writes pixel geometry into these structs; a host renderer reads
//! them and paints. Each element carries a `disabled` flag so the engine can
//! hide an element without destroying it — elements are pooled per data item
//! and survive pan/zoom re-validation.

use crate::color::Color;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// A rectangle element (column, range column, treemap tile, heat cell).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectElement {
    /// X position of top-left corner
    pub x: f64,
    /// Y position of top-left corner
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
    /// Fill color, `None` defers to the host theme
    pub fill: Option<Color>,
    /// Stroke color, `None` defers to the host theme
    pub stroke: Option<Color>,
    /// Hidden without being destroyed
    pub disabled: bool,
}

impl RectElement {
    /// Set geometry from two opposite corners, normalizing orientation.
    pub fn set_corners(&mut self, a: Point, b: Point) {
        self.x = a.x.min(b.x);
        self.y = a.y.min(b.y);
        self.width = (a.x - b.x).abs();
        self.height = (a.y - b.y).abs();
    }

    /// Zero out the geometry and disable. Used when an item scrolls out of
    /// the visible window instead of dropping the element.
    pub fn retire(&mut self) {
        self.width = 0.0;
        self.height = 0.0;
        self.disabled = true;
    }
}

/// A line element (candlestick wick, tick).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineElement {
    /// Start x
    pub x1: f64,
    /// Start y
    pub y1: f64,
    /// End x
    pub x2: f64,
    /// End y
    pub y2: f64,
    /// Stroke color, `None` defers to the host theme
    pub stroke: Option<Color>,
    /// Hidden without being destroyed
    pub disabled: bool,
}

impl LineElement {
    /// Set both endpoints.
    pub fn set_endpoints(&mut self, a: Point, b: Point) {
        self.x1 = a.x;
        self.y1 = a.y;
        self.x2 = b.x;
        self.y2 = b.y;
    }
}

/// An arc element (pie slice).
///
/// `arc` is the sweep in degrees; `start_angle` is in degrees measured
/// clockwise from the positive x axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcElement {
    /// Start angle in degrees
    pub start_angle: f64,
    /// Sweep in degrees
    pub arc: f64,
    /// Outer radius in pixels
    pub radius: f64,
    /// Inner radius in pixels (donut hole)
    pub inner_radius: f64,
    /// Fill color, `None` defers to the host theme
    pub fill: Option<Color>,
    /// Hidden without being destroyed
    pub disabled: bool,
}

impl ArcElement {
    /// Mid-angle of the sweep in degrees.
    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        self.arc.mul_add(0.5, self.start_angle)
    }
}

/// A trapezoid element (funnel/pyramid slice, slice link).
///
/// Geometry is expressed along the series orientation: `top_width` is the edge
/// nearer the start of the layout cursor, `bottom_width` the far edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrapezoidElement {
    /// X position of the slice's bounding box
    pub x: f64,
    /// Y position of the slice's bounding box
    pub y: f64,
    /// Width of the near edge
    pub top_width: f64,
    /// Width of the far edge
    pub bottom_width: f64,
    /// Extent along the layout direction
    pub height: f64,
    /// Fill color, `None` defers to the host theme
    pub fill: Option<Color>,
    /// Hidden without being destroyed
    pub disabled: bool,
}

impl TrapezoidElement {
    /// Area of the trapezoid.
    #[must_use]
    pub fn area(&self) -> f64 {
        (self.top_width + self.bottom_width) / 2.0 * self.height
    }
}

/// A text label element. The engine positions labels; the host measures and
/// paints them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelElement {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Label text
    pub text: String,
    /// Measured height hint used by overlap avoidance
    pub height: f64,
    /// Hidden without being destroyed
    pub disabled: bool,
}

/// A bullet instance positioned at a data point.
///
/// Bullets are found-or-cloned per (data item, template) pair so the same
/// template always reuses the same instance across re-validations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BulletElement {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Hidden without being destroyed
    pub disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_set_corners_normalizes() {
        let mut rect = RectElement::default();
        rect.set_corners(Point::new(10.0, 40.0), Point::new(2.0, 6.0));
        assert_eq!(rect.x, 2.0);
        assert_eq!(rect.y, 6.0);
        assert_eq!(rect.width, 8.0);
        assert_eq!(rect.height, 34.0);
    }

    #[test]
    fn test_rect_retire_keeps_position() {
        let mut rect = RectElement {
            x: 5.0,
            y: 6.0,
            width: 10.0,
            height: 20.0,
            ..RectElement::default()
        };
        rect.retire();
        assert_eq!(rect.x, 5.0);
        assert_eq!(rect.width, 0.0);
        assert!(rect.disabled);
    }

    #[test]
    fn test_arc_mid_angle() {
        let arc = ArcElement {
            start_angle: -90.0,
            arc: 180.0,
            ..ArcElement::default()
        };
        assert_eq!(arc.mid_angle(), 0.0);
    }

    #[test]
    fn test_trapezoid_area() {
        let slice = TrapezoidElement {
            top_width: 10.0,
            bottom_width: 6.0,
            height: 4.0,
            ..TrapezoidElement::default()
        };
        assert_eq!(slice.area(), 32.0);
    }
}
