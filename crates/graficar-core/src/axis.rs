//! Axis contract and the three concrete axis kinds the engine binds to.
//!
//! An axis converts logical values (number / date / category) on one dimension
//! into a normalized position in `[0, 1]`, then into a pixel coordinate along
//! its length. Axes carry their own zoom window (`start`/`end` as fractions of
//! the full range); series windows are derived from it by the chart.
//!
//! The mapping core follows the normalize/denormalize scale model; rendering
//! concerns (ticks, labels, grid) stay with the host.

use serde::{Deserialize, Serialize};

/// Semantic kind of the field an axis consumes from a data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisField {
    /// Numeric value field
    Value,
    /// Date field (epoch milliseconds)
    Date,
    /// Category field
    Category,
}

/// Index of an axis within the chart's axis list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId(pub usize);

/// The contract the series engine consumes.
pub trait Axis {
    /// Semantic kind of the bound field.
    fn axis_field(&self) -> AxisField;

    /// Pixel length of the axis.
    fn axis_length(&self) -> f64;

    /// Zero line for value axes; `0.0` otherwise.
    fn base_value(&self) -> f64 {
        0.0
    }

    /// Normalized position of a numeric value over the full (unzoomed) range.
    fn value_to_position(&self, value: f64) -> f64;

    /// Normalized position of a category cell at a fractional `location`
    /// within the cell. Non-category axes position by cell interval instead.
    fn category_to_position(&self, index: usize, location: f64) -> f64;

    /// Map a normalized position through the zoom window into a pixel
    /// coordinate along the axis.
    fn position_to_coordinate(&self, position: f64) -> f64;

    /// Inverse of `position_to_coordinate`.
    fn coordinate_to_position(&self, coordinate: f64) -> f64;

    /// Nearest cell index for a normalized position, when the axis has cells.
    fn position_to_index(&self, position: f64) -> Option<usize> {
        let _ = position;
        None
    }

    /// Number of cells, when the axis has cells.
    fn cell_count(&self) -> Option<usize> {
        None
    }

    /// Visible zoom window as fractions of the full range.
    fn zoom_window(&self) -> (f64, f64);
}

fn window_coordinate(position: f64, start: f64, end: f64, length: f64, inverted: bool) -> f64 {
    let span = (end - start).max(f64::EPSILON);
    let p = (position - start) / span;
    if inverted {
        (1.0 - p) * length
    } else {
        p * length
    }
}

fn window_position(coordinate: f64, start: f64, end: f64, length: f64, inverted: bool) -> f64 {
    let length = length.max(f64::EPSILON);
    let p = if inverted {
        1.0 - coordinate / length
    } else {
        coordinate / length
    };
    (end - start).mul_add(p, start)
}

/// Linear numeric axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueAxis {
    /// Minimum of the full range
    pub min: f64,
    /// Maximum of the full range
    pub max: f64,
    /// Zero line value
    pub base: f64,
    /// Pixel length
    pub length: f64,
    /// Zoom window start fraction
    pub start: f64,
    /// Zoom window end fraction
    pub end: f64,
    /// Screen-inverted (typical y axes)
    pub inverted: bool,
}

impl ValueAxis {
    /// Create a value axis over `[min, max]` with the given pixel length.
    #[must_use]
    pub fn new(min: f64, max: f64, length: f64) -> Self {
        Self {
            min,
            max,
            base: 0.0,
            length,
            start: 0.0,
            end: 1.0,
            inverted: false,
        }
    }

    /// Set the zero-line value.
    #[must_use]
    pub const fn with_base(mut self, base: f64) -> Self {
        self.base = base;
        self
    }

    /// Invert the screen direction (y axes grow downward).
    #[must_use]
    pub const fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Zoom to a sub-window of the full range.
    #[must_use]
    pub fn zoom(mut self, start: f64, end: f64) -> Self {
        self.start = start.clamp(0.0, 1.0);
        self.end = end.clamp(self.start, 1.0);
        self
    }

    /// Update the full range in place (driven by series extremes).
    pub fn set_range(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }
}

impl Axis for ValueAxis {
    fn axis_field(&self) -> AxisField {
        AxisField::Value
    }

    fn axis_length(&self) -> f64 {
        self.length
    }

    fn base_value(&self) -> f64 {
        self.base
    }

    fn value_to_position(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        (value - self.min) / range
    }

    fn category_to_position(&self, index: usize, location: f64) -> f64 {
        // No cell grid; treat index+location as a raw value offset.
        self.value_to_position(index as f64 + location)
    }

    fn position_to_coordinate(&self, position: f64) -> f64 {
        window_coordinate(position, self.start, self.end, self.length, self.inverted)
    }

    fn coordinate_to_position(&self, coordinate: f64) -> f64 {
        window_position(coordinate, self.start, self.end, self.length, self.inverted)
    }

    fn zoom_window(&self) -> (f64, f64) {
        (self.start, self.end)
    }
}

/// Ordinal category axis with equal-width cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAxis {
    /// Ordered category names
    pub categories: Vec<String>,
    /// Pixel length
    pub length: f64,
    /// Zoom window start fraction
    pub start: f64,
    /// Zoom window end fraction
    pub end: f64,
    /// Screen-inverted
    pub inverted: bool,
}

impl CategoryAxis {
    /// Create a category axis from ordered names.
    #[must_use]
    pub fn new(categories: impl IntoIterator<Item = impl Into<String>>, length: f64) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            length,
            start: 0.0,
            end: 1.0,
            inverted: false,
        }
    }

    /// Invert the screen direction.
    #[must_use]
    pub const fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Zoom to a sub-window of the category range.
    #[must_use]
    pub fn zoom(mut self, start: f64, end: f64) -> Self {
        self.start = start.clamp(0.0, 1.0);
        self.end = end.clamp(self.start, 1.0);
        self
    }

    /// Index of a category by name.
    #[must_use]
    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    /// Width of one cell as a fraction of the full range.
    #[must_use]
    pub fn cell_width(&self) -> f64 {
        if self.categories.is_empty() {
            0.0
        } else {
            1.0 / self.categories.len() as f64
        }
    }
}

impl Axis for CategoryAxis {
    fn axis_field(&self) -> AxisField {
        AxisField::Category
    }

    fn axis_length(&self) -> f64 {
        self.length
    }

    fn value_to_position(&self, value: f64) -> f64 {
        // Raw values are treated as fractional cell indices.
        if self.categories.is_empty() {
            return 0.0;
        }
        value / self.categories.len() as f64
    }

    fn category_to_position(&self, index: usize, location: f64) -> f64 {
        if self.categories.is_empty() {
            return 0.0;
        }
        (index as f64 + location) / self.categories.len() as f64
    }

    fn position_to_coordinate(&self, position: f64) -> f64 {
        window_coordinate(position, self.start, self.end, self.length, self.inverted)
    }

    fn coordinate_to_position(&self, coordinate: f64) -> f64 {
        window_position(coordinate, self.start, self.end, self.length, self.inverted)
    }

    fn position_to_index(&self, position: f64) -> Option<usize> {
        if self.categories.is_empty() {
            return None;
        }
        let count = self.categories.len();
        let raw = (position * count as f64).floor();
        let clamped = raw.clamp(0.0, (count - 1) as f64);
        Some(clamped as usize)
    }

    fn cell_count(&self) -> Option<usize> {
        Some(self.categories.len())
    }

    fn zoom_window(&self) -> (f64, f64) {
        (self.start, self.end)
    }
}

/// Date axis: a value axis over epoch milliseconds with a base interval cell.
///
/// Grouping/aggregation beyond cell placement is the host's concern; the
/// engine only needs positions and cell lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateAxis {
    /// Minimum timestamp (epoch ms)
    pub min: f64,
    /// Maximum timestamp (epoch ms)
    pub max: f64,
    /// Cell interval in milliseconds
    pub base_interval: f64,
    /// Pixel length
    pub length: f64,
    /// Zoom window start fraction
    pub start: f64,
    /// Zoom window end fraction
    pub end: f64,
    /// Screen-inverted
    pub inverted: bool,
}

impl DateAxis {
    /// Create a date axis over `[min, max]` epoch milliseconds.
    #[must_use]
    pub fn new(min: f64, max: f64, base_interval: f64, length: f64) -> Self {
        Self {
            min,
            max,
            base_interval: base_interval.max(1.0),
            length,
            start: 0.0,
            end: 1.0,
            inverted: false,
        }
    }

    /// Zoom to a sub-window of the time range.
    #[must_use]
    pub fn zoom(mut self, start: f64, end: f64) -> Self {
        self.start = start.clamp(0.0, 1.0);
        self.end = end.clamp(self.start, 1.0);
        self
    }

    /// Number of whole base-interval cells in the range.
    #[must_use]
    pub fn interval_count(&self) -> usize {
        let span = self.max - self.min;
        if span <= 0.0 {
            0
        } else {
            (span / self.base_interval).ceil() as usize
        }
    }
}

impl Axis for DateAxis {
    fn axis_field(&self) -> AxisField {
        AxisField::Date
    }

    fn axis_length(&self) -> f64 {
        self.length
    }

    fn base_value(&self) -> f64 {
        self.min
    }

    fn value_to_position(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        (value - self.min) / range
    }

    fn category_to_position(&self, index: usize, location: f64) -> f64 {
        // Cells are base-interval wide starting at `min`.
        let value = (index as f64 + location).mul_add(self.base_interval, self.min);
        self.value_to_position(value)
    }

    fn position_to_coordinate(&self, position: f64) -> f64 {
        window_coordinate(position, self.start, self.end, self.length, self.inverted)
    }

    fn coordinate_to_position(&self, coordinate: f64) -> f64 {
        window_position(coordinate, self.start, self.end, self.length, self.inverted)
    }

    fn position_to_index(&self, position: f64) -> Option<usize> {
        let count = self.interval_count();
        if count == 0 {
            return None;
        }
        let raw = (position * (self.max - self.min) / self.base_interval).floor();
        Some(raw.clamp(0.0, (count - 1) as f64) as usize)
    }

    fn cell_count(&self) -> Option<usize> {
        Some(self.interval_count())
    }

    fn zoom_window(&self) -> (f64, f64) {
        (self.start, self.end)
    }
}

/// Concrete axis dispatch. Series store an [`AxisId`]; the chart owns the
/// axes themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyAxis {
    /// Linear numeric axis
    Value(ValueAxis),
    /// Ordinal category axis
    Category(CategoryAxis),
    /// Date axis
    Date(DateAxis),
}

macro_rules! delegate {
    ($self:ident, $axis:ident => $body:expr) => {
        match $self {
            Self::Value($axis) => $body,
            Self::Category($axis) => $body,
            Self::Date($axis) => $body,
        }
    };
}

impl Axis for AnyAxis {
    fn axis_field(&self) -> AxisField {
        delegate!(self, a => a.axis_field())
    }

    fn axis_length(&self) -> f64 {
        delegate!(self, a => a.axis_length())
    }

    fn base_value(&self) -> f64 {
        delegate!(self, a => Axis::base_value(a))
    }

    fn value_to_position(&self, value: f64) -> f64 {
        delegate!(self, a => a.value_to_position(value))
    }

    fn category_to_position(&self, index: usize, location: f64) -> f64 {
        delegate!(self, a => a.category_to_position(index, location))
    }

    fn position_to_coordinate(&self, position: f64) -> f64 {
        delegate!(self, a => a.position_to_coordinate(position))
    }

    fn coordinate_to_position(&self, coordinate: f64) -> f64 {
        delegate!(self, a => a.coordinate_to_position(coordinate))
    }

    fn position_to_index(&self, position: f64) -> Option<usize> {
        delegate!(self, a => a.position_to_index(position))
    }

    fn cell_count(&self) -> Option<usize> {
        delegate!(self, a => a.cell_count())
    }

    fn zoom_window(&self) -> (f64, f64) {
        delegate!(self, a => a.zoom_window())
    }
}

impl AnyAxis {
    /// Mutable access to the value-axis payload, if this is one.
    pub fn as_value_mut(&mut self) -> Option<&mut ValueAxis> {
        match self {
            Self::Value(axis) => Some(axis),
            _ => None,
        }
    }

    /// The category payload, if this is a category axis.
    #[must_use]
    pub fn as_category(&self) -> Option<&CategoryAxis> {
        match self {
            Self::Category(axis) => Some(axis),
            _ => None,
        }
    }

    /// The date payload, if this is a date axis.
    #[must_use]
    pub fn as_date(&self) -> Option<&DateAxis> {
        match self {
            Self::Date(axis) => Some(axis),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_axis_positions() {
        let axis = ValueAxis::new(0.0, 100.0, 400.0);
        assert_eq!(axis.value_to_position(0.0), 0.0);
        assert_eq!(axis.value_to_position(50.0), 0.5);
        assert_eq!(axis.value_to_position(100.0), 1.0);
        assert_eq!(axis.position_to_coordinate(0.5), 200.0);
    }

    #[test]
    fn test_value_axis_zero_range() {
        let axis = ValueAxis::new(5.0, 5.0, 400.0);
        assert_eq!(axis.value_to_position(5.0), 0.5);
    }

    #[test]
    fn test_value_axis_inverted() {
        let axis = ValueAxis::new(0.0, 100.0, 400.0).inverted(true);
        assert_eq!(axis.position_to_coordinate(0.0), 400.0);
        assert_eq!(axis.position_to_coordinate(1.0), 0.0);
    }

    #[test]
    fn test_value_axis_zoom_window() {
        let axis = ValueAxis::new(0.0, 100.0, 400.0).zoom(0.25, 0.75);
        // Value 25 sits at window start, value 75 at window end.
        assert_eq!(axis.position_to_coordinate(axis.value_to_position(25.0)), 0.0);
        assert_eq!(axis.position_to_coordinate(axis.value_to_position(75.0)), 400.0);
    }

    #[test]
    fn test_coordinate_roundtrip() {
        let axis = ValueAxis::new(-10.0, 30.0, 250.0).zoom(0.1, 0.9);
        let pos = axis.value_to_position(12.5);
        let coord = axis.position_to_coordinate(pos);
        assert!((axis.coordinate_to_position(coord) - pos).abs() < 1e-12);
    }

    #[test]
    fn test_category_axis_positions() {
        let axis = CategoryAxis::new(["a", "b", "c", "d"], 400.0);
        assert_eq!(axis.category_to_position(0, 0.5), 0.125);
        assert_eq!(axis.category_to_position(3, 0.5), 0.875);
        assert_eq!(axis.cell_width(), 0.25);
    }

    #[test]
    fn test_category_axis_index_lookup() {
        let axis = CategoryAxis::new(["a", "b", "c", "d"], 400.0);
        assert_eq!(axis.position_to_index(0.1), Some(0));
        assert_eq!(axis.position_to_index(0.6), Some(2));
        assert_eq!(axis.position_to_index(1.5), Some(3));
        assert_eq!(axis.index_of("c"), Some(2));
        assert_eq!(axis.index_of("zzz"), None);
    }

    #[test]
    fn test_category_axis_empty() {
        let axis = CategoryAxis::new(Vec::<String>::new(), 400.0);
        assert_eq!(axis.category_to_position(0, 0.5), 0.0);
        assert_eq!(axis.position_to_index(0.5), None);
    }

    #[test]
    fn test_date_axis_cells() {
        // Ten one-day cells.
        let day = 86_400_000.0;
        let axis = DateAxis::new(0.0, 10.0 * day, day, 500.0);
        assert_eq!(axis.interval_count(), 10);
        assert_eq!(axis.category_to_position(0, 0.0), 0.0);
        assert_eq!(axis.category_to_position(5, 0.0), 0.5);
        assert_eq!(axis.position_to_index(0.55), Some(5));
    }

    #[test]
    fn test_any_axis_delegation() {
        let axis = AnyAxis::Value(ValueAxis::new(0.0, 10.0, 100.0));
        assert_eq!(axis.axis_field(), AxisField::Value);
        assert_eq!(axis.position_to_coordinate(0.5), 50.0);
        assert_eq!(axis.cell_count(), None);
    }
}
