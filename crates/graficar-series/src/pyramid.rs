//! Pyramid series: trapezoid slices along a linear width taper from
//! `top_width` to `bottom_width`, so consecutive slices meet edge to edge.

use crate::funnel::{Orientation, ValueMode};
use crate::percent::{PercentSeriesCore, ZERO_FLOOR};
use graficar_core::Rect;

/// Linear-taper trapezoid series.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidSeries {
    /// Percent-family core
    pub percent: PercentSeriesCore,
    /// Layout direction
    pub orientation: Orientation,
    /// Width at the start of the taper, as a fraction of the cross extent
    pub top_width: f64,
    /// Width at the end of the taper, as a fraction of the cross extent
    pub bottom_width: f64,
    /// Value semantics
    pub value_is: ValueMode,
    /// Sub-range of the extent the slices occupy
    pub start_location: f64,
    /// End of the sub-range
    pub end_location: f64,
}

impl PyramidSeries {
    /// Create a pyramid series (narrow top, full-width bottom).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            percent: PercentSeriesCore::new(name),
            orientation: Orientation::Vertical,
            top_width: 0.0,
            bottom_width: 1.0,
            value_is: ValueMode::Height,
            start_location: 0.0,
            end_location: 1.0,
        }
    }

    /// Set the taper endpoints as fractions of the cross extent.
    #[must_use]
    pub fn widths(mut self, top: f64, bottom: f64) -> Self {
        self.top_width = top.clamp(0.0, 1.0);
        self.bottom_width = bottom.clamp(0.0, 1.0);
        self
    }

    /// Set the layout direction.
    #[must_use]
    pub const fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the value semantics.
    #[must_use]
    pub const fn value_is(mut self, mode: ValueMode) -> Self {
        self.value_is = mode;
        self
    }

    /// Restrict the slices to a sub-range of the extent.
    #[must_use]
    pub fn locations(mut self, start: f64, end: f64) -> Self {
        self.start_location = start.clamp(0.0, 1.0);
        self.end_location = end.clamp(self.start_location, 1.0);
        self
    }

    /// Run a full validation pass into the given bounds.
    pub fn validate(&mut self, bounds: Rect) {
        self.percent.validate_values();
        self.layout_slices(bounds);
    }

    /// Lay the slices along the taper with a running cursor.
    ///
    /// Every slice's near width is the taper width at the cursor and its far
    /// width the taper width at `cursor + height`, so
    /// `slice[i].bottom_width == slice[i+1].top_width` holds throughout.
    pub(crate) fn layout_slices(&mut self, bounds: Rect) {
        let included = self.percent.included_indices();
        if included.is_empty() {
            return;
        }

        let (extent_total, cross) = match self.orientation {
            Orientation::Vertical => (bounds.height, bounds.width),
            Orientation::Horizontal => (bounds.width, bounds.height),
        };
        let extent = ((self.end_location - self.start_location) * extent_total).max(ZERO_FLOOR);
        let top_px = self.top_width * cross;
        let bottom_px = self.bottom_width * cross;
        // Width per unit of advance along the extent.
        let slope = (bottom_px - top_px) / extent;
        let width_at = |offset: f64| slope.mul_add(offset, top_px);

        let values: Vec<f64> = included
            .iter()
            .map(|&i| PercentSeriesCore::floored_working(&self.percent.core.items()[i]))
            .collect();
        let total: f64 = values.iter().sum::<f64>().max(ZERO_FLOOR);
        let total_area = (top_px + bottom_px) / 2.0 * extent;

        let origin = match self.orientation {
            Orientation::Vertical => bounds.y,
            Orientation::Horizontal => bounds.x,
        };
        let cross_origin = match self.orientation {
            Orientation::Vertical => bounds.x,
            Orientation::Horizontal => bounds.y,
        };
        let start_offset = self.start_location * extent_total;

        let mut offset = 0.0;
        for (k, &i) in included.iter().enumerate() {
            let share = values[k] / total;
            let near = width_at(offset);
            let height = match self.value_is {
                ValueMode::Height => share * extent,
                ValueMode::Area => {
                    // Solve (slope/2)·h² + near·h − A = 0 for h: a
                    // trapezoid's area depends on both its height and the
                    // widths the taper induces at each end.
                    let area = share * total_area;
                    if slope.abs() < ZERO_FLOOR {
                        area / near.max(ZERO_FLOOR)
                    } else {
                        let discriminant = near.mul_add(near, 2.0 * slope * area).max(0.0);
                        (discriminant.sqrt() - near) / slope
                    }
                }
            };
            let far = width_at(offset + height);

            let item = &mut self.percent.core.items_mut()[i];
            let slice = item.visuals.trapezoid.get_or_insert_with(Default::default);
            slice.top_width = near;
            slice.bottom_width = far;
            slice.height = height;
            slice.disabled = false;
            let along = origin + start_offset + offset;
            let across = (cross - near.max(far)) / 2.0 + cross_origin;
            match self.orientation {
                Orientation::Vertical => {
                    slice.x = across;
                    slice.y = along;
                }
                Orientation::Horizontal => {
                    slice.x = along;
                    slice.y = across;
                }
            }
            offset += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::record;

    fn pyramid(values: &[f64]) -> PyramidSeries {
        let mut series = PyramidSeries::new("pyramid");
        series.percent.map_value_field("v");
        series
            .percent
            .core
            .set_data(values.iter().map(|&v| record([("v", v)])).collect());
        series
    }

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn test_slice_continuity() {
        // For all consecutive slices, bottom width equals the next one's
        // top width.
        let mut series = pyramid(&[10.0, 20.0, 30.0, 40.0]);
        series.validate(bounds());
        let slice = |i: usize| series.percent.core.items()[i].visuals.trapezoid.unwrap();
        for i in 0..3 {
            assert!((slice(i).bottom_width - slice(i + 1).top_width).abs() < 1e-9);
        }
        assert_eq!(slice(0).top_width, 0.0);
        assert!((slice(3).bottom_width - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_height_mode_shares() {
        let mut series = pyramid(&[25.0, 75.0]);
        series.validate(bounds());
        let slice = |i: usize| series.percent.core.items()[i].visuals.trapezoid.unwrap();
        assert_eq!(slice(0).height, 25.0);
        assert_eq!(slice(1).height, 75.0);
        assert_eq!(slice(1).y, 25.0);
    }

    #[test]
    fn test_area_mode_quadratic_solve() {
        let mut series = pyramid(&[50.0, 50.0]).value_is(ValueMode::Area);
        series.validate(bounds());
        let slice = |i: usize| series.percent.core.items()[i].visuals.trapezoid.unwrap();
        // Equal areas on a 0→full taper: the first slice must be taller
        // (it is narrower), and both areas match.
        assert!(slice(0).height > slice(1).height);
        assert!((slice(0).area() - slice(1).area()).abs() < 1e-6);
        // Heights still sum to the extent.
        assert!((slice(0).height + slice(1).height - 100.0).abs() < 1e-6);
        // Continuity survives the solve.
        assert!((slice(0).bottom_width - slice(1).top_width).abs() < 1e-9);
    }

    #[test]
    fn test_equal_widths_behave_like_bands() {
        let mut series = pyramid(&[40.0, 60.0]).widths(0.5, 0.5);
        series.validate(bounds());
        let slice = |i: usize| series.percent.core.items()[i].visuals.trapezoid.unwrap();
        assert_eq!(slice(0).top_width, 100.0);
        assert_eq!(slice(0).bottom_width, 100.0);
        assert_eq!(slice(1).top_width, 100.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_continuity_for_any_values(values in proptest::collection::vec(0.0f64..1e4, 2..16)) {
                let mut series = pyramid(&values);
                series.validate(bounds());
                let slices: Vec<_> = series
                    .percent
                    .core
                    .items()
                    .iter()
                    .map(|i| i.visuals.trapezoid.unwrap())
                    .collect();
                for pair in slices.windows(2) {
                    prop_assert!((pair[0].bottom_width - pair[1].top_width).abs() < 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_locations_offset_layout() {
        let mut series = pyramid(&[50.0, 50.0]).locations(0.5, 1.0);
        series.validate(bounds());
        let slice = |i: usize| series.percent.core.items()[i].visuals.trapezoid.unwrap();
        assert_eq!(slice(0).y, 50.0);
        assert_eq!(slice(0).height, 25.0);
        assert_eq!(slice(1).y, 75.0);
    }
}
