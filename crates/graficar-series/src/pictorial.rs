//! Pictorial stacked series: a pyramid confined to an arbitrary mask shape.
//!
//! The engine fits the mask's natural aspect ratio into the available
//! container and offsets the band layout to honor `start`/`end` locations
//! within the masked shape. The mask path itself is a host concern; the
//! series only needs its natural box.

use crate::percent::PercentSeriesCore;
use crate::pyramid::PyramidSeries;
use graficar_core::{Rect, Size};

/// Pyramid bands confined to a mask shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PictorialStackedSeries {
    /// Band layout engine; widths are uniform, the mask provides the shape
    pub pyramid: PyramidSeries,
    /// Natural size of the mask shape
    pub mask_size: Size,
}

impl PictorialStackedSeries {
    /// Create a pictorial series for a mask with the given natural size.
    #[must_use]
    pub fn new(name: impl Into<String>, mask_size: Size) -> Self {
        Self {
            pyramid: PyramidSeries::new(name).widths(1.0, 1.0),
            mask_size,
        }
    }

    /// Percent-family core.
    #[must_use]
    pub const fn percent(&self) -> &PercentSeriesCore {
        &self.pyramid.percent
    }

    /// Restrict the bands to a sub-range of the masked shape.
    #[must_use]
    pub fn locations(mut self, start: f64, end: f64) -> Self {
        self.pyramid = self.pyramid.locations(start, end);
        self
    }

    /// Scale factor that fits the mask into a container.
    #[must_use]
    pub fn mask_scale(&self, container: Size) -> f64 {
        if self.mask_size.width <= 0.0 || self.mask_size.height <= 0.0 {
            return 0.0;
        }
        (container.width / self.mask_size.width).min(container.height / self.mask_size.height)
    }

    /// The mask's fitted, centered bounds within a container.
    #[must_use]
    pub fn fitted_bounds(&self, container: Size) -> Rect {
        let scale = self.mask_scale(container);
        let fitted = self.mask_size.scale(scale);
        Rect::new(
            (container.width - fitted.width) / 2.0,
            (container.height - fitted.height) / 2.0,
            fitted.width,
            fitted.height,
        )
    }

    /// Run a full validation pass into the container: fit the mask, then
    /// lay the bands into the fitted box.
    pub fn validate(&mut self, container: Size) {
        let bounds = self.fitted_bounds(container);
        self.pyramid.validate(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::Orientation;
    use crate::value::record;

    fn pictorial(values: &[f64]) -> PictorialStackedSeries {
        let mut series = PictorialStackedSeries::new("pict", Size::new(50.0, 100.0));
        series.pyramid.percent.map_value_field("v");
        series
            .pyramid
            .percent
            .core
            .set_data(values.iter().map(|&v| record([("v", v)])).collect());
        series
    }

    #[test]
    fn test_mask_fit_preserves_aspect() {
        let series = pictorial(&[1.0]);
        // A 50×100 mask in a 200×100 container scales by height.
        assert_eq!(series.mask_scale(Size::new(200.0, 100.0)), 1.0);
        let bounds = series.fitted_bounds(Size::new(200.0, 100.0));
        assert_eq!(bounds, Rect::new(75.0, 0.0, 50.0, 100.0));
        // A shorter container scales down and re-centers.
        let bounds = series.fitted_bounds(Size::new(200.0, 50.0));
        assert_eq!(bounds, Rect::new(87.5, 0.0, 25.0, 50.0));
    }

    #[test]
    fn test_bands_fill_fitted_mask() {
        let mut series = pictorial(&[30.0, 70.0]);
        series.validate(Size::new(200.0, 100.0));
        let slice = |i: usize| {
            series.pyramid.percent.core.items()[i].visuals.trapezoid.unwrap()
        };
        // Uniform widths spanning the fitted mask box.
        assert_eq!(slice(0).top_width, 50.0);
        assert_eq!(slice(0).bottom_width, 50.0);
        assert_eq!(slice(0).x, 75.0);
        assert_eq!(slice(0).height, 30.0);
        assert_eq!(slice(1).y, 30.0);
        assert_eq!(slice(1).height, 70.0);
    }

    #[test]
    fn test_locations_within_mask() {
        let mut series = pictorial(&[50.0, 50.0]).locations(0.2, 0.8);
        series.validate(Size::new(200.0, 100.0));
        let slice = |i: usize| {
            series.pyramid.percent.core.items()[i].visuals.trapezoid.unwrap()
        };
        // Bands occupy the 20..80 sub-range of the fitted mask.
        assert_eq!(slice(0).y, 20.0);
        assert_eq!(slice(0).height, 30.0);
        assert_eq!(slice(1).y, 50.0);
    }

    #[test]
    fn test_horizontal_mask() {
        let mut series = pictorial(&[50.0, 50.0]);
        series.pyramid = series.pyramid.orientation(Orientation::Horizontal);
        series.validate(Size::new(200.0, 100.0));
        let slice = series.pyramid.percent.core.items()[0].visuals.trapezoid.unwrap();
        // Extent runs along the fitted box's width.
        assert_eq!(slice.height, 25.0);
        assert_eq!(slice.x, 75.0);
    }
}
