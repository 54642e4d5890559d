//! Funnel series: trapezoid slices stacked along an orientation, widths
//! proportional to values, with slice links bridging consecutive slices.

use crate::percent::{PercentSeriesCore, ZERO_FLOOR};
use graficar_core::Rect;

/// Layout direction of the percent family's linear series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Slices stack top to bottom
    #[default]
    Vertical,
    /// Slices stack left to right
    Horizontal,
}

/// What a slice's value controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMode {
    /// Value divides the total extent proportionally
    #[default]
    Height,
    /// Value controls the trapezoid's area share of the total
    Area,
}

/// Trapezoid-slice series.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelSeries {
    /// Percent-family core
    pub percent: PercentSeriesCore,
    /// Layout direction
    pub orientation: Orientation,
    /// How much a slice's far edge tapers toward the next slice's width:
    /// `0` keeps slices rectangular (links carry the taper), `1` tapers
    /// fully so slices meet edge to edge
    pub bottom_ratio: f64,
    /// Value semantics
    pub value_is: ValueMode,
    /// Extent consumed by each slice link
    pub link_height: f64,
    /// Sub-range of the extent the slices occupy
    pub start_location: f64,
    /// End of the sub-range
    pub end_location: f64,
}

impl FunnelSeries {
    /// Create a funnel series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            percent: PercentSeriesCore::new(name),
            orientation: Orientation::Vertical,
            bottom_ratio: 0.0,
            value_is: ValueMode::Height,
            link_height: 0.0,
            start_location: 0.0,
            end_location: 1.0,
        }
    }

    /// Set the layout direction.
    #[must_use]
    pub const fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the far-edge taper ratio.
    #[must_use]
    pub fn bottom_ratio(mut self, ratio: f64) -> Self {
        self.bottom_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the value semantics.
    #[must_use]
    pub const fn value_is(mut self, mode: ValueMode) -> Self {
        self.value_is = mode;
        self
    }

    /// Set the extent consumed by each slice link.
    #[must_use]
    pub fn link_height(mut self, height: f64) -> Self {
        self.link_height = height.max(0.0);
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

    /// Lay the slices along the orientation with a running cursor. Each
    /// link's extent is part of the budget, so slices beyond the first make
    /// room for it.
    #[allow(clippy::too_many_lines)]
    pub(crate) fn layout_slices(&mut self, bounds: Rect) {
        let included = self.percent.included_indices();
        self.disable_excluded(&included);
        if included.is_empty() {
            return;
        }

        let (extent_total, cross) = match self.orientation {
            Orientation::Vertical => (bounds.height, bounds.width),
            Orientation::Horizontal => (bounds.width, bounds.height),
        };
        let extent = (self.end_location - self.start_location) * extent_total;
        let links_total = self.link_height * (included.len() - 1) as f64;
        let budget = (extent - links_total).max(0.0);

        let values: Vec<f64> = included
            .iter()
            .map(|&i| PercentSeriesCore::floored_working(&self.percent.core.items()[i]))
            .collect();
        let total: f64 = values.iter().sum::<f64>().max(ZERO_FLOOR);
        let max_value = values.iter().copied().fold(ZERO_FLOOR, f64::max);
        let width_of = |v: f64| cross * v / max_value;

        // Widths are value-determined: near edge from the own value, far
        // edge tapered toward the next included value by `bottom_ratio`.
        let tops: Vec<f64> = values.iter().map(|&v| width_of(v)).collect();
        let bottoms: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(k, &v)| {
                let next = values.get(k + 1).copied().unwrap_or(v);
                width_of((next - v).mul_add(self.bottom_ratio, v))
            })
            .collect();

        let heights: Vec<f64> = match self.value_is {
            ValueMode::Height => values.iter().map(|&v| v / total * budget).collect(),
            ValueMode::Area => {
                // With both widths fixed, a slice's height follows from its
                // area share; normalize so the heights fill the budget.
                let raw: Vec<f64> = values
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| {
                        let mean_width = ((tops[k] + bottoms[k]) / 2.0).max(ZERO_FLOOR);
                        v / total / mean_width
                    })
                    .collect();
                let raw_total: f64 = raw.iter().sum::<f64>().max(ZERO_FLOOR);
                raw.iter().map(|h| h / raw_total * budget).collect()
            }
        };

        let mut cursor = self.start_location.mul_add(
            extent_total,
            match self.orientation {
                Orientation::Vertical => bounds.y,
                Orientation::Horizontal => bounds.x,
            },
        );

        for (k, &i) in included.iter().enumerate() {
            let (top_width, bottom_width, height) = (tops[k], bottoms[k], heights[k]);
            let link_top = bottom_width;
            let link_bottom = tops.get(k + 1).copied();

            let cross_origin = match self.orientation {
                Orientation::Vertical => bounds.x,
                Orientation::Horizontal => bounds.y,
            };
            let slice_cross = (cross - top_width.max(bottom_width)) / 2.0 + cross_origin;

            let item = &mut self.percent.core.items_mut()[i];
            let slice = item.visuals.trapezoid.get_or_insert_with(Default::default);
            slice.top_width = top_width;
            slice.bottom_width = bottom_width;
            slice.height = height;
            slice.disabled = false;
            match self.orientation {
                Orientation::Vertical => {
                    slice.x = slice_cross;
                    slice.y = cursor;
                }
                Orientation::Horizontal => {
                    slice.x = cursor;
                    slice.y = slice_cross;
                }
            }
            cursor += height;

            match link_bottom {
                Some(next_top) if self.link_height > 0.0 => {
                    let link = item.visuals.link.get_or_insert_with(Default::default);
                    link.top_width = link_top;
                    link.bottom_width = next_top;
                    link.height = self.link_height;
                    link.disabled = false;
                    match self.orientation {
                        Orientation::Vertical => {
                            link.x = (cross - link_top.max(next_top)) / 2.0 + cross_origin;
                            link.y = cursor;
                        }
                        Orientation::Horizontal => {
                            link.x = cursor;
                            link.y = (cross - link_top.max(next_top)) / 2.0 + cross_origin;
                        }
                    }
                    cursor += self.link_height;
                }
                _ => {
                    if let Some(link) = item.visuals.link.as_mut() {
                        link.disabled = true;
                    }
                }
            }
        }
    }

    fn disable_excluded(&mut self, included: &[usize]) {
        let (start, end) = self.percent.core.window();
        let end = end.min(self.percent.core.items().len());
        for i in start..end {
            if !included.contains(&i) {
                let item = &mut self.percent.core.items_mut()[i];
                if let Some(slice) = item.visuals.trapezoid.as_mut() {
                    slice.disabled = true;
                }
                if let Some(link) = item.visuals.link.as_mut() {
                    link.disabled = true;
                }
            }
        }
    }
}
