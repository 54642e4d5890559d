//! Cartesian chart container: owns axes and registered series, and runs the
//! validation pipeline in its guaranteed order.
//!
//! Within one pass: axes are final before any series layout runs, stacking
//! and derived values complete before any geometry is written, and
//! clustering/stacking read only earlier-registered siblings' state.

use crate::candlestick::CandlestickSeries;
use crate::column::ColumnSeries;
use crate::event::SeriesEvent;
use crate::heatmap::HeatMapSeries;
use crate::line::LineSeries;
use crate::xy::{stack_base, BaseAxis, XySeries};
use graficar_core::{AnyAxis, Axis, AxisId, ChartError, Point, Rect, Size};
use std::collections::BTreeMap;

/// Tolerance for window membership at cell boundaries.
const POSITION_EPSILON: f64 = 1e-9;

/// Concrete Cartesian series dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum CartesianSeries {
    /// Rectangular bars
    Column(ColumnSeries),
    /// Polyline segments
    Line(LineSeries),
    /// Columns with wicks
    Candlestick(CandlestickSeries),
    /// Value-colored cells
    HeatMap(HeatMapSeries),
}

impl CartesianSeries {
    /// Shared Cartesian layer.
    #[must_use]
    pub const fn xy(&self) -> &XySeries {
        match self {
            Self::Column(s) => &s.xy,
            Self::Line(s) => &s.xy,
            Self::Candlestick(s) => &s.column.xy,
            Self::HeatMap(s) => &s.column.xy,
        }
    }

    /// Mutable shared Cartesian layer.
    pub fn xy_mut(&mut self) -> &mut XySeries {
        match self {
            Self::Column(s) => &mut s.xy,
            Self::Line(s) => &mut s.xy,
            Self::Candlestick(s) => &mut s.column.xy,
            Self::HeatMap(s) => &mut s.column.xy,
        }
    }

    /// Column layer, for kinds that cluster.
    fn column_mut(&mut self) -> Option<&mut ColumnSeries> {
        match self {
            Self::Column(s) => Some(s),
            Self::Candlestick(s) => Some(&mut s.column),
            Self::HeatMap(s) => Some(&mut s.column),
            Self::Line(_) => None,
        }
    }

    fn column_ref(&self) -> Option<&ColumnSeries> {
        match self {
            Self::Column(s) => Some(s),
            Self::Candlestick(s) => Some(&s.column),
            Self::HeatMap(s) => Some(&s.column),
            Self::Line(_) => None,
        }
    }

    fn define_fields(&mut self, axes: &[AnyAxis]) -> Result<(), ChartError> {
        match self {
            Self::Candlestick(s) => s.define_fields(axes),
            _ => self.xy_mut().define_fields(axes),
        }
    }

    fn validate_layout(&mut self, axes: &[AnyAxis], plot: Size, working: bool) {
        match self {
            Self::Column(s) => s.validate_columns(axes, plot, working),
            Self::Line(s) => {
                s.validate_segments(axes, plot, working);
                s.validate_bullets(axes, plot, working);
            }
            Self::Candlestick(s) => s.validate_candles(axes, plot, working),
            Self::HeatMap(s) => s.validate_heat(axes, plot, working),
        }
    }
}

/// Tooltip resolution result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPoint {
    /// Index of the matched data item
    pub index: usize,
    /// Pixel point for tooltip placement
    pub point: Point,
}

/// Callback receiving recovered per-item errors.
pub type ErrorReporter = Box<dyn FnMut(&ChartError)>;

/// Chart-level container running the validation pipeline.
pub struct CartesianChart {
    axes: Vec<AnyAxis>,
    series: Vec<CartesianSeries>,
    plot: Size,
    error_reporter: Option<ErrorReporter>,
}

impl std::fmt::Debug for CartesianChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartesianChart")
            .field("axes", &self.axes.len())
            .field("series", &self.series.len())
            .field("plot", &self.plot)
            .finish_non_exhaustive()
    }
}

impl CartesianChart {
    /// Create a chart with the given plot-area size.
    #[must_use]
    pub fn new(plot: Size) -> Self {
        Self {
            axes: Vec::new(),
            series: Vec::new(),
            plot,
            error_reporter: None,
        }
    }

    /// Register an axis, returning its id.
    pub fn add_axis(&mut self, axis: AnyAxis) -> AxisId {
        self.axes.push(axis);
        AxisId(self.axes.len() - 1)
    }

    /// Register a series, returning its registration index. Registration
    /// order is the clustering and stacking order.
    pub fn add_series(&mut self, series: CartesianSeries) -> usize {
        self.series.push(series);
        self.series.len() - 1
    }

    /// Axis by id.
    #[must_use]
    pub fn axis(&self, id: AxisId) -> Option<&AnyAxis> {
        self.axes.get(id.0)
    }

    /// Mutable axis access; invalidates every series bound to it.
    pub fn axis_mut(&mut self, id: AxisId) -> Option<&mut AnyAxis> {
        for series in &mut self.series {
            let (x, y) = series.xy().axes();
            if x == id || y == id {
                series.xy_mut().core.invalidate_data_items();
            }
        }
        self.axes.get_mut(id.0)
    }

    /// All axes.
    #[must_use]
    pub fn axes(&self) -> &[AnyAxis] {
        &self.axes
    }

    /// Registered series.
    #[must_use]
    pub fn series(&self) -> &[CartesianSeries] {
        &self.series
    }

    /// Mutable series access.
    pub fn series_mut(&mut self, index: usize) -> Option<&mut CartesianSeries> {
        self.series.get_mut(index)
    }

    /// Plot-area size.
    #[must_use]
    pub const fn plot(&self) -> Size {
        self.plot
    }

    /// Install the critical-error reporter. Per-item processing failures are
    /// forwarded here and the pass continues.
    pub fn set_error_reporter(&mut self, reporter: ErrorReporter) {
        self.error_reporter = Some(reporter);
    }

    /// Run one full validation pass.
    ///
    /// Configuration errors (unresolved fields, axis mismatches) abort with
    /// `Err`; recovered data errors go to the reporter.
    pub fn validate(&mut self) -> Result<(), ChartError> {
        // Records → items, field resolution, error forwarding.
        for i in 0..self.series.len() {
            let axes = &self.axes;
            let series = &mut self.series[i];
            series.xy_mut().core.validate_data();
            series.define_fields(axes)?;
            let errors = series.xy().core.item_errors().to_vec();
            if let Some(reporter) = self.error_reporter.as_mut() {
                for error in &errors {
                    log::warn!("{error}");
                    reporter(error);
                }
            }
        }

        self.update_windows();

        // Derived values before any geometry.
        for series in &mut self.series {
            series.xy_mut().core.validate_data_items();
        }
        self.compute_stacks(true);
        for series in &mut self.series {
            let axes = &self.axes;
            series.xy_mut().process_axis_values(axes, true);
        }

        // Axis-dependent layout state, then per-item geometry.
        self.compute_cluster_locations();
        for series in &mut self.series {
            let core = &mut series.xy_mut().core;
            if core.is_hidden() {
                for item in core.items_mut() {
                    item.visuals.disable_all();
                }
                core.invalid = false;
                continue;
            }
            if core.is_invalid() {
                core.process_values(true);
            }
            series.validate_layout(&self.axes, self.plot, true);
            series.xy_mut().core.invalid = false;
        }
        Ok(())
    }

    /// Derive each series' visible window from its base axis zoom.
    fn update_windows(&mut self) {
        for series in &mut self.series {
            let xy = series.xy_mut();
            let base_axis_id = match xy.base_axis {
                BaseAxis::X => xy.x_axis,
                BaseAxis::Y => xy.y_axis,
            };
            let Some(axis) = self.axes.get(base_axis_id.0) else {
                continue;
            };
            let (zoom_start, zoom_end) = axis.zoom_window();
            let len = xy.core.items().len();
            let window = if zoom_start <= 0.0 && zoom_end >= 1.0 {
                (0, len)
            } else {
                let field = xy.base_field().to_string();
                let mut first = None;
                let mut last = None;
                for (i, item) in xy.core.items().iter().enumerate() {
                    let location = item.working_location(&field);
                    let Some(position) =
                        XySeries::field_position(axis, item, &field, location, true, false)
                    else {
                        continue;
                    };
                    if position >= zoom_start - POSITION_EPSILON
                        && position <= zoom_end + POSITION_EPSILON
                    {
                        first.get_or_insert(i);
                        last = Some(i);
                    }
                }
                match (first, last) {
                    (Some(f), Some(l)) => (f, l + 1),
                    _ => (0, 0),
                }
            };
            if window != xy.core.window() {
                xy.core.set_window(window.0, window.1);
            }
        }
    }

    /// Write each stacked item's stack base by walking earlier-registered
    /// siblings. Runs in registration order so every scan reads only
    /// already-written state; re-running on an unchanged chain is a no-op.
    fn compute_stacks(&mut self, working: bool) {
        for i in 0..self.series.len() {
            let (before, rest) = self.series.split_at_mut(i);
            let xy = rest[0].xy_mut();
            let field = xy.value_field().to_string();
            if field.is_empty() {
                continue;
            }
            let stacked = xy.stacked;
            let kind = xy.kind();
            let stack_to_negative = xy.stack_to_negative;
            let axis_pair = xy.axes();
            let prior: Vec<&XySeries> = before
                .iter()
                .map(CartesianSeries::xy)
                .filter(|s| s.axes() == axis_pair)
                .collect();

            for index in 0..xy.core.items().len() {
                let Some(value) = xy.core.items()[index].effective_value(&field, working) else {
                    continue;
                };
                let base = if stacked {
                    stack_base(&prior, kind, index, &field, value, stack_to_negative, working)
                } else {
                    0.0
                };
                let slot = xy.core.items_mut()[index].slot_mut(&field);
                slot.stack = base;
                slot.stack_true = base + value;
            }
        }
    }

    /// Recompute cluster slot locations for every column-like series.
    ///
    /// Within each base-axis group, series sorted by secondary-axis index
    /// (then registration order) claim slots: an unstacked clustered series
    /// always opens a new slot; a stacked clustered one only when its
    /// secondary axis differs from the previous series in sort order.
    /// Unclustered series span the whole cell.
    fn compute_cluster_locations(&mut self) {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, series) in self.series.iter().enumerate() {
            let Some(column) = series.column_ref() else {
                continue;
            };
            let xy = &column.xy;
            let base_axis_id = match xy.base_axis {
                BaseAxis::X => xy.x_axis,
                BaseAxis::Y => xy.y_axis,
            };
            groups.entry(base_axis_id.0).or_default().push(i);
        }

        for members in groups.values() {
            let mut sorted = members.clone();
            sorted.sort_by_key(|&i| {
                let xy = self.series[i].xy();
                let secondary = match xy.base_axis {
                    BaseAxis::X => xy.y_axis,
                    BaseAxis::Y => xy.x_axis,
                };
                (secondary.0, i)
            });

            // First pass: count slots and remember each series' slot index.
            let mut slots = 0usize;
            let mut slot_of: BTreeMap<usize, usize> = BTreeMap::new();
            let mut previous_secondary: Option<usize> = None;
            for &i in &sorted {
                let xy = self.series[i].xy();
                let clustered = self.series[i]
                    .column_ref()
                    .is_some_and(ColumnSeries::is_clustered);
                if !clustered {
                    continue;
                }
                let secondary = match xy.base_axis {
                    BaseAxis::X => xy.y_axis.0,
                    BaseAxis::Y => xy.x_axis.0,
                };
                let new_slot =
                    !xy.stacked || previous_secondary.is_some_and(|p| p != secondary) || slots == 0;
                if new_slot {
                    slots += 1;
                }
                slot_of.insert(i, slots - 1);
                previous_secondary = Some(secondary);
            }
            let total = slots.max(1) as f64;

            // Second pass: write the locations.
            for &i in &sorted {
                let Some(column) = self.series[i].column_mut() else {
                    continue;
                };
                let cell_start = column.cell_start_location;
                let cell_width = column.cell_end_location - column.cell_start_location;
                if let Some(&slot) = slot_of.get(&i) {
                    column.set_slot_locations(
                        (slot as f64 / total).mul_add(cell_width, cell_start),
                        ((slot + 1) as f64 / total).mul_add(cell_width, cell_start),
                    );
                } else {
                    column.set_slot_locations(cell_start, cell_start + cell_width);
                }
            }
        }
    }

    /// Map a pixel position on a series' base axis back to a data item and
    /// resolve the full pixel point for tooltip placement.
    ///
    /// Points outside the plot bounds (1px tolerance) suppress the tooltip
    /// rather than clamping it.
    #[must_use]
    pub fn show_tooltip_at_position(
        &self,
        series_index: usize,
        coordinate: f64,
    ) -> Option<TooltipPoint> {
        let series = self.series.get(series_index)?.xy();
        let base_axis_id = match series.base_axis {
            BaseAxis::X => series.x_axis,
            BaseAxis::Y => series.y_axis,
        };
        let axis = self.axes.get(base_axis_id.0)?;
        let position = axis.coordinate_to_position(coordinate);
        let index = series.item_at_position(axis, position)?;
        let item = &series.core.items()[index];
        let point = series.get_point(
            item,
            &self.axes,
            self.plot,
            &series.x_field,
            &series.y_field,
            item.working_location(&series.x_field),
            item.working_location(&series.y_field),
            true,
        )?;
        let bounds = Rect::from_size(self.plot);
        if bounds.contains_with_tolerance(&point, 1.0) {
            Some(TooltipPoint { index, point })
        } else {
            None
        }
    }

    /// Drain every series' pending events.
    pub fn drain_events(&mut self) -> Vec<(usize, SeriesEvent)> {
        let mut events = Vec::new();
        for (i, series) in self.series.iter_mut().enumerate() {
            for event in series.xy_mut().drain_events() {
                events.push((i, event));
            }
        }
        events
    }

    /// Grow each value axis to fit the total extremes of the series bound to
    /// it. Hosts call this after draining extremes events.
    pub fn auto_range_axes(&mut self) {
        for (axis_index, axis) in self.axes.iter_mut().enumerate() {
            let Some(value_axis) = axis.as_value_mut() else {
                continue;
            };
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for series in &self.series {
                if let Some((lo, hi)) = series.xy().total_extremes(AxisId(axis_index)) {
                    min = min.min(lo);
                    max = max.max(hi);
                }
            }
            if min.is_finite() && max.is_finite() {
                value_axis.set_range(min.min(value_axis.base), max.max(value_axis.base));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{record, DataValue, Record};
    use crate::xy::SeriesKind;
    use graficar_core::{CategoryAxis, ValueAxis};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn category_records(values: &[f64]) -> Vec<Record> {
        let categories = ["a", "b", "c"];
        values
            .iter()
            .zip(categories)
            .map(|(&v, c)| {
                record([
                    ("cat", DataValue::Text(c.into())),
                    ("v", DataValue::Number(v)),
                ])
            })
            .collect()
    }

    fn column_series(name: &str, values: &[f64], x: AxisId, y: AxisId) -> ColumnSeries {
        let mut series = ColumnSeries::new(name, x, y);
        series.xy.core.map_field("categoryX", "cat");
        series.xy.core.map_field("valueY", "v");
        series.xy.core.set_data(category_records(values));
        series
    }

    fn chart_with(series: Vec<CartesianSeries>) -> CartesianChart {
        let mut chart = CartesianChart::new(Size::new(300.0, 100.0));
        chart.add_axis(AnyAxis::Category(CategoryAxis::new(["a", "b", "c"], 300.0)));
        chart.add_axis(AnyAxis::Value(ValueAxis::new(0.0, 10.0, 100.0).inverted(true)));
        for s in series {
            chart.add_series(s);
        }
        chart
    }

    #[test]
    fn test_clustered_columns_share_cell() {
        // Two clustered series: left/right halves of each category cell,
        // contiguous and non-overlapping.
        let s1 = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1));
        let s2 = column_series("s2", &[3.0, 2.0, 1.0], AxisId(0), AxisId(1));
        let mut chart = chart_with(vec![
            CartesianSeries::Column(s1),
            CartesianSeries::Column(s2),
        ]);
        chart.validate().unwrap();

        let slot = |i: usize| match &chart.series()[i] {
            CartesianSeries::Column(c) => c.slot_locations(),
            _ => unreachable!(),
        };
        assert_eq!(slot(0), (0.0, 0.5));
        assert_eq!(slot(1), (0.5, 1.0));
        assert_eq!(slot(0).1, slot(1).0);

        // Six non-overlapping rectangles; within category "a" the pair
        // splits the 0..100 cell.
        let column = |s: usize, i: usize| match &chart.series()[s] {
            CartesianSeries::Column(c) => c.xy.core.items()[i].visuals.column.unwrap(),
            _ => unreachable!(),
        };
        let left = column(0, 0);
        let right = column(1, 0);
        assert_eq!(left.x, 0.0);
        assert_eq!(left.width, 50.0);
        assert_eq!(right.x, 50.0);
        assert_eq!(right.width, 50.0);
        // series1 heights grow with its values.
        assert!(column(0, 0).height < column(0, 2).height);
    }

    #[test]
    fn test_unclustered_series_spans_cell() {
        let s1 = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1)).clustered(false);
        let s2 = column_series("s2", &[3.0, 2.0, 1.0], AxisId(0), AxisId(1));
        let mut chart = chart_with(vec![
            CartesianSeries::Column(s1),
            CartesianSeries::Column(s2),
        ]);
        chart.validate().unwrap();
        let slot = |i: usize| match &chart.series()[i] {
            CartesianSeries::Column(c) => c.slot_locations(),
            _ => unreachable!(),
        };
        assert_eq!(slot(0), (0.0, 1.0));
        // The single clustered series gets the whole cell too.
        assert_eq!(slot(1), (0.0, 1.0));
    }

    #[test]
    fn test_stacked_series_share_slot() {
        let s1 = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1)).clustered(true);
        let mut s2 = column_series("s2", &[3.0, 2.0, 1.0], AxisId(0), AxisId(1));
        s2.xy = s2.xy.stacked(true);
        let mut chart = chart_with(vec![
            CartesianSeries::Column(s1),
            CartesianSeries::Column(s2),
        ]);
        chart.validate().unwrap();
        let slot = |i: usize| match &chart.series()[i] {
            CartesianSeries::Column(c) => c.slot_locations(),
            _ => unreachable!(),
        };
        // The stacked series rides the first one's slot.
        assert_eq!(slot(0), (0.0, 1.0));
        assert_eq!(slot(1), (0.0, 1.0));
    }

    #[test]
    fn test_stack_values_accumulate() {
        let s1 = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1));
        let mut s2 = column_series("s2", &[3.0, 2.0, 1.0], AxisId(0), AxisId(1));
        s2.xy = s2.xy.stacked(true);
        let mut chart = chart_with(vec![
            CartesianSeries::Column(s1),
            CartesianSeries::Column(s2),
        ]);
        chart.validate().unwrap();
        let stack = |chart: &CartesianChart, s: usize, i: usize| {
            chart.series()[s].xy().core.items()[i].slot("valueY").unwrap().stack
        };
        assert_eq!(stack(&chart, 1, 0), 1.0);
        assert_eq!(stack(&chart, 1, 1), 2.0);
        assert_eq!(stack(&chart, 1, 2), 3.0);

        // Idempotence: a second unchanged pass yields identical stacks.
        chart.series_mut(1).unwrap().xy_mut().core.invalidate_data_items();
        chart.validate().unwrap();
        assert_eq!(stack(&chart, 1, 0), 1.0);
        assert_eq!(stack(&chart, 1, 2), 3.0);
    }

    #[test]
    fn test_sign_aware_stacking() {
        // Values [5, -3]: the negative series' stack base is 0, not 5.
        let s1 = column_series("s1", &[5.0, 5.0, 5.0], AxisId(0), AxisId(1));
        let mut s2 = column_series("s2", &[-3.0, -3.0, -3.0], AxisId(0), AxisId(1));
        s2.xy = s2.xy.stacked(true);
        let mut chart = chart_with(vec![
            CartesianSeries::Column(s1),
            CartesianSeries::Column(s2),
        ]);
        chart.validate().unwrap();
        assert_eq!(
            chart.series()[1].xy().core.items()[0].slot("valueY").unwrap().stack,
            0.0
        );
    }

    #[test]
    fn test_stacked_extremes_are_cumulative() {
        let s1 = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1));
        let mut s2 = column_series("s2", &[3.0, 2.0, 1.0], AxisId(0), AxisId(1));
        s2.xy = s2.xy.stacked(true);
        let mut chart = chart_with(vec![
            CartesianSeries::Column(s1),
            CartesianSeries::Column(s2),
        ]);
        chart.validate().unwrap();
        // The stacked series reports the stack top (4.0 everywhere), not
        // just its own item extents.
        assert_eq!(
            chart.series()[1].xy().total_extremes(AxisId(1)),
            Some((1.0, 4.0))
        );
        chart.auto_range_axes();
        match chart.axis(AxisId(1)).unwrap() {
            AnyAxis::Value(v) => assert_eq!((v.min, v.max), (0.0, 4.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_zoom_window_updates_series_window() {
        let s1 = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1));
        let mut chart = chart_with(vec![CartesianSeries::Column(s1)]);
        if let Some(AnyAxis::Category(axis)) = chart.axes.first_mut() {
            *axis = axis.clone().zoom(0.0, 0.67);
        }
        chart.validate().unwrap();
        assert_eq!(chart.series()[0].xy().core.window(), (0, 2));
    }

    #[test]
    fn test_tooltip_resolution_and_suppression() {
        let s1 = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1));
        let mut chart = chart_with(vec![CartesianSeries::Column(s1)]);
        chart.validate().unwrap();
        // Coordinate near the center of category "b".
        let tooltip = chart.show_tooltip_at_position(0, 150.0).unwrap();
        assert_eq!(tooltip.index, 1);
        assert_eq!(tooltip.point, Point::new(150.0, 80.0));
    }

    #[test]
    fn test_tooltip_suppressed_outside_plot() {
        let s1 = column_series("s1", &[1.0, 2.0, 30.0], AxisId(0), AxisId(1));
        let mut chart = chart_with(vec![CartesianSeries::Column(s1)]);
        chart.validate().unwrap();
        // Item "c" has value 30 on a 0..10 axis: its point lies far above
        // the plot, so the tooltip is suppressed rather than clamped.
        assert!(chart.show_tooltip_at_position(0, 250.0).is_none());
    }

    #[test]
    fn test_missing_field_aborts_validation() {
        let mut series = ColumnSeries::new("broken", AxisId(0), AxisId(1));
        series.xy.core.map_field("categoryX", "cat");
        series.xy.core.set_data(category_records(&[1.0, 2.0, 3.0]));
        let mut chart = chart_with(vec![CartesianSeries::Column(series)]);
        let err = chart.validate().unwrap_err();
        assert!(matches!(err, ChartError::MissingField { .. }));
    }

    #[test]
    fn test_item_errors_reach_reporter() {
        let mut series = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1));
        series.xy.core.set_data(vec![
            record([("cat", DataValue::Text("a".into())), ("v", DataValue::Text("x".into()))]),
            record([("cat", DataValue::Text("b".into())), ("v", DataValue::Number(2.0))]),
        ]);
        let mut chart = chart_with(vec![CartesianSeries::Column(series)]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        chart.set_error_reporter(Box::new(move |e| sink.borrow_mut().push(e.clone())));
        // The pass completes; the bad item is reported and the rest renders.
        chart.validate().unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert!(chart.series()[0].xy().core.items()[1].visuals.column.is_some());
    }

    #[test]
    fn test_hidden_series_disables_elements() {
        let s1 = column_series("s1", &[1.0, 2.0, 3.0], AxisId(0), AxisId(1));
        let mut chart = chart_with(vec![CartesianSeries::Column(s1)]);
        chart.validate().unwrap();
        chart.series_mut(0).unwrap().xy_mut().core.hide();
        chart.validate().unwrap();
        assert!(chart.series()[0]
            .xy()
            .core
            .items()
            .iter()
            .all(|i| i.visuals.column.unwrap().disabled));
        chart.series_mut(0).unwrap().xy_mut().core.show();
        chart.validate().unwrap();
        assert!(!chart.series()[0].xy().core.items()[0].visuals.column.unwrap().disabled);
    }

    #[test]
    fn test_line_series_through_pipeline() {
        let mut series = LineSeries::new("line", AxisId(0), AxisId(1));
        series.xy.core.map_field("categoryX", "cat");
        series.xy.core.map_field("valueY", "v");
        series.xy.core.set_data(category_records(&[1.0, 2.0, 3.0]));
        let mut chart = chart_with(vec![CartesianSeries::Line(series)]);
        chart.validate().unwrap();
        match &chart.series()[0] {
            CartesianSeries::Line(line) => {
                assert_eq!(line.active_segments().count(), 1);
                assert_eq!(line.xy.kind(), SeriesKind::Line);
            }
            _ => unreachable!(),
        }
    }
}
