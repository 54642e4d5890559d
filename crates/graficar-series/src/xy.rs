//! Cartesian series layer: axis-field resolution, stacking, extremes
//! tracking, and the single authoritative coordinate-resolution path.

use crate::data_item::DataItem;
use crate::event::SeriesEvent;
use crate::series::SeriesCore;
use graficar_core::{AnyAxis, Axis, AxisField, AxisId, ChartError, Point, Size};
use std::collections::BTreeMap;

/// Concrete series kind; stacking and clustering only mix identical kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Rectangular bars
    Column,
    /// Polyline/curve segments
    Line,
    /// Columns with high/low wicks
    Candlestick,
    /// Columns colored by value
    HeatMap,
}

impl SeriesKind {
    /// Column-like kinds participate in cluster-slot layout.
    #[must_use]
    pub const fn is_column_like(self) -> bool {
        matches!(self, Self::Column | Self::Candlestick | Self::HeatMap)
    }
}

/// Which axis drives category/date ordering and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseAxis {
    /// Categories/dates run along x (vertical columns)
    X,
    /// Categories/dates run along y (horizontal columns)
    Y,
}

/// A sub-region on an axis for which the series creates parallel
/// range-specific elements alongside its normal per-item visuals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRangeSpec {
    /// Axis the range lives on
    pub axis: AxisId,
    /// Range start, in axis value space
    pub start: f64,
    /// Range end, in axis value space
    pub end: f64,
}

/// A series bound to exactly two axes.
#[derive(Debug, Clone, PartialEq)]
pub struct XySeries {
    /// Base aggregation engine
    pub core: SeriesCore,
    pub(crate) kind: SeriesKind,
    pub(crate) x_axis: AxisId,
    pub(crate) y_axis: AxisId,
    pub(crate) base_axis: BaseAxis,
    /// Resolved logical field names; empty until `define_fields`
    pub(crate) x_field: String,
    pub(crate) y_field: String,
    pub(crate) x_open_field: String,
    pub(crate) y_open_field: String,
    pub(crate) stacked: bool,
    pub(crate) stack_to_negative: bool,
    pub(crate) snap_tooltip: bool,
    pub(crate) min_bullet_distance: f64,
    /// Total extremes per axis, over all items
    pub(crate) tmin: BTreeMap<usize, f64>,
    pub(crate) tmax: BTreeMap<usize, f64>,
    /// Selection-scoped extremes per axis, over the visible window
    pub(crate) smin: BTreeMap<usize, f64>,
    pub(crate) smax: BTreeMap<usize, f64>,
    pub(crate) pending_events: Vec<SeriesEvent>,
    pub(crate) axis_ranges: Vec<AxisRangeSpec>,
}

impl XySeries {
    /// Create a series of the given kind bound to an axis pair.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SeriesKind, x_axis: AxisId, y_axis: AxisId) -> Self {
        Self {
            core: SeriesCore::new(name),
            kind,
            x_axis,
            y_axis,
            base_axis: BaseAxis::X,
            x_field: String::new(),
            y_field: String::new(),
            x_open_field: String::new(),
            y_open_field: String::new(),
            stacked: false,
            stack_to_negative: true,
            snap_tooltip: true,
            min_bullet_distance: 0.0,
            tmin: BTreeMap::new(),
            tmax: BTreeMap::new(),
            smin: BTreeMap::new(),
            smax: BTreeMap::new(),
            pending_events: Vec::new(),
            axis_ranges: Vec::new(),
        }
    }

    /// Series kind.
    #[must_use]
    pub const fn kind(&self) -> SeriesKind {
        self.kind
    }

    /// Axis pair.
    #[must_use]
    pub const fn axes(&self) -> (AxisId, AxisId) {
        (self.x_axis, self.y_axis)
    }

    /// Set which axis drives ordering.
    #[must_use]
    pub const fn base_axis(mut self, base: BaseAxis) -> Self {
        self.base_axis = base;
        self
    }

    /// Stack on top of earlier same-kind siblings sharing this axis pair.
    #[must_use]
    pub fn stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self.core.invalidate_data_items();
        self
    }

    /// When true (default), stacking resets to the baseline on sign flips so
    /// positive and negative stacks never overlap.
    #[must_use]
    pub const fn stack_to_negative(mut self, on: bool) -> Self {
        self.stack_to_negative = on;
        self
    }

    /// Snap tooltips to the nearest item instead of the exact cell.
    #[must_use]
    pub const fn snap_tooltip(mut self, snap: bool) -> Self {
        self.snap_tooltip = snap;
        self
    }

    /// Minimum pixel distance between bullets before they are thinned out.
    #[must_use]
    pub const fn min_bullet_distance(mut self, distance: f64) -> Self {
        self.min_bullet_distance = distance;
        self
    }

    /// Add an axis range producing parallel range-specific elements.
    pub fn add_axis_range(&mut self, range: AxisRangeSpec) {
        self.axis_ranges.push(range);
        self.core.invalidate();
    }

    /// Events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SeriesEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Resolved field name along the base axis.
    #[must_use]
    pub fn base_field(&self) -> &str {
        match self.base_axis {
            BaseAxis::X => &self.x_field,
            BaseAxis::Y => &self.y_field,
        }
    }

    /// Resolved field name along the value (non-base) axis.
    #[must_use]
    pub fn value_field(&self) -> &str {
        match self.base_axis {
            BaseAxis::X => &self.y_field,
            BaseAxis::Y => &self.x_field,
        }
    }

    /// Open-field counterpart of [`Self::value_field`].
    #[must_use]
    pub fn value_open_field(&self) -> &str {
        match self.base_axis {
            BaseAxis::X => &self.y_open_field,
            BaseAxis::Y => &self.x_open_field,
        }
    }

    /// Derive the four logical field names from the bound axes.
    ///
    /// Each open-field defaults to its close-field when the data does not
    /// supply one — except that a stacked series ignores supplied open data
    /// on the non-base side entirely: its baseline comes from the stack
    /// chain.
    pub fn define_fields(&mut self, axes: &[AnyAxis]) -> Result<(), ChartError> {
        let x = axis_of(axes, self.x_axis, &self.core.name)?;
        let y = axis_of(axes, self.y_axis, &self.core.name)?;

        self.x_field = self.resolve_field(x.axis_field(), "X")?;
        self.y_field = self.resolve_field(y.axis_field(), "Y")?;

        let stacked_on = |base_is: BaseAxis| self.stacked && self.base_axis != base_is;
        self.x_open_field = resolve_open(
            &self.core,
            x.axis_field(),
            "X",
            &self.x_field,
            stacked_on(BaseAxis::Y),
        );
        self.y_open_field = resolve_open(
            &self.core,
            y.axis_field(),
            "Y",
            &self.y_field,
            stacked_on(BaseAxis::X),
        );
        Ok(())
    }

    /// Resolve one side's close field against the axis kind, validating the
    /// data-field mapping.
    fn resolve_field(&self, kind: AxisField, suffix: &str) -> Result<String, ChartError> {
        let wanted = logical_field(kind, suffix);
        if self.core.data_fields.contains_key(&wanted) {
            return Ok(wanted);
        }
        // A mapping of a different semantic kind on this side is a
        // configuration mismatch, not a missing field.
        for other in [AxisField::Value, AxisField::Date, AxisField::Category] {
            if other != kind {
                let name = logical_field(other, suffix);
                if self.core.data_fields.contains_key(&name) {
                    return Err(ChartError::AxisFieldMismatch {
                        series: self.core.name.clone(),
                        field: name,
                        expected: kind,
                    });
                }
            }
        }
        Err(ChartError::MissingField {
            series: self.core.name.clone(),
            field: wanted,
        })
    }

    /// Normalized axis position of an item's field, or `None` on a data gap.
    pub(crate) fn field_position(
        axis: &AnyAxis,
        item: &DataItem,
        field: &str,
        location: f64,
        working: bool,
        include_stack: bool,
    ) -> Option<f64> {
        match axis.axis_field() {
            AxisField::Category => {
                let category = item.category(field)?;
                let index = axis.as_category()?.index_of(category)?;
                Some(axis.category_to_position(index, location))
            }
            AxisField::Date => {
                let value = item.effective_value(field, working)?;
                let interval = axis.as_date().map_or(0.0, |d| d.base_interval);
                Some(axis.value_to_position((location - 0.5).mul_add(interval, value)))
            }
            AxisField::Value => {
                let mut value = item.effective_value(field, working)?;
                if include_stack {
                    value += item.slot(field).map_or(0.0, |s| s.stack);
                }
                Some(axis.value_to_position(value))
            }
        }
    }

    /// The single authoritative coordinate-resolution function: convert a
    /// (field, location) pair on each axis into a clamped pixel point.
    ///
    /// Coordinates are clamped into twice the plot size so zero-range zoom
    /// cannot push pathological values into visual elements.
    pub fn get_point(
        &self,
        item: &DataItem,
        axes: &[AnyAxis],
        plot: Size,
        x_field: &str,
        y_field: &str,
        location_x: f64,
        location_y: f64,
        working: bool,
    ) -> Option<Point> {
        let x_axis = axes.get(self.x_axis.0)?;
        let y_axis = axes.get(self.y_axis.0)?;
        let stack_x = self.stacked && self.base_axis == BaseAxis::Y;
        let stack_y = self.stacked && self.base_axis == BaseAxis::X;
        let px = Self::field_position(x_axis, item, x_field, location_x, working, stack_x)?;
        let py = Self::field_position(y_axis, item, y_field, location_y, working, stack_y)?;
        let point = Point::new(
            x_axis.position_to_coordinate(px),
            y_axis.position_to_coordinate(py),
        );
        Some(point.clamped(plot.width * 2.0, plot.height * 2.0))
    }

    /// Track axis-scoped extremes, incorporating stack values so a stacked
    /// series' auto-scaling reflects cumulative extents. Records an event
    /// only when a bound changes.
    pub(crate) fn process_axis_values(&mut self, axes: &[AnyAxis], working: bool) {
        for (axis_id, field, open_field) in [
            (self.x_axis, self.x_field.clone(), self.x_open_field.clone()),
            (self.y_axis, self.y_field.clone(), self.y_open_field.clone()),
        ] {
            let Some(axis) = axes.get(axis_id.0) else { continue };
            if axis.axis_field() == AxisField::Category {
                continue;
            }
            self.track_extremes(axis_id, &field, &open_field, working);
        }
    }

    fn track_extremes(&mut self, axis_id: AxisId, field: &str, open_field: &str, working: bool) {
        let (start, end) = self.core.window();
        let mut tmin = f64::INFINITY;
        let mut tmax = f64::NEG_INFINITY;
        let mut smin = f64::INFINITY;
        let mut smax = f64::NEG_INFINITY;

        for (i, item) in self.core.items().iter().enumerate() {
            let Some(slot) = item.slot(field) else { continue };
            let Some(value) = slot.effective(working) else { continue };
            let mut lo = value;
            let mut hi = value;
            if self.stacked {
                // Cumulative extents: the axis must fit the stack top and
                // base, not just this item's own value.
                let top = slot.stack + value;
                lo = lo.min(slot.stack).min(top);
                hi = hi.max(slot.stack).max(top);
            } else if open_field != field {
                if let Some(open) = item.effective_value(open_field, working) {
                    lo = lo.min(open);
                    hi = hi.max(open);
                }
            }
            tmin = tmin.min(lo);
            tmax = tmax.max(hi);
            if i >= start && i < end {
                smin = smin.min(lo);
                smax = smax.max(hi);
            }
        }

        if tmin.is_finite() && tmax.is_finite() {
            let min_changed = self.tmin.insert(axis_id.0, tmin) != Some(tmin);
            let max_changed = self.tmax.insert(axis_id.0, tmax) != Some(tmax);
            if min_changed || max_changed {
                self.pending_events
                    .push(SeriesEvent::ExtremesChanged { axis: axis_id });
            }
        }
        if smin.is_finite() && smax.is_finite() {
            let min_changed = self.smin.insert(axis_id.0, smin) != Some(smin);
            let max_changed = self.smax.insert(axis_id.0, smax) != Some(smax);
            if min_changed || max_changed {
                self.pending_events
                    .push(SeriesEvent::SelectionExtremesChanged { axis: axis_id });
            }
        }
    }

    /// Total extremes on an axis, when this series tracked any.
    #[must_use]
    pub fn total_extremes(&self, axis: AxisId) -> Option<(f64, f64)> {
        Some((*self.tmin.get(&axis.0)?, *self.tmax.get(&axis.0)?))
    }

    /// Selection-scoped extremes on an axis.
    #[must_use]
    pub fn selection_extremes(&self, axis: AxisId) -> Option<(f64, f64)> {
        Some((*self.smin.get(&axis.0)?, *self.smax.get(&axis.0)?))
    }

    /// Find the item index a base-axis position maps to, for tooltip lookup.
    ///
    /// With `snap_tooltip` the nearest item with a usable value wins;
    /// otherwise only the exact cell matches.
    #[must_use]
    pub fn item_at_position(&self, base_axis: &AnyAxis, position: f64) -> Option<usize> {
        let (start, end) = self.core.window();
        let field = self.base_field().to_string();
        if self.snap_tooltip {
            let mut best: Option<(usize, f64)> = None;
            for (i, item) in self.core.items().iter().enumerate().take(end).skip(start) {
                let loc = item.working_location(&field);
                let Some(p) = Self::field_position(base_axis, item, &field, loc, true, false)
                else {
                    continue;
                };
                let distance = (p - position).abs();
                if best.map_or(true, |(_, d)| distance < d) {
                    best = Some((i, distance));
                }
            }
            best.map(|(i, _)| i)
        } else {
            let index = base_axis.position_to_index(position)?;
            self.core.items()[start..end.min(self.core.items().len())]
                .iter()
                .find(|item| {
                    item.index() == index
                        || item
                            .category(&field)
                            .and_then(|c| base_axis.as_category().and_then(|a| a.index_of(c)))
                            == Some(index)
                })
                .map(DataItem::index)
        }
    }
}

/// Walk earlier-registered siblings in reverse and produce this item's stack
/// base.
///
/// A sibling is usable when it is the same concrete kind, has a value at the
/// same index, and — when `stack_to_negative` — its real value has the same
/// sign as `value`. Unusable siblings are passed over; when none qualifies
/// the base is zero, so stacking resets to the baseline on sign flips.
pub(crate) fn stack_base(
    prior: &[&XySeries],
    kind: SeriesKind,
    index: usize,
    field: &str,
    value: f64,
    stack_to_negative: bool,
    working: bool,
) -> f64 {
    for sibling in prior.iter().rev() {
        if sibling.kind != kind {
            continue;
        }
        let Some(item) = sibling.core.items().get(index) else {
            continue;
        };
        let Some(slot) = item.slot(field) else { continue };
        let Some(sibling_value) = slot.effective(working) else {
            continue;
        };
        if stack_to_negative {
            let real = slot.value.unwrap_or(sibling_value);
            if real.signum() != value.signum() && value != 0.0 && real != 0.0 {
                continue;
            }
        }
        return slot.stack + sibling_value;
    }
    0.0
}

fn axis_of<'a>(axes: &'a [AnyAxis], id: AxisId, series: &str) -> Result<&'a AnyAxis, ChartError> {
    axes.get(id.0).ok_or_else(|| ChartError::UnknownAxis {
        series: series.to_string(),
        axis: id.0,
    })
}

/// Logical close-field name for an axis kind on one side.
fn logical_field(kind: AxisField, suffix: &str) -> String {
    match kind {
        AxisField::Value => format!("value{suffix}"),
        AxisField::Date => format!("date{suffix}"),
        AxisField::Category => format!("category{suffix}"),
    }
}

/// Logical open-field name for an axis kind on one side.
fn open_field_name(kind: AxisField, suffix: &str) -> String {
    match kind {
        AxisField::Value => format!("openValue{suffix}"),
        AxisField::Date => format!("openDate{suffix}"),
        AxisField::Category => format!("openCategory{suffix}"),
    }
}

fn resolve_open(
    core: &SeriesCore,
    kind: AxisField,
    suffix: &str,
    close_field: &str,
    stack_owns_baseline: bool,
) -> String {
    if stack_owns_baseline {
        return close_field.to_string();
    }
    let open = open_field_name(kind, suffix);
    if core.data_fields.contains_key(&open) {
        open
    } else {
        close_field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{record, DataValue};
    use graficar_core::{CategoryAxis, ValueAxis};

    fn axes() -> Vec<AnyAxis> {
        vec![
            AnyAxis::Category(CategoryAxis::new(["a", "b", "c"], 300.0)),
            AnyAxis::Value(ValueAxis::new(0.0, 10.0, 100.0).inverted(true)),
        ]
    }

    fn series() -> XySeries {
        let mut s = XySeries::new("s", SeriesKind::Column, AxisId(0), AxisId(1));
        s.core.map_field("categoryX", "cat");
        s.core.map_field("valueY", "v");
        s.core.set_data(vec![
            record([("cat", DataValue::Text("a".into())), ("v", DataValue::Number(2.0))]),
            record([("cat", DataValue::Text("b".into())), ("v", DataValue::Number(5.0))]),
            record([("cat", DataValue::Text("c".into())), ("v", DataValue::Number(10.0))]),
        ]);
        s.core.validate_data();
        s.core.validate_data_items();
        s
    }

    #[test]
    fn test_define_fields_resolution() {
        let mut s = series();
        s.define_fields(&axes()).unwrap();
        assert_eq!(s.x_field, "categoryX");
        assert_eq!(s.y_field, "valueY");
        // No open data supplied: open defaults to close.
        assert_eq!(s.y_open_field, "valueY");
    }

    #[test]
    fn test_define_fields_supplied_open() {
        let mut s = series();
        s.core.map_field("openValueY", "o");
        s.define_fields(&axes()).unwrap();
        assert_eq!(s.y_open_field, "openValueY");
    }

    #[test]
    fn test_define_fields_stacked_ignores_supplied_open() {
        let mut s = series().stacked(true);
        s.core.map_field("openValueY", "o");
        s.define_fields(&axes()).unwrap();
        // Baseline comes from the stack chain, not supplied open data.
        assert_eq!(s.y_open_field, "valueY");
    }

    #[test]
    fn test_define_fields_missing_mapping() {
        let mut s = XySeries::new("bare", SeriesKind::Column, AxisId(0), AxisId(1));
        s.core.map_field("categoryX", "cat");
        let err = s.define_fields(&axes()).unwrap_err();
        assert_eq!(
            err,
            ChartError::MissingField {
                series: "bare".into(),
                field: "valueY".into()
            }
        );
    }

    #[test]
    fn test_define_fields_kind_mismatch() {
        let mut s = XySeries::new("mismatch", SeriesKind::Column, AxisId(0), AxisId(1));
        // Numeric mapping on the category side.
        s.core.map_field("valueX", "v");
        s.core.map_field("valueY", "v");
        let err = s.define_fields(&axes()).unwrap_err();
        assert!(matches!(err, ChartError::AxisFieldMismatch { expected: AxisField::Category, .. }));
    }

    #[test]
    fn test_get_point_resolves_both_axes() {
        let mut s = series();
        s.define_fields(&axes()).unwrap();
        let axes = axes();
        let plot = Size::new(300.0, 100.0);
        let p = s
            .get_point(&s.core.items()[1].clone(), &axes, plot, "categoryX", "valueY", 0.5, 0.5, false)
            .unwrap();
        // Category "b" center = 0.5 of 300; value 5 of [0,10] inverted = 50.
        assert_eq!(p, Point::new(150.0, 50.0));
    }

    #[test]
    fn test_get_point_clamps_pathological_coordinates() {
        let mut s = series();
        s.define_fields(&axes()).unwrap();
        let mut axes = axes();
        // Zero-range zoom on the value axis explodes coordinates.
        if let Some(v) = axes[1].as_value_mut() {
            *v = v.clone().zoom(0.5, 0.5);
        }
        let plot = Size::new(300.0, 100.0);
        let p = s
            .get_point(&s.core.items()[2].clone(), &axes, plot, "categoryX", "valueY", 0.5, 0.5, false)
            .unwrap();
        assert!(p.y.abs() <= 200.0);
    }

    #[test]
    fn test_get_point_gap_is_none() {
        let mut s = XySeries::new("s", SeriesKind::Column, AxisId(0), AxisId(1));
        s.core.map_field("categoryX", "cat");
        s.core.map_field("valueY", "v");
        s.core.set_data(vec![record([("cat", "a")])]);
        s.core.validate_data();
        s.define_fields(&axes()).unwrap();
        let axes = axes();
        let item = s.core.items()[0].clone();
        assert!(s
            .get_point(&item, &axes, Size::new(300.0, 100.0), "categoryX", "valueY", 0.5, 0.5, false)
            .is_none());
    }

    #[test]
    fn test_extremes_events_dedup() {
        let mut s = series();
        s.define_fields(&axes()).unwrap();
        let axes = axes();
        s.process_axis_values(&axes, false);
        assert!(!s.drain_events().is_empty());
        // Unchanged pass: no redundant events.
        s.process_axis_values(&axes, false);
        assert!(s.drain_events().is_empty());
        assert_eq!(s.total_extremes(AxisId(1)), Some((2.0, 10.0)));
    }

    #[test]
    fn test_selection_extremes_follow_window() {
        let mut s = series();
        s.define_fields(&axes()).unwrap();
        let axes = axes();
        s.core.set_window(0, 2);
        s.core.validate_data_items();
        s.process_axis_values(&axes, false);
        assert_eq!(s.selection_extremes(AxisId(1)), Some((2.0, 5.0)));
        assert_eq!(s.total_extremes(AxisId(1)), Some((2.0, 10.0)));
    }

    #[test]
    fn test_item_at_position_snap() {
        let mut s = series();
        s.define_fields(&axes()).unwrap();
        let axes = axes();
        // Position near category "c" center.
        assert_eq!(s.item_at_position(&axes[0], 0.8), Some(2));
        // Exact-cell lookup without snapping.
        let s = s.snap_tooltip(false);
        assert_eq!(s.item_at_position(&axes[0], 0.5), Some(1));
    }

    #[test]
    fn test_stack_base_sign_aware() {
        // Two stacked series with values [5, -3] at the same index: the
        // negative series' base is 0, not 5.
        let mut a = series();
        a.core.items_mut()[0].set_value("valueY", 5.0);
        let prior = [&a];
        let base = stack_base(&prior, SeriesKind::Column, 0, "valueY", -3.0, true, false);
        assert_eq!(base, 0.0);
        // Sign ignored: stacks strictly in series order.
        let base = stack_base(&prior, SeriesKind::Column, 0, "valueY", -3.0, false, false);
        assert_eq!(base, 5.0);
    }

    #[test]
    fn test_stack_base_skips_other_kinds() {
        let a = series();
        let prior = [&a];
        let base = stack_base(&prior, SeriesKind::Line, 0, "valueY", 4.0, true, false);
        assert_eq!(base, 0.0);
    }
}
