//! Line series: converts data items into polyline segments.
//!
//! A segment is a maximal run of consecutive items that all have usable
//! values (or are bridged across gaps when `connect` is on) and share
//! identical per-item rendering property overrides. Segment building is an
//! explicit iterative loop — segment boundaries are determined by content,
//! not by a fixed partition, and deep data must not recurse.

use crate::data_item::DataItem;
use crate::value::DataValue;
use crate::xy::{BaseAxis, SeriesKind, XySeries};
use graficar_core::{AnyAxis, Axis, AxisId, Point, Size};
use std::collections::BTreeMap;

/// One polyline run with its fill close path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineSegment {
    /// Stroke points in index order
    pub points: Vec<Point>,
    /// Fill close path, walked backward along the baseline
    pub close_points: Vec<Point>,
    /// Per-item property overrides this run shares
    pub properties: BTreeMap<String, String>,
    /// Pooled segment not used by the current pass
    pub disabled: bool,
}

impl LineSegment {
    fn reset(&mut self, properties: BTreeMap<String, String>) {
        self.points.clear();
        self.close_points.clear();
        self.properties = properties;
        self.disabled = false;
    }
}

/// Polyline/curve series.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    /// Cartesian layer
    pub xy: XySeries,
    /// Bridge missing-value gaps instead of splitting
    pub(crate) connect: bool,
    /// Horizontal curve tension consumed by the host renderer
    pub tension_x: f64,
    /// Vertical curve tension consumed by the host renderer
    pub tension_y: f64,
    /// Record keys whose per-item values split segments when they change
    pub(crate) property_fields: Vec<String>,
    /// Pooled segments, reused across validations
    segments: Vec<LineSegment>,
}

impl LineSeries {
    /// Create a line series bound to an axis pair.
    #[must_use]
    pub fn new(name: impl Into<String>, x_axis: AxisId, y_axis: AxisId) -> Self {
        Self {
            xy: XySeries::new(name, SeriesKind::Line, x_axis, y_axis),
            connect: false,
            tension_x: 1.0,
            tension_y: 1.0,
            property_fields: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Bridge gaps instead of splitting segments.
    #[must_use]
    pub const fn connect(mut self, connect: bool) -> Self {
        self.connect = connect;
        self
    }

    /// Set curve tensions (1.0 draws straight lines).
    #[must_use]
    pub fn tension(mut self, x: f64, y: f64) -> Self {
        self.tension_x = x.clamp(0.0, 1.0);
        self.tension_y = y.clamp(0.0, 1.0);
        self
    }

    /// Split segments whenever this record key's value changes between items.
    #[must_use]
    pub fn property_field(mut self, field: impl Into<String>) -> Self {
        self.property_fields.push(field.into());
        self
    }

    /// Segments produced by the last validation, pooled extras included.
    #[must_use]
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Segments in use by the current pass.
    pub fn active_segments(&self) -> impl Iterator<Item = &LineSegment> {
        self.segments.iter().filter(|s| !s.disabled)
    }

    /// The visible index range widened by one valid item beyond each edge,
    /// so panning reveals a line already in motion at the boundary instead
    /// of one appearing from nothing.
    pub(crate) fn slice_data(&self) -> (usize, usize) {
        let (start, end) = self.xy.core.window();
        let items = self.xy.core.items();
        let field = self.xy.value_field();

        let mut wstart = start;
        for i in (0..start).rev() {
            if items[i].has_value(field, true) {
                wstart = i;
                break;
            }
        }
        let mut wend = end;
        for (offset, item) in items[end.min(items.len())..].iter().enumerate() {
            if item.has_value(field, true) {
                wend = end + offset + 1;
                break;
            }
        }
        (wstart, wend.min(items.len()))
    }

    /// Rebuild all segments for the current window.
    pub fn validate_segments(&mut self, axes: &[AnyAxis], plot: Size, working: bool) {
        let (wstart, wend) = self.slice_data();
        let mut used = 0;

        let mut i = wstart;
        while i < wend {
            if self.point_of(i, axes, plot, false, working).is_none() {
                i += 1;
                continue;
            }

            // Open a segment at the first usable item.
            let properties = self.properties_of(i);
            let mut points = Vec::new();
            let seg_start = i;
            let mut seg_last = i;
            let mut reopen_at = None;

            while i < wend {
                let Some(point) = self.point_of(i, axes, plot, false, working) else {
                    if self.connect {
                        // Bridge: the gap item contributes nothing, the run
                        // continues.
                        i += 1;
                        continue;
                    }
                    // Split: close at the valid neighbor, resume after the
                    // missing item. The neighbors stay segment boundary
                    // points; only the connecting line is suppressed.
                    i += 1;
                    break;
                };
                if self.properties_of(i) != properties && !points.is_empty() {
                    // Property change closes the segment at this item and a
                    // new one reopens at the same item, sharing the boundary
                    // point so the polyline stays continuous.
                    points.push(point);
                    seg_last = i;
                    reopen_at = Some(i);
                    break;
                }
                points.push(point);
                seg_last = i;
                i += 1;
            }

            let close_points = self.close_path(seg_start, seg_last, &points, axes, plot, working);
            let segment = self.acquire_segment(used);
            segment.reset(properties);
            segment.points = points;
            segment.close_points = close_points;
            used += 1;

            if let Some(at) = reopen_at {
                i = at;
            }
        }

        // Pooled extras stay allocated but disabled.
        for segment in self.segments.iter_mut().skip(used) {
            segment.disabled = true;
        }
    }

    fn acquire_segment(&mut self, index: usize) -> &mut LineSegment {
        if index >= self.segments.len() {
            self.segments.push(LineSegment::default());
        }
        &mut self.segments[index]
    }

    /// Build the fill close path for a segment.
    ///
    /// With open-value fields or stacking, the close path walks the same
    /// index range backward along open-field coordinates so fills hug the
    /// stacked baseline; otherwise it drops straight to the axis base line.
    fn close_path(
        &self,
        seg_start: usize,
        seg_last: usize,
        points: &[Point],
        axes: &[AnyAxis],
        plot: Size,
        working: bool,
    ) -> Vec<Point> {
        if points.is_empty() {
            return Vec::new();
        }
        let has_open = self.xy.value_open_field() != self.xy.value_field();
        if has_open || self.xy.stacked {
            let mut close = Vec::new();
            for i in (seg_start..=seg_last).rev() {
                if let Some(point) = self.point_of(i, axes, plot, true, working) {
                    close.push(point);
                }
            }
            return close;
        }

        let (value_axis_id, base_is_x) = match self.xy.base_axis {
            BaseAxis::X => (self.xy.y_axis, true),
            BaseAxis::Y => (self.xy.x_axis, false),
        };
        let Some(axis) = axes.get(value_axis_id.0) else {
            return Vec::new();
        };
        let base_coord = axis.position_to_coordinate(axis.value_to_position(axis.base_value()));
        let first = points[0];
        let last = points[points.len() - 1];
        if base_is_x {
            vec![
                Point::new(last.x, base_coord),
                Point::new(first.x, base_coord),
            ]
        } else {
            vec![
                Point::new(base_coord, last.y),
                Point::new(base_coord, first.y),
            ]
        }
    }

    /// Pixel point of an item, on the close path (`open=false`) or the
    /// open/baseline path (`open=true`).
    fn point_of(
        &self,
        index: usize,
        axes: &[AnyAxis],
        plot: Size,
        open: bool,
        working: bool,
    ) -> Option<Point> {
        let item = self.xy.core.items().get(index)?;
        let (x_field, y_field) = self.path_fields(open);
        let location_x = item.working_location(&self.xy.x_field);
        let location_y = item.working_location(&self.xy.y_field);
        if open && self.xy.stacked {
            // Stack base, not open data: resolve via the stack slot.
            return self.stack_base_point(item, axes, plot, location_x, location_y, working);
        }
        self.xy.get_point(
            item, axes, plot, &x_field, &y_field, location_x, location_y, working,
        )
    }

    fn path_fields(&self, open: bool) -> (String, String) {
        if open {
            match self.xy.base_axis {
                BaseAxis::X => (self.xy.x_field.clone(), self.xy.y_open_field.clone()),
                BaseAxis::Y => (self.xy.x_open_field.clone(), self.xy.y_field.clone()),
            }
        } else {
            (self.xy.x_field.clone(), self.xy.y_field.clone())
        }
    }

    fn stack_base_point(
        &self,
        item: &DataItem,
        axes: &[AnyAxis],
        plot: Size,
        location_x: f64,
        location_y: f64,
        working: bool,
    ) -> Option<Point> {
        let x_axis = axes.get(self.xy.x_axis.0)?;
        let y_axis = axes.get(self.xy.y_axis.0)?;
        let (px, py) = match self.xy.base_axis {
            BaseAxis::X => {
                let base = XySeries::field_position(
                    x_axis, item, &self.xy.x_field, location_x, working, false,
                )?;
                let stack = item.slot(&self.xy.y_field)?.stack;
                (base, y_axis.value_to_position(stack))
            }
            BaseAxis::Y => {
                let base = XySeries::field_position(
                    y_axis, item, &self.xy.y_field, location_y, working, false,
                )?;
                let stack = item.slot(&self.xy.x_field)?.stack;
                (x_axis.value_to_position(stack), base)
            }
        };
        let point = Point::new(
            x_axis.position_to_coordinate(px),
            y_axis.position_to_coordinate(py),
        );
        Some(point.clamped(plot.width * 2.0, plot.height * 2.0))
    }

    /// Property-override snapshot of an item, from the configured fields.
    fn properties_of(&self, index: usize) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        let Some(item) = self.xy.core.items().get(index) else {
            return properties;
        };
        for field in &self.property_fields {
            if let Some(value) = item.data_context().get(field) {
                let text = match value {
                    DataValue::Text(s) => s.clone(),
                    DataValue::Number(n) => n.to_string(),
                    DataValue::Date(ms) => ms.to_string(),
                    DataValue::Bool(b) => b.to_string(),
                    DataValue::Null => continue,
                };
                properties.insert(field.clone(), text);
            }
        }
        properties
    }

    /// Position bullets at data points, thinning any closer than
    /// `min_bullet_distance` to the previously kept bullet.
    pub fn validate_bullets(&mut self, axes: &[AnyAxis], plot: Size, working: bool) {
        let min_distance = self.xy.min_bullet_distance;
        let points: Vec<Option<Point>> = (0..self.xy.core.items().len())
            .map(|i| self.point_of(i, axes, plot, false, working))
            .collect();
        let mut kept: Option<Point> = None;
        let thinned: Vec<Option<Point>> = points
            .into_iter()
            .map(|p| {
                let p = p?;
                if let Some(prev) = kept {
                    if min_distance > 0.0 && prev.distance(&p) < min_distance {
                        return None;
                    }
                }
                kept = Some(p);
                Some(p)
            })
            .collect();
        self.xy
            .core
            .sync_bullets(|item| thinned.get(item.index()).copied().flatten());
    }
}
