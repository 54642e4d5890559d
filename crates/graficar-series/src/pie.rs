//! Pie series: distributes total value across arc slices, with per-item
//! radius scaling and label column alignment.

use crate::percent::PercentSeriesCore;
use graficar_core::{LabelElement, Point};

/// Logical field scaling a slice's radius independently of its arc.
const RADIUS_VALUE_FIELD: &str = "radiusValue";

/// Arc-slice series.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSeries {
    /// Percent-family core
    pub percent: PercentSeriesCore,
    /// First slice's start angle in degrees
    pub start_angle: f64,
    /// Last slice's end angle in degrees
    pub end_angle: f64,
    /// Outer radius in pixels
    pub radius: f64,
    /// Donut hole radius in pixels
    pub inner_radius: f64,
    /// Arrange labels into left/right columns with overlap avoidance
    pub align_labels: bool,
    /// Label height hint used by the overlap sweep
    pub label_height: f64,
    /// Gap between the slice edge and its label column
    pub label_offset: f64,
}

impl PieSeries {
    /// Create a pie series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            percent: PercentSeriesCore::new(name),
            start_angle: -90.0,
            end_angle: 270.0,
            radius: 100.0,
            inner_radius: 0.0,
            align_labels: false,
            label_height: 12.0,
            label_offset: 10.0,
        }
    }

    /// Set the angular budget.
    #[must_use]
    pub const fn angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Set outer and inner radii.
    #[must_use]
    pub fn radii(mut self, radius: f64, inner_radius: f64) -> Self {
        self.radius = radius.max(0.0);
        self.inner_radius = inner_radius.clamp(0.0, self.radius);
        self
    }

    /// Enable label column alignment.
    #[must_use]
    pub const fn align_labels(mut self, align: bool) -> Self {
        self.align_labels = align;
        self
    }

    /// Map the per-item radius-scale field to a record key.
    pub fn map_radius_value_field(&mut self, record_key: impl Into<String>) {
        self.percent.core.map_field(RADIUS_VALUE_FIELD, record_key);
    }

    /// Run a full validation pass, laying out slices, ticks, and labels
    /// around the origin.
    pub fn validate(&mut self) {
        self.percent.validate_values();
        self.layout_slices();
        self.layout_labels();
    }

    /// Distribute the angular budget: each slice's arc is its working
    /// percent share of `end_angle − start_angle`, accumulated onto a
    /// running start angle.
    fn layout_slices(&mut self) {
        let span = self.end_angle - self.start_angle;
        let included = self.percent.included_indices();

        // Radius scaling normalizes against the largest radius value.
        let max_radius_value = included
            .iter()
            .filter_map(|&i| self.percent.core.items()[i].working_value(RADIUS_VALUE_FIELD))
            .fold(f64::NEG_INFINITY, f64::max);

        let mut current_start_angle = self.start_angle;
        let (start, end) = self.percent.core.window();
        let end = end.min(self.percent.core.items().len());
        let (radius, inner_radius) = (self.radius, self.inner_radius);

        for i in start..end {
            let included_item = included.contains(&i);
            let percent = self.percent.core.items()[i]
                .slot(PercentSeriesCore::VALUE_FIELD)
                .map_or(0.0, |s| s.calculated.percent);
            let radius_scale = match (
                self.percent.core.items()[i].working_value(RADIUS_VALUE_FIELD),
                max_radius_value,
            ) {
                (Some(v), max) if max > 0.0 => v / max,
                _ => 1.0,
            };

            let item = &mut self.percent.core.items_mut()[i];
            let slice = item.visuals.slice.get_or_insert_with(Default::default);
            if included_item {
                slice.start_angle = current_start_angle;
                slice.arc = percent / 100.0 * span;
                slice.radius = radius * radius_scale;
                slice.inner_radius = inner_radius;
                slice.disabled = false;
                current_start_angle += slice.arc;
            } else {
                slice.arc = 0.0;
                slice.start_angle = current_start_angle;
                slice.disabled = true;
            }
        }
    }

    /// Position ticks and labels.
    ///
    /// Aligned labels bucket into left/right halves by normalized mid-angle
    /// — the right half runs 270° through 0° to 91°, asymmetric on purpose
    /// to reduce flicker for slices hovering near the top — then a single
    /// forward sweep per half pushes later labels below earlier ones. The
    /// sweep runs in slice order, not sorted by vertical position.
    fn layout_labels(&mut self) {
        let included = self.percent.included_indices();
        let label_radius = self.radius + self.label_offset;
        let mut next_y_right: Option<f64> = None;
        let mut next_y_left: Option<f64> = None;
        let align = self.align_labels;
        let label_height = self.label_height;

        for &i in &included {
            let item = &mut self.percent.core.items_mut()[i];
            let Some(slice) = item.visuals.slice else { continue };
            let mid = slice.mid_angle();
            let mid_rad = mid.to_radians();
            let edge = Point::new(
                mid_rad.cos() * slice.radius,
                mid_rad.sin() * slice.radius,
            );

            let (label_x, label_y) = if align {
                let normalized = mid.rem_euclid(360.0);
                let is_right = normalized >= 270.0 || normalized <= 91.0;
                let column_x = if is_right { label_radius } else { -label_radius };
                let natural_y = mid_rad.sin() * label_radius;
                let next_y = if is_right {
                    &mut next_y_right
                } else {
                    &mut next_y_left
                };
                let y = match *next_y {
                    Some(floor) if natural_y < floor => floor,
                    _ => natural_y,
                };
                *next_y = Some(y + label_height);
                (column_x, y)
            } else {
                (mid_rad.cos() * label_radius, mid_rad.sin() * label_radius)
            };

            let category = item
                .category(PercentSeriesCore::CATEGORY_FIELD)
                .unwrap_or_default()
                .to_string();
            let label = item
                .visuals
                .label
                .get_or_insert_with(LabelElement::default);
            label.x = label_x;
            label.y = label_y;
            label.height = label_height;
            label.text = category;
            label.disabled = false;

            let tick = item.visuals.tick.get_or_insert_with(Default::default);
            tick.set_endpoints(edge, Point::new(label_x, label_y));
            tick.disabled = false;
        }

        // Excluded items keep their elements but hidden.
        let (start, end) = self.percent.core.window();
        let end = end.min(self.percent.core.items().len());
        for i in start..end {
            if !included.contains(&i) {
                let item = &mut self.percent.core.items_mut()[i];
                if let Some(label) = item.visuals.label.as_mut() {
                    label.disabled = true;
                }
                if let Some(tick) = item.visuals.tick.as_mut() {
                    tick.disabled = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{record, DataValue};

    fn pie(values: &[f64]) -> PieSeries {
        let mut series = PieSeries::new("pie");
        series.percent.map_value_field("v");
        series.percent.map_category_field("cat");
        series.percent.core.set_data(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    record([
                        ("v", DataValue::Number(v)),
                        ("cat", DataValue::Text(format!("c{i}"))),
                    ])
                })
                .collect(),
        );
        series
    }

    #[test]
    fn test_slice_coverage() {
        // startAngle=-90, endAngle=270, values [25,25,50]: arcs sum to 360
        // and the third slice spans 180.
        let mut series = pie(&[25.0, 25.0, 50.0]).angles(-90.0, 270.0);
        series.validate();
        let arc = |i: usize| series.percent.core.items()[i].visuals.slice.unwrap().arc;
        assert_eq!(arc(0) + arc(1) + arc(2), 360.0);
        assert_eq!(arc(2), 180.0);
        // Slices chain: each starts where the previous ended.
        let slice = |i: usize| series.percent.core.items()[i].visuals.slice.unwrap();
        assert_eq!(slice(0).start_angle, -90.0);
        assert_eq!(slice(1).start_angle, slice(0).start_angle + slice(0).arc);
        assert_eq!(slice(2).start_angle, slice(1).start_angle + slice(1).arc);
    }

    #[test]
    fn test_radius_value_scaling() {
        let mut series = pie(&[50.0, 50.0]);
        series.map_radius_value_field("r");
        let mut data = vec![
            record([("v", DataValue::Number(50.0)), ("r", DataValue::Number(5.0))]),
            record([("v", DataValue::Number(50.0)), ("r", DataValue::Number(10.0))]),
        ];
        for (i, rec) in data.iter_mut().enumerate() {
            rec.insert("cat".into(), DataValue::Text(format!("c{i}")));
        }
        series.percent.core.set_data(data);
        series.validate();
        let slice = |i: usize| series.percent.core.items()[i].visuals.slice.unwrap();
        assert_eq!(slice(0).radius, 50.0);
        assert_eq!(slice(1).radius, 100.0);
    }

    #[test]
    fn test_hidden_slice_shrinks_and_others_grow() {
        let mut series = pie(&[25.0, 25.0, 50.0]);
        series.percent.hide_item(2);
        series.percent.core.validate_data_items();
        series.percent.core.process_values(true);
        series.layout_slices();
        let arc = |i: usize| series.percent.core.items()[i].visuals.slice.unwrap().arc;
        // The hidden slice settled at zero; the rest split the budget.
        assert_eq!(arc(0), 180.0);
        assert_eq!(arc(1), 180.0);
        assert!(series.percent.core.items()[2].visuals.slice.unwrap().disabled);
    }

    #[test]
    fn test_aligned_labels_bucket_and_push() {
        let mut series = pie(&[25.0, 25.0, 25.0, 25.0]).align_labels(true);
        series.validate();
        let label = |i: usize| series.percent.core.items()[i].visuals.label.clone().unwrap();
        // Mid angles: -45 (right), 45 (right), 135 (left), 225 (left).
        assert!(label(0).x > 0.0);
        assert!(label(1).x > 0.0);
        assert!(label(2).x < 0.0);
        assert!(label(3).x < 0.0);
        // Forward sweep: the second label in each column sits below the
        // first by at least the label height.
        assert!(label(1).y >= label(0).y + series.label_height);
        // Left column runs 135 then 225: 225's natural y is above 135's
        // floor, so it is pushed down.
        assert!(label(3).y >= label(2).y + series.label_height);
    }

    #[test]
    fn test_ticks_connect_slice_to_label() {
        let mut series = pie(&[50.0, 50.0]).align_labels(true);
        series.validate();
        let item = &series.percent.core.items()[0];
        let tick = item.visuals.tick.unwrap();
        let label = item.visuals.label.clone().unwrap();
        assert_eq!(tick.x2, label.x);
        assert_eq!(tick.y2, label.y);
        assert!(!tick.disabled);
    }
}
