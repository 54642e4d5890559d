//! Column series: rectangular bars per data item, with clustering among
//! sibling column series, open/close delta coloring, and category-axis
//! sorting with animated cell moves.

use crate::data_item::DataItem;
use crate::xy::{BaseAxis, SeriesKind, XySeries};
use graficar_core::{AnyAxis, Axis, AxisField, AxisId, Color, Point, Size, Tween};
use std::collections::BTreeMap;

/// Style copied onto a column when a comparison state activates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnStateStyle {
    /// Fill override
    pub fill: Option<Color>,
    /// Stroke override
    pub stroke: Option<Color>,
}

/// The four comparison-driven column states. Open-based and previous-based
/// comparisons are independent; both matching states are applied, in that
/// order, onto the element's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnStates {
    /// `value >= open value`
    pub rise_from_open: Option<ColumnStateStyle>,
    /// `value < open value`
    pub drop_from_open: Option<ColumnStateStyle>,
    /// `value >= previous value`
    pub rise_from_previous: Option<ColumnStateStyle>,
    /// `value < previous value`
    pub drop_from_previous: Option<ColumnStateStyle>,
}

/// Rectangular-bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSeries {
    /// Cartesian layer
    pub xy: XySeries,
    pub(crate) clustered: bool,
    /// Cluster slot within the axis cell, recomputed by the chart each pass
    pub(crate) start_location: f64,
    pub(crate) end_location: f64,
    /// Sub-range of the cell available to all clustered series
    pub(crate) cell_start_location: f64,
    pub(crate) cell_end_location: f64,
    /// Column thickness within its slot, `0..=1`
    pub(crate) width_percent: f64,
    /// Retire out-of-window columns instead of destroying them
    pub(crate) disable_unused: bool,
    /// Dedup threshold for sort delta-position animations
    pub(crate) sort_epsilon: f64,
    /// Comparison-driven state styles
    pub states: ColumnStates,
    /// Running delta-position tweens keyed by item uid
    pub(crate) sort_tweens: BTreeMap<usize, Tween>,
}

impl ColumnSeries {
    /// Create a column series bound to an axis pair.
    #[must_use]
    pub fn new(name: impl Into<String>, x_axis: AxisId, y_axis: AxisId) -> Self {
        Self {
            xy: XySeries::new(name, SeriesKind::Column, x_axis, y_axis),
            clustered: true,
            start_location: 0.0,
            end_location: 1.0,
            cell_start_location: 0.0,
            cell_end_location: 1.0,
            width_percent: 1.0,
            disable_unused: true,
            sort_epsilon: 1e-3,
            states: ColumnStates::default(),
            sort_tweens: BTreeMap::new(),
        }
    }

    /// Same-kind constructor used by the candlestick/heat-map layers.
    pub(crate) fn with_kind(
        name: impl Into<String>,
        kind: SeriesKind,
        x_axis: AxisId,
        y_axis: AxisId,
    ) -> Self {
        let mut series = Self::new(name, x_axis, y_axis);
        series.xy.kind = kind;
        series
    }

    /// Cluster side-by-side with sibling column series (default). When
    /// false, the series occupies the full cell.
    #[must_use]
    pub const fn clustered(mut self, clustered: bool) -> Self {
        self.clustered = clustered;
        self
    }

    /// Whether this series clusters.
    #[must_use]
    pub const fn is_clustered(&self) -> bool {
        self.clustered
    }

    /// Column thickness as a fraction of its cluster slot.
    #[must_use]
    pub fn width_percent(mut self, percent: f64) -> Self {
        self.width_percent = percent.clamp(0.0, 1.0);
        self
    }

    /// Restrict all clustered series to a sub-range of the axis cell.
    #[must_use]
    pub fn cell_locations(mut self, start: f64, end: f64) -> Self {
        self.cell_start_location = start.clamp(0.0, 1.0);
        self.cell_end_location = end.clamp(self.cell_start_location, 1.0);
        self
    }

    /// Dedup threshold for sort animations.
    #[must_use]
    pub fn sort_epsilon(mut self, epsilon: f64) -> Self {
        self.sort_epsilon = epsilon.abs();
        self
    }

    /// The cluster slot this series occupies within its cell.
    #[must_use]
    pub const fn slot_locations(&self) -> (f64, f64) {
        (self.start_location, self.end_location)
    }

    pub(crate) fn set_slot_locations(&mut self, start: f64, end: f64) {
        self.start_location = start;
        self.end_location = end;
    }

    /// Lay out every column for the current window.
    ///
    /// Columns are reused across validations (keyed by data item). Items
    /// outside the window or entirely outside the plot are retired — zeroed
    /// and disabled — rather than destroyed, so pan/zoom does not churn
    /// allocations.
    pub fn validate_columns(&mut self, axes: &[AnyAxis], plot: Size, working: bool) {
        let (start, end) = self.xy.core.window();
        let len = self.xy.core.items().len();
        for i in 0..len {
            let in_window = i >= start && i < end;
            let geometry = if in_window {
                self.column_geometry(i, axes, plot, working)
            } else {
                None
            };
            let ranges = if geometry.is_some() {
                self.range_bands(axes)
            } else {
                Vec::new()
            };
            let states = geometry
                .as_ref()
                .map(|_| self.column_state_styles(&self.xy.core.items()[i]));

            let item = &mut self.xy.core.items_mut()[i];
            match geometry {
                Some((a, b)) => {
                    let column = item.visuals.column.get_or_insert_with(Default::default);
                    column.set_corners(a, b);
                    column.disabled = false;
                    if let Some(styles) = states {
                        for style in styles {
                            if style.fill.is_some() {
                                column.fill = style.fill;
                            }
                            if style.stroke.is_some() {
                                column.stroke = style.stroke;
                            }
                        }
                    }
                    // Parallel range-specific columns, clipped to each band.
                    for (range_index, band) in ranges {
                        let range_column =
                            item.visuals.range_columns.entry(range_index).or_default();
                        let lo = a.y.min(b.y).max(band.0);
                        let hi = a.y.max(b.y).min(band.1);
                        if hi > lo {
                            range_column.set_corners(
                                Point::new(a.x, lo),
                                Point::new(b.x, hi),
                            );
                            range_column.disabled = false;
                        } else {
                            range_column.retire();
                        }
                    }
                }
                None => {
                    if self.disable_unused {
                        if let Some(column) = item.visuals.column.as_mut() {
                            column.retire();
                        }
                        for range_column in item.visuals.range_columns.values_mut() {
                            range_column.retire();
                        }
                    }
                }
            }
        }
    }

    /// Compute one column's rectangle corners, or `None` when the item has
    /// no usable value or the column is out of bounds.
    #[allow(clippy::too_many_lines)]
    fn column_geometry(
        &self,
        index: usize,
        axes: &[AnyAxis],
        plot: Size,
        working: bool,
    ) -> Option<(Point, Point)> {
        let item = &self.xy.core.items()[index];
        let x_axis = axes.get(self.xy.x_axis.0)?;
        let y_axis = axes.get(self.xy.y_axis.0)?;

        let x_is_cell = x_axis.axis_field() != AxisField::Value;
        let y_is_cell = y_axis.axis_field() != AxisField::Value;

        // Pad the slot by the column's width percent, centered.
        let pad = (self.end_location - self.start_location) * (1.0 - self.width_percent) / 2.0;
        let slot_start = self.start_location + pad;
        let slot_end = self.end_location - pad;

        let (x_open_pos, x_close_pos) = if x_is_cell && self.xy.base_axis == BaseAxis::X {
            // Category/date base: the column spans its cluster slot.
            (
                XySeries::field_position(x_axis, item, &self.xy.x_field, slot_start, working, false)?,
                XySeries::field_position(x_axis, item, &self.xy.x_field, slot_end, working, false)?,
            )
        } else if x_is_cell && y_is_cell {
            // Category×Category: span the slot on this side too.
            (
                XySeries::field_position(x_axis, item, &self.xy.x_field, slot_start, working, false)?,
                XySeries::field_position(x_axis, item, &self.xy.x_field, slot_end, working, false)?,
            )
        } else {
            self.value_span(
                x_axis,
                item,
                &self.xy.x_field,
                &self.xy.x_open_field,
                self.xy.base_axis == BaseAxis::X,
                working,
            )?
        };

        let (y_open_pos, y_close_pos) = if y_is_cell && self.xy.base_axis == BaseAxis::Y {
            (
                XySeries::field_position(y_axis, item, &self.xy.y_field, slot_start, working, false)?,
                XySeries::field_position(y_axis, item, &self.xy.y_field, slot_end, working, false)?,
            )
        } else if x_is_cell && y_is_cell {
            (
                XySeries::field_position(y_axis, item, &self.xy.y_field, slot_start, working, false)?,
                XySeries::field_position(y_axis, item, &self.xy.y_field, slot_end, working, false)?,
            )
        } else {
            self.value_span(
                y_axis,
                item,
                &self.xy.y_field,
                &self.xy.y_open_field,
                self.xy.base_axis == BaseAxis::Y,
                working,
            )?
        };

        let a = Point::new(
            x_axis.position_to_coordinate(x_open_pos),
            y_axis.position_to_coordinate(y_open_pos),
        )
        .clamped(plot.width * 2.0, plot.height * 2.0);
        let b = Point::new(
            x_axis.position_to_coordinate(x_close_pos),
            y_axis.position_to_coordinate(y_close_pos),
        )
        .clamped(plot.width * 2.0, plot.height * 2.0);

        // Out-of-bounds guard: a column entirely off one side of the plot,
        // or with zero visible thickness, would only create invisible nodes.
        let left = a.x.min(b.x);
        let right = a.x.max(b.x);
        let top = a.y.min(b.y);
        let bottom = a.y.max(b.y);
        if right < 0.0 || left > plot.width || bottom < 0.0 || top > plot.height {
            return None;
        }
        let base_thickness = match self.xy.base_axis {
            BaseAxis::X => right - left,
            BaseAxis::Y => bottom - top,
        };
        if base_thickness <= 0.0 {
            return None;
        }

        Some((a, b))
    }

    /// Open/close positions along a value axis.
    ///
    /// A stacked series' baseline is its stack base; an unstacked one uses
    /// supplied open data when present and the axis zero line otherwise.
    fn value_span(
        &self,
        axis: &AnyAxis,
        item: &DataItem,
        field: &str,
        open_field: &str,
        is_base_side: bool,
        working: bool,
    ) -> Option<(f64, f64)> {
        let slot = item.slot(field)?;
        let value = slot.effective(working)?;
        let open_position = if self.xy.stacked && !is_base_side {
            axis.value_to_position(slot.stack)
        } else if open_field != field {
            let open = item.effective_value(open_field, working)?;
            axis.value_to_position(open)
        } else {
            axis.value_to_position(axis.base_value())
        };
        let close_value = if self.xy.stacked && !is_base_side {
            slot.stack + value
        } else {
            value
        };
        Some((open_position, axis.value_to_position(close_value)))
    }

    /// Pixel bands of this series' axis ranges along the y axis.
    fn range_bands(&self, axes: &[AnyAxis]) -> Vec<(usize, (f64, f64))> {
        self.xy
            .axis_ranges
            .iter()
            .enumerate()
            .filter_map(|(i, range)| {
                let axis = axes.get(range.axis.0)?;
                let a = axis.position_to_coordinate(axis.value_to_position(range.start));
                let b = axis.position_to_coordinate(axis.value_to_position(range.end));
                Some((i, (a.min(b), a.max(b))))
            })
            .collect()
    }

    /// States to copy onto a column, from two independent comparisons:
    /// value vs. its own open value and value vs. the previous item's value.
    fn column_state_styles(&self, item: &DataItem) -> Vec<ColumnStateStyle> {
        let field = self.xy.value_field();
        let open_field = self.xy.value_open_field();
        let mut styles = Vec::new();
        if let (Some(value), Some(open)) = (
            item.effective_value(field, true),
            item.effective_value(open_field, true),
        ) {
            let open_style = if value < open {
                self.states.drop_from_open
            } else {
                self.states.rise_from_open
            };
            if let Some(style) = open_style {
                styles.push(style);
            }
        }
        if let Some(slot) = item.slot(field) {
            let previous_style = if slot.calculated.previous_change < 0.0 {
                self.states.drop_from_previous
            } else {
                self.states.rise_from_previous
            };
            if let Some(style) = previous_style {
                styles.push(style);
            }
        }
        styles
    }

    /// Re-sort items by descending working value and animate each category
    /// cell to its new position with a per-item delta-position tween.
    ///
    /// A prior tween is stopped before a replacement starts; re-sorts whose
    /// target delta is within `sort_epsilon` of the running tween are
    /// deduplicated so animations don't restart-thrash.
    pub fn sort_category_axis(&mut self) {
        let field = self.xy.value_field().to_string();
        let items = self.xy.core.items_mut();
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| {
            let va = items[a].working_value(&field).unwrap_or(f64::NEG_INFINITY);
            let vb = items[b].working_value(&field).unwrap_or(f64::NEG_INFINITY);
            vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal)
        });

        let cell = if items.is_empty() {
            0.0
        } else {
            1.0 / items.len() as f64
        };

        for (new_index, &old_slot) in order.iter().enumerate() {
            let old_index = items[old_slot].index();
            let uid = items[old_slot].uid();
            items[old_slot].set_index(new_index);

            // Delta is measured from the cell's current visual position, so
            // a still-running animation carries into the new target.
            let carried = self.sort_tweens.get(&uid).map_or(0.0, Tween::value);
            let delta = (old_index as f64 - new_index as f64).mul_add(cell, carried);

            match self.sort_tweens.get_mut(&uid) {
                Some(tween)
                    if !tween.is_finished()
                        && (delta - tween.value()).abs() < self.sort_epsilon =>
                {
                    // Target unchanged: leave the running animation alone.
                }
                Some(tween) => {
                    tween.stop();
                    if delta.abs() >= self.sort_epsilon {
                        self.sort_tweens.insert(uid, Tween::new(delta, 0.0));
                    } else {
                        self.sort_tweens.remove(&uid);
                    }
                }
                None => {
                    if delta.abs() >= self.sort_epsilon {
                        self.sort_tweens.insert(uid, Tween::new(delta, 0.0));
                    }
                }
            }
        }

        // Keep the collection in index order; visual identity travels with
        // each item.
        self.xy
            .core
            .items_mut()
            .sort_by_key(crate::data_item::DataItem::index);
        self.xy.core.invalidate();
    }

    /// Running sort animation for an item, if any.
    #[must_use]
    pub fn sort_tween(&self, uid: usize) -> Option<&Tween> {
        self.sort_tweens.get(&uid)
    }

    /// Advance all sort tweens by a normalized delta, dropping finished ones.
    pub fn advance_sort_tweens(&mut self, delta: f64) {
        for tween in self.sort_tweens.values_mut() {
            tween.advance(delta);
        }
        self.sort_tweens.retain(|_, t| !t.is_finished());
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

    fn columns(values: &[f64]) -> ColumnSeries {
        let categories = ["a", "b", "c"];
        let mut series = ColumnSeries::new("cols", AxisId(0), AxisId(1));
        series.xy.core.map_field("categoryX", "cat");
        series.xy.core.map_field("valueY", "v");
        series.xy.core.set_data(
            values
                .iter()
                .zip(categories)
                .map(|(&v, c)| {
                    record([
                        ("cat", DataValue::Text(c.into())),
                        ("v", DataValue::Number(v)),
                    ])
                })
                .collect(),
        );
        series.xy.core.validate_data();
        series.xy.core.validate_data_items();
        series.xy.define_fields(&axes()).unwrap();
        series
    }

    #[test]
    fn test_column_geometry_full_cell() {
        let mut series = columns(&[2.0, 5.0, 10.0]);
        series.set_slot_locations(0.0, 1.0);
        series.validate_columns(&axes(), Size::new(300.0, 100.0), false);
        let column = series.xy.core.items()[1].visuals.column.unwrap();
        // Category "b" cell spans x 100..200; value 5 on an inverted
        // 100px axis runs from the zero line (y=100) up to y=50.
        assert_eq!(column.x, 100.0);
        assert_eq!(column.width, 100.0);
        assert_eq!(column.y, 50.0);
        assert_eq!(column.height, 50.0);
        assert!(!column.disabled);
    }

    #[test]
    fn test_column_slot_geometry() {
        let mut series = columns(&[2.0, 5.0, 10.0]);
        series.set_slot_locations(0.5, 1.0);
        series.validate_columns(&axes(), Size::new(300.0, 100.0), false);
        let column = series.xy.core.items()[0].visuals.column.unwrap();
        // Right half of category "a" cell.
        assert_eq!(column.x, 50.0);
        assert_eq!(column.width, 50.0);
    }

    #[test]
    fn test_column_reuse_and_retire() {
        let mut series = columns(&[2.0, 5.0, 10.0]);
        series.validate_columns(&axes(), Size::new(300.0, 100.0), false);
        assert!(series.xy.core.items().iter().all(|i| i.visuals.column.is_some()));
        series.xy.core.set_window(0, 2);
        series.xy.core.validate_data_items();
        series.validate_columns(&axes(), Size::new(300.0, 100.0), false);
        let retired = series.xy.core.items()[2].visuals.column.unwrap();
        // Scrolled out of the window: zeroed and disabled, not destroyed.
        assert!(retired.disabled);
        assert_eq!(retired.width, 0.0);
    }

    #[test]
    fn test_gap_item_has_no_column() {
        let mut series = ColumnSeries::new("gaps", AxisId(0), AxisId(1));
        series.xy.core.map_field("categoryX", "cat");
        series.xy.core.map_field("valueY", "v");
        series.xy.core.set_data(vec![record([("cat", "a")])]);
        series.xy.core.validate_data();
        series.xy.define_fields(&axes()).unwrap();
        series.validate_columns(&axes(), Size::new(300.0, 100.0), false);
        assert!(series.xy.core.items()[0].visuals.column.is_none());
    }

    #[test]
    fn test_column_states_applied() {
        let red = ColumnStateStyle {
            fill: Some(Color::rgb(1.0, 0.0, 0.0)),
            stroke: None,
        };
        let green = ColumnStateStyle {
            fill: Some(Color::rgb(0.0, 1.0, 0.0)),
            stroke: None,
        };
        let mut series = columns(&[5.0, 2.0, 10.0]);
        series.states.drop_from_previous = Some(red);
        series.states.rise_from_previous = Some(green);
        series.validate_columns(&axes(), Size::new(300.0, 100.0), false);
        let fill = |i: usize| series.xy.core.items()[i].visuals.column.unwrap().fill;
        assert_eq!(fill(1), red.fill);
        assert_eq!(fill(2), green.fill);
    }

    #[test]
    fn test_range_column_clipped_to_band() {
        let mut series = columns(&[2.0, 5.0, 10.0]);
        series.xy.add_axis_range(crate::xy::AxisRangeSpec {
            axis: AxisId(1),
            start: 0.0,
            end: 4.0,
        });
        series.validate_columns(&axes(), Size::new(300.0, 100.0), false);
        let item = &series.xy.core.items()[1];
        let range_column = item.visuals.range_columns[&0];
        // Band 0..4 on the inverted axis is y 60..100; the value-5 column
        // spans y 50..100, so the range column keeps only the overlap.
        assert!(!range_column.disabled);
        assert_eq!(range_column.y, 60.0);
        assert_eq!(range_column.height, 40.0);
    }

    #[test]
    fn test_sort_category_axis_reindexes() {
        let mut series = columns(&[2.0, 10.0, 5.0]);
        let uid_of_largest = series.xy.core.items()[1].uid();
        series.sort_category_axis();
        // Largest value first; visual identity stays with the item.
        assert_eq!(series.xy.core.items()[0].uid(), uid_of_largest);
        assert_eq!(series.xy.core.items()[0].index(), 0);
        assert_eq!(series.xy.core.items()[2].index(), 2);
    }

    #[test]
    fn test_sort_tween_dedup() {
        let mut series = columns(&[2.0, 10.0, 5.0]);
        series.sort_category_axis();
        let uid = series.xy.core.items()[0].uid();
        let first = *series.sort_tween(uid).unwrap();
        // Re-sorting with unchanged data must not restart the animation.
        series.sort_category_axis();
        assert_eq!(*series.sort_tween(uid).unwrap(), first);
    }

    #[test]
    fn test_sort_tween_cleanup() {
        let mut series = columns(&[2.0, 10.0, 5.0]);
        series.sort_category_axis();
        assert!(!series.sort_tweens.is_empty());
        series.advance_sort_tweens(1.0);
        assert!(series.sort_tweens.is_empty());
    }
}
