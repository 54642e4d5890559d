//! Series base: owns the data-item collection and computes every derived
//! per-item and per-series statistic.
//!
//! The validation pipeline runs top-down on every invalidation:
//! `validate_data` (records → items) → `validate_data_items` (derived values)
//! → layout (series-kind specific). Per-object invalid flags collapse
//! repeated invalidation within one frame into a single recomputation.

use crate::data_item::DataItem;
use crate::value::{Calculated, DataValue, Record};
use graficar_core::{ChartError, Point};
use std::collections::BTreeMap;

/// Epsilon used by the percent hack's exact-sum comparison.
const SUM_EPSILON: f64 = 1e-9;

/// A bullet template registered on a series. Each (item, template) pair
/// reuses one bullet instance across re-validations.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletTemplate {
    /// Template identity
    pub id: usize,
    /// Record field that drives the bullet's disabled flag, when present
    pub disabled_field: Option<String>,
}

impl BulletTemplate {
    /// Create a template with the given identity.
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self {
            id,
            disabled_field: None,
        }
    }

    /// Drive the disabled flag from a record field.
    #[must_use]
    pub fn disabled_field(mut self, field: impl Into<String>) -> Self {
        self.disabled_field = Some(field.into());
        self
    }
}

/// Base aggregation engine common to every series kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesCore {
    /// Series name, used in error messages
    pub(crate) name: String,
    /// Raw assigned records (the "main" set)
    pub(crate) data: Vec<Record>,
    /// Alternate named data sets for drill-down / dataset switching
    pub(crate) data_sets: BTreeMap<String, Vec<Record>>,
    /// Ordered data items
    pub(crate) items: Vec<DataItem>,
    /// Logical field name → record key
    pub(crate) data_fields: BTreeMap<String, String>,
    /// Visible window start (inclusive)
    pub(crate) start_index: usize,
    /// Visible window end (exclusive)
    pub(crate) end_index: usize,
    /// Compute per-item percent shares (required for percent-based series)
    pub(crate) calculate_percent: bool,
    /// Percent special case for the last visible animating slice
    pub(crate) use_percent_hack: bool,
    /// Skip all derived-statistic computation (large-data opt-out)
    pub(crate) simplified_processing: bool,
    /// Series hidden by the host
    pub(crate) hidden: bool,
    pub(crate) invalid_data: bool,
    pub(crate) invalid_data_items: bool,
    pub(crate) invalid: bool,
    /// Whole-series statistics per value field (ignores the window)
    pub(crate) summary: BTreeMap<String, Calculated>,
    /// Registered bullet templates
    pub(crate) bullet_templates: Vec<BulletTemplate>,
    /// Per-item processing errors from the last `validate_data`
    pub(crate) item_errors: Vec<ChartError>,
    next_uid: usize,
}

impl SeriesCore {
    /// Create a series with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            use_percent_hack: true,
            invalid_data: true,
            invalid_data_items: true,
            invalid: true,
            ..Self::default()
        }
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Map a logical field name to a record key.
    pub fn map_field(&mut self, logical: impl Into<String>, record_key: impl Into<String>) {
        self.data_fields.insert(logical.into(), record_key.into());
        self.invalidate_data();
    }

    /// Record key mapped to a logical field, if any.
    #[must_use]
    pub fn field_key(&self, logical: &str) -> Option<&str> {
        self.data_fields.get(logical).map(String::as_str)
    }

    /// Assign the main data set. Triggers full reprocessing.
    pub fn set_data(&mut self, data: Vec<Record>) {
        self.data = data;
        self.invalidate_data();
    }

    /// Register an alternate named data set.
    pub fn add_data_set(&mut self, name: impl Into<String>, data: Vec<Record>) {
        self.data_sets.insert(name.into(), data);
    }

    /// Swap the main data for a named set (drill-down). Unknown names are
    /// ignored.
    pub fn switch_data_set(&mut self, name: &str) {
        if let Some(data) = self.data_sets.get(name) {
            self.data = data.clone();
            self.invalidate_data();
        }
    }

    /// Enable percent computation (required for percent-based series).
    pub fn set_calculate_percent(&mut self, on: bool) {
        self.calculate_percent = on;
        self.invalidate_data_items();
    }

    /// Opt out of the single-visible-slice percent special case.
    pub fn set_use_percent_hack(&mut self, on: bool) {
        self.use_percent_hack = on;
        self.invalidate_data_items();
    }

    /// Trade derived statistics for throughput on large data.
    pub fn set_simplified_processing(&mut self, on: bool) {
        self.simplified_processing = on;
        self.invalidate_data_items();
    }

    /// Register a bullet template.
    pub fn add_bullet_template(&mut self, template: BulletTemplate) {
        self.bullet_templates.push(template);
        self.invalidate();
    }

    /// Hide the whole series. Its elements are disabled on the next pass.
    pub fn hide(&mut self) {
        self.hidden = true;
        self.invalidate();
    }

    /// Show a hidden series.
    pub fn show(&mut self) {
        self.hidden = false;
        self.invalidate();
    }

    /// Whether the host hid this series.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The ordered data items.
    #[must_use]
    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    /// Mutable access to the ordered data items.
    pub fn items_mut(&mut self) -> &mut [DataItem] {
        &mut self.items
    }

    /// Visible window `[start, end)`.
    #[must_use]
    pub const fn window(&self) -> (usize, usize) {
        (self.start_index, self.end_index)
    }

    /// Set the visible window, clamped to `start <= end <= len`.
    pub fn set_window(&mut self, start: usize, end: usize) {
        let len = self.items.len();
        self.start_index = start.min(len);
        self.end_index = end.clamp(self.start_index, len);
        self.invalidate_data_items();
    }

    /// Whole-series statistics for a field (ignores the window).
    #[must_use]
    pub fn summary(&self, field: &str) -> Option<&Calculated> {
        self.summary.get(field)
    }

    /// Per-item errors recovered during the last data validation.
    #[must_use]
    pub fn item_errors(&self) -> &[ChartError] {
        &self.item_errors
    }

    /// Mark raw data stale; the next validation reprocesses records.
    pub fn invalidate_data(&mut self) {
        self.invalid_data = true;
        self.invalid_data_items = true;
        self.invalid = true;
    }

    /// Mark derived values stale.
    pub fn invalidate_data_items(&mut self) {
        self.invalid_data_items = true;
        self.invalid = true;
    }

    /// Mark layout stale.
    pub fn invalidate(&mut self) {
        self.invalid = true;
    }

    /// Whether any stage is stale.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.invalid_data || self.invalid_data_items || self.invalid
    }

    /// Convert assigned records into data items. Item-level failures are
    /// recovered: the item keeps its usable fields and the error is recorded
    /// for the chart's reporter.
    pub fn validate_data(&mut self) {
        if !self.invalid_data {
            return;
        }
        self.items.clear();
        self.item_errors.clear();
        let records = std::mem::take(&mut self.data);
        for (index, rec) in records.iter().enumerate() {
            let item = self.process_data_item(index, rec);
            self.items.push(item);
        }
        self.data = records;
        self.start_index = 0;
        self.end_index = self.items.len();
        self.invalid_data = false;
        self.invalid_data_items = true;
    }

    /// Convert one record into a data item per the `data_fields` mapping.
    fn process_data_item(&mut self, index: usize, rec: &Record) -> DataItem {
        let uid = self.next_uid;
        self.next_uid += 1;
        let mut item = DataItem::new(index, uid, rec.clone());
        for (logical, key) in &self.data_fields {
            let Some(raw) = rec.get(key) else { continue };
            if logical.starts_with("category") {
                match raw {
                    DataValue::Text(s) => item.set_category(logical, s.clone()),
                    DataValue::Null => {}
                    other => {
                        // Numbers are a common spreadsheet artifact; coerce.
                        if let Some(n) = other.as_number() {
                            item.set_category(logical, n.to_string());
                        } else {
                            self.item_errors.push(ChartError::ItemProcessing {
                                series: self.name.clone(),
                                index,
                                reason: format!("field `{key}` is not usable as a category"),
                            });
                        }
                    }
                }
            } else {
                match raw.as_number() {
                    Some(n) => item.set_value(logical, n),
                    None => match raw {
                        DataValue::Null | DataValue::Bool(_) => {}
                        _ => self.item_errors.push(ChartError::ItemProcessing {
                            series: self.name.clone(),
                            index,
                            reason: format!("field `{key}` is not numeric"),
                        }),
                    },
                }
            }
        }
        item
    }

    /// Recompute derived values for the current window.
    pub fn validate_data_items(&mut self) {
        if !self.invalid_data_items {
            return;
        }
        self.process_values(false);
        self.invalid_data_items = false;
        self.invalid = true;
    }

    /// Single forward pass computing count / sum / absolute sum / low / high
    /// / open / close per field over `[start_index, end_index)`, plus
    /// per-item change statistics, plus the whole-series summary.
    ///
    /// `working` selects animated values; the working pass runs again at
    /// layout time so mid-animation geometry reads fresh statistics.
    #[allow(clippy::too_many_lines)]
    pub fn process_values(&mut self, working: bool) {
        if self.simplified_processing {
            return;
        }

        let fields: Vec<String> = {
            let mut fields: Vec<String> = Vec::new();
            for item in &self.items[self.start_index..self.end_index.min(self.items.len())] {
                for field in item.value_fields() {
                    if !fields.iter().any(|f| f == field) {
                        fields.push(field.to_string());
                    }
                }
            }
            fields
        };

        for field in &fields {
            self.process_field(field, working);
        }

        self.compute_summary(working);

        if self.calculate_percent {
            for field in &fields {
                self.process_percent(field, working);
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn process_field(&mut self, field: &str, working: bool) {
        let (start, end) = (self.start_index, self.end_index.min(self.items.len()));

        // Absolute-first value of the whole series, ignoring the window;
        // start-change statistics stay invariant across zoom.
        let series_first = self
            .items
            .iter()
            .find_map(|item| item.effective_value(field, working));

        let mut stats = Calculated::default();
        let mut window_open: Option<f64> = None;
        let mut prev_value: Option<f64> = None;
        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;

        for item in &mut self.items[start..end] {
            let Some(value) = item.effective_value(field, working) else {
                continue;
            };
            let open = *window_open.get_or_insert(value);
            stats.count += 1;
            stats.sum += value;
            stats.absolute_sum += value.abs();
            low = low.min(value);
            high = high.max(value);
            stats.close = value;

            // Division by a zero window-open yields the documented NaN /
            // infinity; it never reaches geometry.
            let previous = prev_value.unwrap_or(value);
            let calc = &mut item.slot_mut(field).calculated;
            calc.change = value - open;
            calc.change_percent = (value - open) / open * 100.0;
            if let Some(first) = series_first {
                calc.start_change = value - first;
                calc.start_change_percent = (value - first) / first * 100.0;
            }
            calc.previous_change = value - previous;
            calc.previous_change_percent = (value - previous) / previous * 100.0;
            prev_value = Some(value);
        }

        stats.open = window_open.unwrap_or(0.0);
        stats.low = if stats.count == 0 { 0.0 } else { low };
        stats.high = if stats.count == 0 { 0.0 } else { high };
        stats.average = if stats.count == 0 {
            0.0
        } else {
            stats.sum / stats.count as f64
        };

        // The item just before the window is a virtual anchor for line
        // drawing; it gets window-relative change so a polyline entering the
        // window doesn't appear disconnected while panning.
        if start > 0 {
            if let Some(open) = window_open {
                let anchor = &mut self.items[start - 1];
                if let Some(value) = anchor.effective_value(field, working) {
                    let calc = &mut anchor.slot_mut(field).calculated;
                    calc.change = value - open;
                    calc.change_percent = (value - open) / open * 100.0;
                }
            }
        }

        // Window aggregates are visible from every item in the window.
        for item in &mut self.items[start..end] {
            if item.has_value(field, working) {
                let calc = &mut item.slot_mut(field).calculated;
                calc.count = stats.count;
                calc.sum = stats.sum;
                calc.absolute_sum = stats.absolute_sum;
                calc.average = stats.average;
                calc.open = stats.open;
                calc.close = stats.close;
                calc.low = stats.low;
                calc.high = stats.high;
            }
        }
    }

    /// Second pass: each item's share of the window's absolute sum.
    fn process_percent(&mut self, field: &str, working: bool) {
        let (start, end) = (self.start_index, self.end_index.min(self.items.len()));
        let total: f64 = self.items[start..end]
            .iter()
            .filter_map(|item| item.effective_value(field, working))
            .map(f64::abs)
            .sum();

        let use_hack = self.use_percent_hack;
        for item in &mut self.items[start..end] {
            let Some(value) = item.effective_value(field, working) else {
                continue;
            };
            let real = item.value(field).unwrap_or(0.0);
            // When the animating value IS the entire total (only visible
            // slice), divide by the real value so motion toward zero stays
            // visible instead of pinning at 100%.
            let denominator =
                if use_hack && (value.abs() - total).abs() < SUM_EPSILON && real.abs() > 0.0 {
                    real.abs()
                } else {
                    total
                };
            let percent = if denominator.abs() < SUM_EPSILON {
                0.0
            } else {
                value.abs() / denominator * 100.0
            };
            item.slot_mut(field).calculated.percent = percent;
        }
    }

    /// Whole-series statistics per field, ignoring the window.
    fn compute_summary(&mut self, working: bool) {
        self.summary.clear();
        for i in 0..self.items.len() {
            let fields: Vec<String> =
                self.items[i].value_fields().map(str::to_string).collect();
            for field in fields {
                let Some(value) = self.items[i].effective_value(&field, working) else {
                    continue;
                };
                let stats = self.summary.entry(field).or_insert_with(|| Calculated {
                    low: f64::INFINITY,
                    high: f64::NEG_INFINITY,
                    open: value,
                    ..Calculated::default()
                });
                stats.count += 1;
                stats.sum += value;
                stats.absolute_sum += value.abs();
                stats.low = stats.low.min(value);
                stats.high = stats.high.max(value);
                stats.close = value;
                stats.average = stats.sum / stats.count as f64;
            }
        }
    }

    /// Re-synchronize bullets against the current window.
    ///
    /// For each visible item and registered template, find-or-create the
    /// bullet keyed by template identity, position it through `position`,
    /// and honor a data-driven disabled field when the record carries one.
    /// Bullets for items outside the window are disabled, not destroyed.
    pub fn sync_bullets<F>(&mut self, mut position: F)
    where
        F: FnMut(&DataItem) -> Option<Point>,
    {
        let (start, end) = (self.start_index, self.end_index.min(self.items.len()));
        let templates = self.bullet_templates.clone();
        for (i, item) in self.items.iter_mut().enumerate() {
            let visible = i >= start && i < end && !item.is_hidden();
            if !visible {
                for bullet in item.visuals.bullets.values_mut() {
                    bullet.disabled = true;
                }
                continue;
            }
            let point = position(item);
            for template in &templates {
                let data_disabled = template.disabled_field.as_deref().and_then(|f| {
                    item.data_context().get(f).and_then(DataValue::as_bool)
                });
                let bullet = item.visuals.bullets.entry(template.id).or_default();
                match point {
                    Some(p) => {
                        bullet.x = p.x;
                        bullet.y = p.y;
                        bullet.disabled = data_disabled.unwrap_or(false);
                    }
                    None => bullet.disabled = true,
                }
            }
        }
    }
}
