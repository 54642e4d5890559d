//! Shared contract of the percent-based series family (pie, funnel,
//! pyramid, pictorial-stacked): total value across non-ignored items maps
//! onto a fixed visual budget.

use crate::data_item::DataItem;
use crate::series::SeriesCore;

/// Floor applied to zero working values so degenerate geometry divides by a
/// tiny epsilon instead of branching on exact zero.
pub(crate) const ZERO_FLOOR: f64 = 1e-6;

/// Aggregation core shared by the percent family.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentSeriesCore {
    /// Base aggregation engine, with percent computation enabled
    pub core: SeriesCore,
    /// Skip zero-value items entirely instead of letting them consume a
    /// slot in the visual budget
    pub(crate) ignore_zero_values: bool,
}

impl PercentSeriesCore {
    /// Logical value field of every percent series.
    pub const VALUE_FIELD: &'static str = "value";
    /// Logical category field of every percent series.
    pub const CATEGORY_FIELD: &'static str = "category";

    /// Create a percent core; percent computation is always on.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut core = SeriesCore::new(name);
        core.set_calculate_percent(true);
        Self {
            core,
            ignore_zero_values: false,
        }
    }

    /// Map the value field to a record key.
    pub fn map_value_field(&mut self, record_key: impl Into<String>) {
        self.core.map_field(Self::VALUE_FIELD, record_key);
    }

    /// Map the category field to a record key.
    pub fn map_category_field(&mut self, record_key: impl Into<String>) {
        self.core.map_field(Self::CATEGORY_FIELD, record_key);
    }

    /// Skip zero-value items entirely (default keeps them as slots).
    pub fn set_ignore_zero_values(&mut self, ignore: bool) {
        self.ignore_zero_values = ignore;
        self.core.invalidate();
    }

    /// Run data + derived-value validation, including the working pass.
    pub fn validate_values(&mut self) {
        self.core.validate_data();
        self.core.validate_data_items();
        self.core.process_values(true);
    }

    /// Whether layout should include this item.
    #[must_use]
    pub fn includes(&self, item: &DataItem) -> bool {
        if item.is_hidden() && item.working_value(Self::VALUE_FIELD).unwrap_or(0.0) == 0.0 {
            // Fully hidden (animation settled): drops out of the budget.
            return false;
        }
        match item.value(Self::VALUE_FIELD) {
            Some(value) => !(self.ignore_zero_values && value == 0.0),
            None => false,
        }
    }

    /// Working value floored away from zero for safe geometry division.
    #[must_use]
    pub fn floored_working(item: &DataItem) -> f64 {
        item.working_value(Self::VALUE_FIELD)
            .unwrap_or(0.0)
            .abs()
            .max(ZERO_FLOOR)
    }

    /// Indices of included items in the current window.
    #[must_use]
    pub fn included_indices(&self) -> Vec<usize> {
        let (start, end) = self.core.window();
        let end = end.min(self.core.items().len());
        (start..end)
            .filter(|&i| self.includes(&self.core.items()[i]))
            .collect()
    }

    /// Total floored working value across included items.
    #[must_use]
    pub fn total_working(&self) -> f64 {
        self.included_indices()
            .iter()
            .map(|&i| Self::floored_working(&self.core.items()[i]))
            .sum::<f64>()
            .max(ZERO_FLOOR)
    }

    /// Hide one item: its value animates toward zero and the remaining
    /// slices grow to fill the budget on the next validation.
    pub fn hide_item(&mut self, index: usize) {
        if let Some(item) = self.core.items_mut().get_mut(index) {
            item.hide(&[Self::VALUE_FIELD]);
        }
        self.core.invalidate_data_items();
    }

    /// Show a previously hidden item, restoring its pre-hide working value.
    pub fn show_item(&mut self, index: usize) {
        if let Some(item) = self.core.items_mut().get_mut(index) {
            item.show();
        }
        self.core.invalidate_data_items();
    }
}
