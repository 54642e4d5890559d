//! A single data record's live state.
//!
//! One `DataItem` type serves every series kind; capabilities (open/close,
//! high/low, category placement) come from which fields the owning series
//! configures, not from subclassing.

use crate::value::{Record, ValueSlot};
use graficar_core::{
    ArcElement, BulletElement, LabelElement, LineElement, RectElement, TrapezoidElement,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default fractional position within an axis cell.
pub const DEFAULT_LOCATION: f64 = 0.5;

/// Visual elements owned by a data item, one per role.
///
/// Elements are created lazily on first access and reused across
/// re-validations; they are dropped only with the item itself. Hiding goes
/// through each element's `disabled` flag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualSet {
    /// Column rectangle
    pub column: Option<RectElement>,
    /// Range-specific parallel columns, keyed by axis-range index
    pub range_columns: BTreeMap<usize, RectElement>,
    /// Pie slice
    pub slice: Option<ArcElement>,
    /// Funnel/pyramid slice
    pub trapezoid: Option<TrapezoidElement>,
    /// Link to the next slice
    pub link: Option<TrapezoidElement>,
    /// High wick (candlestick)
    pub high_line: Option<LineElement>,
    /// Low wick (candlestick)
    pub low_line: Option<LineElement>,
    /// Tick from slice to label
    pub tick: Option<LineElement>,
    /// Label
    pub label: Option<LabelElement>,
    /// Bullets keyed by template id; the same template always reuses the
    /// same instance
    pub bullets: BTreeMap<usize, BulletElement>,
}

impl VisualSet {
    /// Disable every owned element without destroying any of them.
    pub fn disable_all(&mut self) {
        if let Some(column) = self.column.as_mut() {
            column.disabled = true;
        }
        for range_column in self.range_columns.values_mut() {
            range_column.disabled = true;
        }
        if let Some(slice) = self.slice.as_mut() {
            slice.disabled = true;
        }
        if let Some(trapezoid) = self.trapezoid.as_mut() {
            trapezoid.disabled = true;
        }
        if let Some(link) = self.link.as_mut() {
            link.disabled = true;
        }
        if let Some(line) = self.high_line.as_mut() {
            line.disabled = true;
        }
        if let Some(line) = self.low_line.as_mut() {
            line.disabled = true;
        }
        if let Some(tick) = self.tick.as_mut() {
            tick.disabled = true;
        }
        if let Some(label) = self.label.as_mut() {
            label.disabled = true;
        }
        for bullet in self.bullets.values_mut() {
            bullet.disabled = true;
        }
    }
}

/// Live state of one data record inside a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    /// Position within the series' current ordered collection. Reassigned by
    /// sorting; unique and monotonic within the series.
    index: usize,
    /// Creation ordinal; stable across reordering, keys animations
    uid: usize,
    /// The original external record
    data_context: Record,
    /// Value slots keyed by logical field name
    values: BTreeMap<String, ValueSlot>,
    /// Category fields keyed by logical field name
    categories: BTreeMap<String, String>,
    /// Per-field fractional position within an axis cell
    locations: BTreeMap<String, f64>,
    /// Animated counterpart of `locations`
    working_locations: BTreeMap<String, f64>,
    /// Hidden by the host (legend toggle, programmatic hide)
    hidden: bool,
    /// Working values stashed at hide time, restored on show
    pre_hide: BTreeMap<String, f64>,
    /// Owned visual elements
    pub visuals: VisualSet,
}

impl DataItem {
    /// Create an item at `index` backed by `data_context`.
    #[must_use]
    pub fn new(index: usize, uid: usize, data_context: Record) -> Self {
        Self {
            index,
            uid,
            data_context,
            values: BTreeMap::new(),
            categories: BTreeMap::new(),
            locations: BTreeMap::new(),
            working_locations: BTreeMap::new(),
            hidden: false,
            pre_hide: BTreeMap::new(),
            visuals: VisualSet::default(),
        }
    }

    /// Position within the series' ordered collection.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Reassign the index (category-axis sort). Visual-element identity stays
    /// with the item, so reordering does not flicker.
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Creation ordinal, stable across reordering.
    #[must_use]
    pub const fn uid(&self) -> usize {
        self.uid
    }

    /// The original external record.
    #[must_use]
    pub const fn data_context(&self) -> &Record {
        &self.data_context
    }

    /// Whether the host hid this item.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Raw value of a field.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(|s| s.value)
    }

    /// Working (animated) value of a field, falling back to the raw value.
    #[must_use]
    pub fn working_value(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(|s| s.effective(true))
    }

    /// Value the layout should read for the given pass.
    #[must_use]
    pub fn effective_value(&self, field: &str, working: bool) -> Option<f64> {
        self.values.get(field).and_then(|s| s.effective(working))
    }

    /// Set a field's raw value; working value follows.
    pub fn set_value(&mut self, field: &str, value: f64) {
        let slot = self.values.entry(field.to_string()).or_default();
        slot.value = Some(value);
        slot.working_value = Some(value);
        slot.stack_true = slot.stack + value;
    }

    /// Set a field's working value only (mid-animation state).
    pub fn set_working_value(&mut self, field: &str, value: f64) {
        let slot = self.values.entry(field.to_string()).or_default();
        slot.working_value = Some(value);
        slot.stack_true = slot.stack + value;
    }

    /// The slot for a field, if the record supplied one.
    #[must_use]
    pub fn slot(&self, field: &str) -> Option<&ValueSlot> {
        self.values.get(field)
    }

    /// Mutable slot access, creating the slot on first use.
    pub fn slot_mut(&mut self, field: &str) -> &mut ValueSlot {
        self.values.entry(field.to_string()).or_default()
    }

    /// Logical value fields present on this item.
    pub fn value_fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Category of a field.
    #[must_use]
    pub fn category(&self, field: &str) -> Option<&str> {
        self.categories.get(field).map(String::as_str)
    }

    /// Set a category field.
    pub fn set_category(&mut self, field: &str, category: impl Into<String>) {
        self.categories.insert(field.to_string(), category.into());
    }

    /// Fractional location of a field within its axis cell.
    #[must_use]
    pub fn location(&self, field: &str) -> f64 {
        self.locations.get(field).copied().unwrap_or(DEFAULT_LOCATION)
    }

    /// Set a field's location.
    pub fn set_location(&mut self, field: &str, location: f64) {
        self.locations.insert(field.to_string(), location);
    }

    /// Animated location, falling back to the target location.
    #[must_use]
    pub fn working_location(&self, field: &str) -> f64 {
        self.working_locations
            .get(field)
            .copied()
            .unwrap_or_else(|| self.location(field))
    }

    /// Set a field's working location (entrance transitions).
    pub fn set_working_location(&mut self, field: &str, location: f64) {
        self.working_locations.insert(field.to_string(), location);
    }

    /// Whether this item has a usable value for `field` in the given pass.
    #[must_use]
    pub fn has_value(&self, field: &str, working: bool) -> bool {
        self.effective_value(field, working).is_some()
    }

    /// Hide the item: stash each field's working value, then animate them
    /// toward zero (the stash is what `show` restores).
    pub fn hide(&mut self, fields: &[&str]) {
        self.hidden = true;
        for field in fields {
            if let Some(slot) = self.values.get_mut(*field) {
                if let Some(working) = slot.working_value.or(slot.value) {
                    self.pre_hide.insert((*field).to_string(), working);
                }
                slot.working_value = Some(0.0);
                slot.stack_true = slot.stack;
            }
        }
    }

    /// Show the item, restoring every working value stashed on hide.
    pub fn show(&mut self) {
        self.hidden = false;
        for (field, value) in std::mem::take(&mut self.pre_hide) {
            if let Some(slot) = self.values.get_mut(&field) {
                slot.working_value = Some(value);
                slot.stack_true = slot.stack + value;
            }
        }
    }
}
