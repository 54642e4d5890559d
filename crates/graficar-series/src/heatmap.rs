//! Heat-map series: column cells colored by value (a heat rule).

use crate::column::ColumnSeries;
use crate::xy::{SeriesKind, XySeries};
use graficar_core::{AnyAxis, AxisId, Color, Size};

/// Columns whose fill interpolates between two colors by value.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMapSeries {
    /// Column layer providing cell layout
    pub column: ColumnSeries,
    /// Fill at the window minimum
    pub min_color: Color,
    /// Fill at the window maximum
    pub max_color: Color,
}

impl HeatMapSeries {
    /// Create a heat-map series bound to an axis pair.
    #[must_use]
    pub fn new(name: impl Into<String>, x_axis: AxisId, y_axis: AxisId) -> Self {
        Self {
            column: ColumnSeries::with_kind(name, SeriesKind::HeatMap, x_axis, y_axis),
            min_color: Color::WHITE,
            max_color: Color::BLACK,
        }
    }

    /// Set the heat-rule endpoints.
    #[must_use]
    pub const fn heat_colors(mut self, min: Color, max: Color) -> Self {
        self.min_color = min;
        self.max_color = max;
        self
    }

    /// Cartesian layer.
    #[must_use]
    pub const fn xy(&self) -> &XySeries {
        &self.column.xy
    }

    /// The value field driving the heat rule.
    fn heat_field(&self) -> String {
        // Category×Category heat maps carry the heat value in a plain
        // `value` mapping; Cartesian ones reuse the value-axis field.
        if self.column.xy.core.data_fields.contains_key("value") {
            "value".to_string()
        } else {
            self.column.xy.value_field().to_string()
        }
    }

    /// Lay out cells, then apply the heat rule over the visible window.
    pub fn validate_heat(&mut self, axes: &[AnyAxis], plot: Size, working: bool) {
        self.column.validate_columns(axes, plot, working);

        let field = self.heat_field();
        let (start, end) = self.column.xy.core.window();
        let end = end.min(self.column.xy.core.items().len());

        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        for item in &self.column.xy.core.items()[start..end] {
            if let Some(value) = item.effective_value(&field, working) {
                low = low.min(value);
                high = high.max(value);
            }
        }
        if !low.is_finite() || !high.is_finite() {
            return;
        }
        let range = high - low;

        let (min_color, max_color) = (self.min_color, self.max_color);
        for item in &mut self.column.xy.core.items_mut()[start..end] {
            let Some(value) = item.effective_value(&field, working) else {
                continue;
            };
            // Zero range degenerates to the midpoint instead of dividing.
            let t = if range.abs() < f64::EPSILON {
                0.5
            } else {
                ((value - low) / range) as f32
            };
            if let Some(column) = item.visuals.column.as_mut() {
                column.fill = Some(min_color.lerp(&max_color, t));
            }
        }
    }
}
