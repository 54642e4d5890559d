//! Candlestick series: column bodies from open/close plus high/low wicks.

use crate::column::ColumnSeries;
use crate::xy::{BaseAxis, SeriesKind, XySeries};
use graficar_core::{AnyAxis, Axis, AxisId, ChartError, Point, Size};

/// Columns with high/low wick lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CandlestickSeries {
    /// Column layer providing body layout, clustering, and states
    pub column: ColumnSeries,
    /// Resolved low/high logical field names
    low_field: String,
    high_field: String,
}

impl CandlestickSeries {
    /// Create a candlestick series bound to an axis pair.
    #[must_use]
    pub fn new(name: impl Into<String>, x_axis: AxisId, y_axis: AxisId) -> Self {
        Self {
            column: ColumnSeries::with_kind(name, SeriesKind::Candlestick, x_axis, y_axis),
            low_field: String::new(),
            high_field: String::new(),
        }
    }

    /// Cartesian layer.
    #[must_use]
    pub const fn xy(&self) -> &XySeries {
        &self.column.xy
    }

    /// Resolve body fields via the column layer, then derive the wick
    /// fields from the value side (`valueY` → `lowValueY`/`highValueY`).
    pub fn define_fields(&mut self, axes: &[AnyAxis]) -> Result<(), ChartError> {
        self.column.xy.define_fields(axes)?;
        let value_field = self.column.xy.value_field();
        let capitalized = capitalize(value_field);
        self.low_field = format!("low{capitalized}");
        self.high_field = format!("high{capitalized}");
        for field in [&self.low_field, &self.high_field] {
            if !self.column.xy.core.data_fields.contains_key(field) {
                return Err(ChartError::MissingField {
                    series: self.column.xy.core.name().to_string(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }

    /// Lay out bodies and wicks for the current window.
    pub fn validate_candles(&mut self, axes: &[AnyAxis], plot: Size, working: bool) {
        self.column.validate_columns(axes, plot, working);

        let value_field = self.column.xy.value_field().to_string();
        let open_field = self.column.xy.value_open_field().to_string();
        let low_field = self.low_field.clone();
        let high_field = self.high_field.clone();
        let base_is_x = self.column.xy.base_axis == BaseAxis::X;
        let value_axis_id = if base_is_x {
            self.column.xy.y_axis
        } else {
            self.column.xy.x_axis
        };
        let Some(value_axis) = axes.get(value_axis_id.0).cloned() else {
            return;
        };

        let (start, end) = self.column.xy.core.window();
        let len = self.column.xy.core.items().len();
        for i in 0..len {
            let in_window = i >= start && i < end;
            let item = &self.column.xy.core.items()[i];
            let body = item.visuals.column.filter(|c| !c.disabled);
            let wick_geometry = if in_window {
                body.and_then(|body| {
                    let value = item.effective_value(&value_field, working)?;
                    let open = item.effective_value(&open_field, working)?;
                    let low = item.effective_value(&low_field, working)?;
                    let high = item.effective_value(&high_field, working)?;
                    let coord = |v: f64| {
                        value_axis.position_to_coordinate(value_axis.value_to_position(v))
                    };
                    let body_lo = coord(value.min(open));
                    let body_hi = coord(value.max(open));
                    if base_is_x {
                        let center = body.x + body.width / 2.0;
                        Some((
                            (Point::new(center, coord(high)), Point::new(center, body_hi)),
                            (Point::new(center, coord(low)), Point::new(center, body_lo)),
                        ))
                    } else {
                        let center = body.y + body.height / 2.0;
                        Some((
                            (Point::new(coord(high), center), Point::new(body_hi, center)),
                            (Point::new(coord(low), center), Point::new(body_lo, center)),
                        ))
                    }
                })
            } else {
                None
            };

            let item = &mut self.column.xy.core.items_mut()[i];
            match wick_geometry {
                Some((high_line, low_line)) => {
                    let high = item.visuals.high_line.get_or_insert_with(Default::default);
                    high.set_endpoints(high_line.0, high_line.1);
                    high.disabled = false;
                    let low = item.visuals.low_line.get_or_insert_with(Default::default);
                    low.set_endpoints(low_line.0, low_line.1);
                    low.disabled = false;
                }
                None => {
                    if let Some(line) = item.visuals.high_line.as_mut() {
                        line.disabled = true;
                    }
                    if let Some(line) = item.visuals.low_line.as_mut() {
                        line.disabled = true;
                    }
                }
            }
        }
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{record, DataValue};
    use graficar_core::{AnyAxis, CategoryAxis, ValueAxis};

    fn axes() -> Vec<AnyAxis> {
        vec![
            AnyAxis::Category(CategoryAxis::new(["a", "b"], 200.0)),
            AnyAxis::Value(ValueAxis::new(0.0, 10.0, 100.0).inverted(true)),
        ]
    }

    fn candles() -> CandlestickSeries {
        let mut series = CandlestickSeries::new("ohlc", AxisId(0), AxisId(1));
        let core = &mut series.column.xy.core;
        core.map_field("categoryX", "cat");
        core.map_field("valueY", "close");
        core.map_field("openValueY", "open");
        core.map_field("lowValueY", "low");
        core.map_field("highValueY", "high");
        let mut first = record([("close", 6.0), ("open", 4.0), ("low", 2.0), ("high", 8.0)]);
        first.insert("cat".into(), DataValue::Text("a".into()));
        let mut second = record([("close", 3.0), ("open", 5.0), ("low", 1.0), ("high", 7.0)]);
        second.insert("cat".into(), DataValue::Text("b".into()));
        core.set_data(vec![first, second]);
        core.validate_data();
        core.validate_data_items();
        series.define_fields(&axes()).unwrap();
        series
    }

    #[test]
    fn test_define_fields_derives_wick_names() {
        let series = candles();
        assert_eq!(series.low_field, "lowValueY");
        assert_eq!(series.high_field, "highValueY");
    }

    #[test]
    fn test_missing_wick_mapping_is_config_error() {
        let mut series = CandlestickSeries::new("bad", AxisId(0), AxisId(1));
        series.column.xy.core.map_field("categoryX", "cat");
        series.column.xy.core.map_field("valueY", "close");
        let err = series.define_fields(&axes()).unwrap_err();
        assert!(matches!(err, ChartError::MissingField { field, .. } if field == "lowValueY"));
    }

    #[test]
    fn test_wick_geometry() {
        let mut series = candles();
        series.validate_candles(&axes(), Size::new(200.0, 100.0), false);
        let item = &series.column.xy.core.items()[0];
        let body = item.visuals.column.unwrap();
        // Body spans open 4 to close 6 on the inverted axis: y 40..60.
        assert_eq!(body.y, 40.0);
        assert_eq!(body.height, 20.0);
        let high = item.visuals.high_line.unwrap();
        let low = item.visuals.low_line.unwrap();
        // High wick runs from 8 (y=20) down to the body top (y=40).
        assert_eq!(high.y1, 20.0);
        assert_eq!(high.y2, 40.0);
        // Low wick from 2 (y=80) up to the body bottom (y=60).
        assert_eq!(low.y1, 80.0);
        assert_eq!(low.y2, 60.0);
        // Both wicks sit at the column center.
        assert_eq!(high.x1, body.x + body.width / 2.0);
        assert_eq!(low.x1, high.x1);
    }

    #[test]
    fn test_wicks_retire_outside_window() {
        let mut series = candles();
        series.validate_candles(&axes(), Size::new(200.0, 100.0), false);
        series.column.xy.core.set_window(0, 1);
        series.column.xy.core.validate_data_items();
        series.validate_candles(&axes(), Size::new(200.0, 100.0), false);
        let item = &series.column.xy.core.items()[1];
        assert!(item.visuals.high_line.unwrap().disabled);
        assert!(item.visuals.low_line.unwrap().disabled);
    }
}
