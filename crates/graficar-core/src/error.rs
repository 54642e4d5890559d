//! Error taxonomy for the charting engine.
//!
//! Configuration errors are fatal and surface as `Err` from validation entry
//! points. Data gaps are not errors — items without usable values are skipped
//! or hidden locally. Per-item processing failures are forwarded to the
//! chart's error reporter and the pass continues.

use crate::axis::AxisField;
use thiserror::Error;

/// Errors surfaced by series validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// A required data-field mapping is missing on the series.
    #[error("series `{series}`: required data field `{field}` is not mapped")]
    MissingField {
        /// Series name
        series: String,
        /// Logical field name (e.g. `valueY`)
        field: String,
    },

    /// A field resolved against an axis of the wrong semantic kind.
    #[error("series `{series}`: field `{field}` does not match {expected:?} axis")]
    AxisFieldMismatch {
        /// Series name
        series: String,
        /// Logical field name
        field: String,
        /// Kind the bound axis expects
        expected: AxisField,
    },

    /// A series references an axis id the chart does not own.
    #[error("series `{series}`: unknown axis #{axis}")]
    UnknownAxis {
        /// Series name
        series: String,
        /// Axis index
        axis: usize,
    },

    /// A record could not be converted into a data item.
    #[error("series `{series}`: record #{index}: {reason}")]
    ItemProcessing {
        /// Series name
        series: String,
        /// Record index within the assigned data
        index: usize,
        /// Human-readable cause
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChartError::MissingField {
            series: "sales".into(),
            field: "valueY".into(),
        };
        assert_eq!(
            err.to_string(),
            "series `sales`: required data field `valueY` is not mapped"
        );
    }

    #[test]
    fn test_mismatch_display_names_axis_kind() {
        let err = ChartError::AxisFieldMismatch {
            series: "s".into(),
            field: "categoryX".into(),
            expected: AxisField::Value,
        };
        assert!(err.to_string().contains("Value"));
    }
}
