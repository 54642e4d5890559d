//! Series events the host drains after a validation pass.
//!
//! The engine has no pub-sub plumbing; it records what changed and the host
//! decides what to re-layout. Extremes events fire only when min/max actually
//! moved, so unchanged passes cause no redundant axis work.

use graficar_core::AxisId;
use serde::{Deserialize, Serialize};

/// Something a validation pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SeriesEvent {
    /// Total (whole-data) extremes moved on an axis.
    ExtremesChanged {
        /// Axis whose range is stale
        axis: AxisId,
    },
    /// Selection-scoped (visible window) extremes moved on an axis.
    SelectionExtremesChanged {
        /// Axis whose visible range is stale
        axis: AxisId,
    },
}
