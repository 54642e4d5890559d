//! Series data-to-visual mapping and layout engine for graficar.
//!
//! This crate takes sequences of abstract data records, binds them to axes,
//! computes derived values (stacking, percentages, running extremes), and
//! writes geometric primitives into visual elements a host renderer paints:
//! - [`DataItem`] and [`SeriesCore`]: per-record state and the aggregation
//!   pipeline
//! - [`XySeries`] / [`CartesianChart`]: axis binding, stacking, clustering,
//!   tooltip lookup
//! - [`ColumnSeries`], [`LineSeries`], [`CandlestickSeries`],
//!   [`HeatMapSeries`]: Cartesian layouts
//! - [`PieSeries`], [`FunnelSeries`], [`PyramidSeries`],
//!   [`PictorialStackedSeries`]: proportional layouts
//! - [`TreeMapSeries`]: hierarchical tiles

mod candlestick;
mod chart;
mod column;
mod data_item;
mod event;
mod funnel;
mod heatmap;
mod line;
mod percent;
mod pictorial;
mod pie;
mod pyramid;
mod series;
mod treemap;
mod value;
mod xy;

pub use candlestick::CandlestickSeries;
pub use chart::{CartesianChart, CartesianSeries, ErrorReporter, TooltipPoint};
pub use column::{ColumnSeries, ColumnStateStyle, ColumnStates};
pub use data_item::{DataItem, VisualSet, DEFAULT_LOCATION};
pub use event::SeriesEvent;
pub use funnel::{FunnelSeries, Orientation, ValueMode};
pub use heatmap::HeatMapSeries;
pub use line::{LineSegment, LineSeries};
pub use percent::PercentSeriesCore;
pub use pictorial::PictorialStackedSeries;
pub use pie::PieSeries;
pub use pyramid::PyramidSeries;
pub use series::{BulletTemplate, SeriesCore};
pub use treemap::{TreeMapNode, TreeMapSeries};
pub use value::{record, Calculated, DataValue, Record, ValueSlot};
pub use xy::{AxisRangeSpec, BaseAxis, SeriesKind, XySeries};
