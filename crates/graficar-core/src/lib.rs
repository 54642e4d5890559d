//! Core types for the graficar charting engine.
//!
//! This crate provides the foundations the series engine builds on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`] with per-channel lerp
//! - Visual element contracts: [`RectElement`], [`LineElement`],
//!   [`ArcElement`], [`TrapezoidElement`], [`LabelElement`], [`BulletElement`]
//! - The axis contract: [`Axis`] and the concrete [`ValueAxis`],
//!   [`CategoryAxis`], [`DateAxis`] kinds
//! - Working-value tweens: [`Tween`], [`Easing`]
//! - The error taxonomy: [`ChartError`]

mod axis;
mod color;
mod element;
mod error;
mod geometry;
mod tween;

pub use axis::{AnyAxis, Axis, AxisField, AxisId, CategoryAxis, DateAxis, ValueAxis};
pub use color::Color;
pub use element::{
    ArcElement, BulletElement, LabelElement, LineElement, RectElement, TrapezoidElement,
};
pub use error::ChartError;
pub use geometry::{Point, Rect, Size};
pub use tween::{Easing, Tween};
