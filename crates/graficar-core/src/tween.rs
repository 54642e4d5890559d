//! Working-value tweens.
//!
//! The engine has no clock. A [`Tween`] records a from/to pair and the host
//! advances its normalized progress each frame, reading back the interpolated
//! value into a working value or working location. Handles are cancellable;
//! a new validation pass never cancels a running tween on its own — callers
//! stop a prior tween explicitly before starting a replacement (category-axis
//! re-sort does exactly this).

use serde::{Deserialize, Serialize};

/// Easing applied to normalized tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Quadratic ease out (slow end)
    EaseOut,
    /// Cubic ease out
    CubicOut,
    /// Ease in and out
    EaseInOut,
}

impl Easing {
    /// Apply the easing to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// A cancellable value transition driven by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    /// Starting value
    pub from: f64,
    /// Target value
    pub to: f64,
    /// Normalized progress in `[0, 1]`
    pub progress: f64,
    /// Easing function
    pub easing: Easing,
    /// Cancelled by the owner; the host skips stopped tweens
    pub stopped: bool,
}

impl Tween {
    /// Start a new tween from `from` to `to`.
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            progress: 0.0,
            easing: Easing::default(),
            stopped: false,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub const fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Advance progress by a normalized delta, clamping at completion.
    pub fn advance(&mut self, delta: f64) {
        if self.stopped {
            return;
        }
        self.progress = (self.progress + delta).clamp(0.0, 1.0);
    }

    /// Current interpolated value.
    #[must_use]
    pub fn value(&self) -> f64 {
        let t = self.easing.apply(self.progress);
        (self.to - self.from).mul_add(t, self.from)
    }

    /// Whether the tween has reached its target.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stopped || self.progress >= 1.0
    }

    /// Cancel the tween. The value freezes where it is.
    pub fn stop(&mut self) {
        self.stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_endpoints() {
        let mut tween = Tween::new(2.0, 10.0);
        assert_eq!(tween.value(), 2.0);
        tween.advance(1.0);
        assert_eq!(tween.value(), 10.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_tween_linear_midpoint() {
        let mut tween = Tween::new(0.0, 8.0);
        tween.advance(0.5);
        assert_eq!(tween.value(), 4.0);
    }

    #[test]
    fn test_tween_stop_freezes() {
        let mut tween = Tween::new(0.0, 10.0);
        tween.advance(0.3);
        tween.stop();
        let frozen = tween.value();
        tween.advance(0.5);
        assert_eq!(tween.value(), frozen);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_easing_monotone_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::CubicOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
    }
}
