//! L4 Atomic Layer: Pure easing curves for eased transitions
//!
//! Every curve maps progress in [0, 1] to eased progress in [0, 1].

use serde::{Deserialize, Serialize};

/// Easing curve applied to transition progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end at t = 1
    None,
    Linear,
    /// Cubic ease-out
    Cubic,
    /// Quintic ease-out
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// Quadratic ease-in-out, used by stepped auto-advance
    #[default]
    EaseInOutQuad,
    /// Cubic ease-in-out ("power2.inOut")
    EaseInOutCubic,
}

impl EasingType {
    /// Apply the easing curve to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::EaseInOutQuad => quad_ease_in_out(t),
            EasingType::EaseInOutCubic => cubic_ease_in_out(t),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// Quadratic ease-in-out: 2t² below one half, 1 - (-2t + 2)² / 2 above
#[inline]
pub fn quad_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

#[inline]
fn cubic_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}
