//! Time calculation utilities for frame-driven animations
//!
//! Animations advance by the frame step handed to them rather than by
//! reading a clock, so a tick is a pure function of its inputs.

use std::time::Duration;

use scrollfx_core::EasingType;

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(elapsed: Duration, duration: Duration) -> bool {
    elapsed >= duration
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Eased progress for a linear progress `t`, clamped to [0, 1]
#[inline]
pub fn ease(easing: EasingType, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        EasingType::Linear => t,
        EasingType::Quad => t * (2.0 - t),
        EasingType::EaseOut => (1.001 - (-10.0 * t).exp2()).min(1.0),
    }
}

/// Fraction of the remaining distance covered by one exponential smoothing
/// step of `dt` seconds at `rate` per second
#[inline]
pub fn smoothing_factor(dt: f64, rate: f64) -> f64 {
    (dt * rate).clamp(0.0, 1.0)
}

/// Convert a frame step in seconds into a Duration, ignoring negative steps
#[inline]
pub fn step_duration(dt: f64) -> Duration {
    Duration::from_secs_f64(dt.max(0.0))
}
