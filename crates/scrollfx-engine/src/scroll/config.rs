//! Configuration types for smooth scrolling
//!
//! Re-exports configuration from scrollfx-core and provides additional utilities.

use std::f64::consts::LN_2;
use std::time::Duration;

// Re-export config types from core
pub use scrollfx_core::{EasingType, ScrollConfig};

/// Extension trait for ScrollConfig with utility methods
pub trait ScrollConfigExt {
    /// Get animation duration as Duration
    fn animation_duration(&self) -> Duration;

    /// Get tick duration for the frame driver
    fn animation_tick_duration(&self) -> Duration;

    /// Largest frame step in seconds handed to the engine
    fn max_frame_step(&self) -> f64;

    /// Exponential smoothing rate (1/s) for passive scroll tracking
    fn effective_smoothing_rate(&self) -> f64;

    /// Check if smooth scrolling is effectively enabled
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    #[inline]
    fn max_frame_step(&self) -> f64 {
        Duration::from_millis(self.max_frame_ms).as_secs_f64()
    }

    /// The exponential ease-out reaches 2^-10 of the remaining distance at
    /// the end of the configured duration; passive tracking uses the same
    /// decay constant.
    fn effective_smoothing_rate(&self) -> f64 {
        if let Some(rate) = self.smoothing_rate {
            return rate.max(0.0);
        }
        let secs = self.animation_duration().as_secs_f64();
        if secs <= 0.0 {
            f64::INFINITY
        } else {
            10.0 * LN_2 / secs
        }
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScrollConfig::default();
        assert!(config.smooth_enabled);
        assert_eq!(config.animation_duration_ms, 1200);
        assert_eq!(config.easing, EasingType::EaseOut);
        assert_eq!(config.wheel_multiplier, 1.0);
        assert_eq!(config.touch_multiplier, 1.5);
        assert_eq!(config.animation_fps, 60);
    }

    #[test]
    fn test_derived_smoothing_rate() {
        let config = ScrollConfig::default();
        assert!((config.effective_smoothing_rate() - 5.776).abs() < 0.01);

        let config = ScrollConfig {
            smoothing_rate: Some(5.0),
            ..Default::default()
        };
        assert_eq!(config.effective_smoothing_rate(), 5.0);
    }

    #[test]
    fn test_is_smooth() {
        let mut config = ScrollConfig::default();
        assert!(config.is_smooth());

        config.smooth_enabled = false;
        assert!(!config.is_smooth());

        config.smooth_enabled = true;
        config.animation_duration_ms = 0;
        assert!(!config.is_smooth());
    }

    #[test]
    fn test_tick_duration() {
        let config = ScrollConfig {
            animation_fps: 0,
            ..Default::default()
        };
        assert_eq!(config.animation_tick_duration(), Duration::from_millis(16));
        assert!((config.max_frame_step() - 0.1).abs() < 1e-9);
    }
}
