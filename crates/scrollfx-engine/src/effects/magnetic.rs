//! Magnetic hover: an element drifts toward the pointer while it hovers
//! and springs back when it leaves
//!
//! Each goal change starts a fresh tween from wherever the element is, so
//! the most recent pointer position always wins.

use std::time::Duration;

use scrollfx_core::TargetId;

use super::{EffectError, FrameContext};
use crate::scroll::timing::{ease, is_complete, lerp, progress, step_duration};
use crate::scroll::EasingType;
use crate::surface::Rect;

/// Easing of the follow and return tweens
const MAGNETIC_EASING: EasingType = EasingType::Quad;

/// Offset the element aims for with the pointer at `(x, y)`
pub fn attraction_offset(rect: &Rect, x: f64, y: f64, attraction: f64) -> (f64, f64) {
    let (cx, cy) = rect.center();
    ((x - cx) * attraction, (y - cy) * attraction)
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: (f64, f64),
    to: (f64, f64),
    elapsed: Duration,
    duration: Duration,
}

impl Tween {
    fn sample(&self) -> (f64, f64) {
        let t = ease(MAGNETIC_EASING, progress(self.elapsed, self.duration));
        (
            lerp(self.from.0, self.to.0, t),
            lerp(self.from.1, self.to.1, t),
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct MagneticState {
    offset: (f64, f64),
    goal: (f64, f64),
    tween: Option<Tween>,
}

impl MagneticState {
    /// Current hover offset of the target; the registry merges and writes it
    pub(crate) fn update(
        &mut self,
        target: &TargetId,
        attraction: f64,
        duration_ms: u64,
        ctx: &FrameContext<'_>,
    ) -> Result<(f64, f64), EffectError> {
        let rect = ctx.rect(target)?;
        let pointer = ctx.pointer;

        let goal = if pointer.active && rect.contains(pointer.x, pointer.y) {
            attraction_offset(&rect, pointer.x, pointer.y, attraction)
        } else {
            (0.0, 0.0)
        };

        if goal != self.goal {
            self.goal = goal;
            self.tween = Some(Tween {
                from: self.offset,
                to: goal,
                elapsed: Duration::ZERO,
                duration: Duration::from_millis(duration_ms),
            });
        }

        if let Some(mut tween) = self.tween.take() {
            tween.elapsed += step_duration(ctx.dt);
            self.offset = tween.sample();
            if is_complete(tween.elapsed, tween.duration) {
                self.offset = tween.to;
            } else {
                self.tween = Some(tween);
            }
        }
        Ok(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attraction_offset() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        let (x, y) = attraction_offset(&rect, 300.0, 150.0, 0.15);
        assert!((x - 15.0).abs() < 1e-9);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_tween_eases_toward_goal() {
        let tween = Tween {
            from: (0.0, 0.0),
            to: (10.0, -10.0),
            elapsed: Duration::from_millis(150),
            duration: Duration::from_millis(300),
        };
        let (x, y) = tween.sample();
        // Quadratic ease-out is past the midpoint at half time
        assert!((x - 7.5).abs() < 1e-9);
        assert!((y + 7.5).abs() < 1e-9);
    }
}
