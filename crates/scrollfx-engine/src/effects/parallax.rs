//! Parallax: vertical offset proportional to an element's passage
//! through the viewport

use scrollfx_core::TargetId;

use super::{EffectError, FrameContext};
use crate::scroll::timing::smoothing_factor;
use crate::scroll::SETTLE_EPSILON;
use crate::surface::Rect;

/// Local progress of an element through the viewport
///
/// 0 when its top edge reaches the viewport bottom, 1 when its bottom edge
/// leaves the viewport top.
pub fn local_progress(rect: &Rect, viewport_height: f64) -> f64 {
    let span = viewport_height + rect.height;
    if span <= 0.0 {
        return 0.0;
    }
    ((viewport_height - rect.top) / span).clamp(0.0, 1.0)
}

/// Vertical offset for a given speed factor and local progress
#[inline]
pub fn translate_y(speed: f64, viewport_height: f64, local_progress: f64) -> f64 {
    -(viewport_height * speed) * local_progress
}

/// Remaining lag after one scrub period, as a power of two
const SCRUB_HALVINGS: f64 = 10.0;

/// Smoothing rate (1/s) that lets the offset catch up within `scrub_ms`
pub fn scrub_rate(scrub_ms: u64) -> Option<f64> {
    if scrub_ms == 0 {
        return None;
    }
    Some(SCRUB_HALVINGS * std::f64::consts::LN_2 / (scrub_ms as f64 / 1000.0))
}

#[derive(Debug, Default)]
pub(crate) struct ParallaxState {
    /// Scrubbed local progress, `None` before the first frame
    progress: Option<f64>,
}

impl ParallaxState {
    /// Current offset of the target; the registry merges and writes it
    pub(crate) fn update(
        &mut self,
        speed: f64,
        trigger: &TargetId,
        scrub_ms: u64,
        ctx: &FrameContext<'_>,
    ) -> Result<(f64, f64), EffectError> {
        let rect = ctx.rect(trigger)?;
        let height = ctx.viewport.height;
        let goal = local_progress(&rect, height);

        let progress = match (self.progress, scrub_rate(scrub_ms)) {
            (Some(current), Some(rate)) => {
                let next = current + (goal - current) * smoothing_factor(ctx.dt, rate);
                let lag = translate_y(speed, height, (goal - next).abs());
                if lag.abs() < SETTLE_EPSILON {
                    goal
                } else {
                    next
                }
            }
            _ => goal,
        };
        self.progress = Some(progress);
        Ok((0.0, translate_y(speed, height, progress)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Measurements;
    use crate::pointer::PointerState;
    use crate::scroll::ScrollState;
    use crate::surface::Viewport;

    #[test]
    fn test_local_progress_bounds() {
        let vh = 800.0;
        // Top edge at viewport bottom
        assert_eq!(local_progress(&Rect::new(0.0, 800.0, 100.0, 400.0), vh), 0.0);
        // Bottom edge at viewport top
        assert_eq!(local_progress(&Rect::new(0.0, -400.0, 100.0, 400.0), vh), 1.0);
        // Halfway through
        assert_eq!(local_progress(&Rect::new(0.0, 200.0, 100.0, 400.0), vh), 0.5);
        // Below the fold
        assert_eq!(local_progress(&Rect::new(0.0, 5000.0, 100.0, 400.0), vh), 0.0);
    }

    fn frame(rects: &Measurements) -> FrameContext<'_> {
        FrameContext {
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
            viewport: Viewport::new(1200.0, 800.0),
            dt: 0.016,
            rects,
        }
    }

    #[test]
    fn test_scrub_lags_then_catches_up() {
        let id = TargetId::new("hero");
        let mut rects = Measurements::from([(id.clone(), Rect::new(0.0, 800.0, 100.0, 800.0))]);
        let mut state = ParallaxState::default();

        // First frame snaps to the measured progress
        assert_eq!(state.update(0.15, &id, 500, &frame(&rects)).unwrap(), (0.0, 0.0));

        // Trigger jumps to halfway through; the offset trails behind
        rects.insert(id.clone(), Rect::new(0.0, 0.0, 100.0, 800.0));
        let (_, first) = state.update(0.15, &id, 500, &frame(&rects)).unwrap();
        assert!(first < 0.0 && first > -60.0, "offset {} did not lag", first);

        let mut y = first;
        for _ in 0..60 {
            y = state.update(0.15, &id, 500, &frame(&rects)).unwrap().1;
        }
        assert!((y + 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_scrub_tracks_exactly() {
        let id = TargetId::new("bg");
        let rects = Measurements::from([(id.clone(), Rect::new(0.0, 0.0, 100.0, 800.0))]);
        let mut state = ParallaxState::default();
        let (x, y) = state.update(0.15, &id, 0, &frame(&rects)).unwrap();
        assert_eq!(x, 0.0);
        assert!((y + 60.0).abs() < 1e-9);
        assert_eq!(scrub_rate(0), None);
    }

    #[test]
    fn test_translate_y() {
        assert_eq!(translate_y(0.15, 800.0, 0.0), 0.0);
        assert!((translate_y(0.15, 800.0, 1.0) + 120.0).abs() < 1e-9);
        assert!((translate_y(0.15, 800.0, 0.5) + 60.0).abs() < 1e-9);
    }
}
