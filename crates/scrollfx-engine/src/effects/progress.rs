//! Progress bar: width tracks the page's global scroll progress

use scrollfx_core::TargetId;

use super::FrameContext;
use crate::surface::Mutation;

/// Width percentage for a scroll progress value
#[inline]
pub fn width_percent(progress: f64) -> f64 {
    (progress * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Default)]
pub(crate) struct ProgressState {
    last: Option<f64>,
}

impl ProgressState {
    pub(crate) fn invalidate(&mut self) {
        self.last = None;
    }

    pub(crate) fn update(&mut self, target: &TargetId, ctx: &FrameContext<'_>) -> Option<Mutation> {
        let percent = width_percent(ctx.scroll.progress);
        if self.last == Some(percent) {
            return None;
        }
        self.last = Some(percent);
        Some(Mutation::Width {
            target: target.clone(),
            percent,
        })
    }
}
