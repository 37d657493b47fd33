//! Visual effects bound to page elements
//!
//! Continuous effects (parallax, progress bar, magnetic hover, scroll
//! classes) run every frame in registration order. Effects that offset an
//! element contribute to a single translate per element per frame. Reveals
//! are one-shot and run from the viewport events drained at the end of the
//! frame.

pub mod magnetic;
pub mod parallax;
pub mod progress;
mod registry;
mod reveal;
mod scroll_class;

use std::collections::HashMap;

use scrollfx_core::TargetId;
use thiserror::Error;

use crate::pointer::PointerState;
use crate::scroll::ScrollState;
use crate::surface::{Rect, Viewport};

pub use registry::{EffectFailure, EffectRegistry};
pub use scrollfx_core::{EffectBinding, EffectKind, EffectParams};

/// Failure of a single effect handler for a single frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    #[error("Target not measured: {0}")]
    MissingTarget(TargetId),

    #[error("Surface rejected mutation: {0}")]
    Surface(String),
}

/// Element rects read during the measure phase of a frame
pub type Measurements = HashMap<TargetId, Rect>;

/// Read-only frame inputs handed to every handler
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub scroll: ScrollState,
    pub pointer: PointerState,
    pub viewport: Viewport,
    /// Seconds since the previous frame
    pub dt: f64,
    pub rects: &'a Measurements,
}

impl FrameContext<'_> {
    pub fn rect(&self, target: &TargetId) -> Result<Rect, EffectError> {
        self.rects
            .get(target)
            .copied()
            .ok_or_else(|| EffectError::MissingTarget(target.clone()))
    }
}
