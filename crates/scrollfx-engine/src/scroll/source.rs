//! Scroll source: the single authoritative scroll position per frame
//!
//! Raw positions reported by user input are tracked passively with
//! exponential smoothing. `scroll_to` requests run an eased transition that
//! takes precedence over passive tracking until it completes, is superseded
//! by a newer request, or is interrupted by user input.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use scrollfx_core::{Error, TargetId};
use tokio::sync::oneshot;
use tracing::debug;

use crate::surface::Layout;

use super::config::{ScrollConfig, ScrollConfigExt};
use super::config::EasingType;
use super::timing::{ease, is_complete, lerp, progress, smoothing_factor, step_duration};

/// Distance below which the smoothed position settles onto its target
pub const SETTLE_EPSILON: f64 = 0.01;

/// Scroll state published once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    /// Smoothed scroll position, within `[0, range]`
    pub position: f64,
    /// Position change per second over the last frame
    pub velocity: f64,
    /// `position / range`, 0 when there is nothing to scroll
    pub progress: f64,
}

/// How a `scroll_to` request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Completed,
    /// Superseded by a newer request or interrupted by user input
    Cancelled,
}

/// Completion signal of a `scroll_to` request
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<ScrollOutcome>,
}

impl Completion {
    fn pair() -> (oneshot::Sender<ScrollOutcome>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Outcome if the request already finished
    pub fn try_outcome(&mut self) -> Option<ScrollOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            // The source was dropped mid-transition
            Err(oneshot::error::TryRecvError::Closed) => Some(ScrollOutcome::Cancelled),
        }
    }

    /// Wait for the request to finish
    pub async fn wait(self) -> ScrollOutcome {
        self.rx.await.unwrap_or(ScrollOutcome::Cancelled)
    }
}

/// Active eased transition
#[derive(Debug)]
struct Transition {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
    easing: EasingType,
    done: oneshot::Sender<ScrollOutcome>,
}

impl Transition {
    fn finish(self, outcome: ScrollOutcome) {
        // Receiver may have been dropped by a caller that does not care
        let _ = self.done.send(outcome);
    }
}

/// Smoothed scroll position provider
#[derive(Debug)]
pub struct ScrollSource {
    config: ScrollConfig,
    /// Cached smoothing rate derived from the config
    rate: f64,
    /// Latest raw position reported by input, clamped to the range
    raw: f64,
    /// Smoothed position
    smoothed: f64,
    /// Scrollable range (content height minus viewport height)
    range: f64,
    state: ScrollState,
    transition: Option<Transition>,
}

impl Default for ScrollSource {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollSource {
    /// Create a new scroll source with configuration
    pub fn new(config: ScrollConfig) -> Self {
        let rate = config.effective_smoothing_rate();
        Self {
            config,
            rate,
            raw: 0.0,
            smoothed: 0.0,
            range: 0.0,
            state: ScrollState::default(),
            transition: None,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Get current configuration
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// State published by the last tick
    #[inline]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Latest raw position
    #[inline]
    pub fn raw(&self) -> f64 {
        self.raw
    }

    #[inline]
    pub fn range(&self) -> f64 {
        self.range
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Update the scrollable range, clamping positions into it
    ///
    /// A running transition keeps its timing but both of its endpoints are
    /// pulled into the new range.
    pub fn set_range(&mut self, range: f64) {
        self.range = if range.is_finite() { range.max(0.0) } else { 0.0 };
        self.raw = self.clamp(self.raw);
        self.smoothed = self.clamp(self.smoothed);
        let range = self.range;
        if let Some(transition) = self.transition.as_mut() {
            transition.from = transition.from.clamp(0.0, range);
            transition.to = transition.to.clamp(0.0, range);
        }
    }

    #[inline]
    fn clamp(&self, position: f64) -> f64 {
        position.clamp(0.0, self.range)
    }

    /// Advance one frame toward `raw` and publish the new state
    ///
    /// While a `scroll_to` transition is running the transition drives the
    /// position and `raw` is ignored; report user input through
    /// [`ScrollSource::user_scroll`] to interrupt it.
    pub fn tick(&mut self, raw: f64, dt: f64) -> ScrollState {
        let previous = self.smoothed;

        if let Some(mut transition) = self.transition.take() {
            transition.elapsed += step_duration(dt);
            let t = progress(transition.elapsed, transition.duration);
            let eased = lerp(transition.from, transition.to, ease(transition.easing, t));
            self.smoothed = self.clamp(eased);

            if is_complete(transition.elapsed, transition.duration) {
                self.smoothed = self.clamp(transition.to);
                self.raw = self.smoothed;
                debug!("Scroll transition reached {}", transition.to);
                transition.finish(ScrollOutcome::Completed);
            } else {
                self.transition = Some(transition);
            }
        } else {
            self.raw = self.clamp(raw);
            if self.config.smooth_enabled {
                let alpha = smoothing_factor(dt, self.rate);
                self.smoothed += (self.raw - self.smoothed) * alpha;
                if (self.raw - self.smoothed).abs() < SETTLE_EPSILON {
                    self.smoothed = self.raw;
                }
            } else {
                self.smoothed = self.raw;
            }
        }

        self.state = ScrollState {
            position: self.smoothed,
            velocity: if dt > 0.0 {
                (self.smoothed - previous) / dt
            } else {
                0.0
            },
            progress: if self.range > 0.0 {
                (self.smoothed / self.range).clamp(0.0, 1.0)
            } else {
                0.0
            },
        };
        self.state
    }

    /// Advance one frame toward the last reported raw position
    #[inline]
    pub fn advance(&mut self, dt: f64) -> ScrollState {
        self.tick(self.raw, dt)
    }

    /// Report a user scroll to an absolute raw position
    ///
    /// Interrupts any running transition; tracking resumes from the
    /// position the transition had reached.
    pub fn user_scroll(&mut self, raw: f64) {
        if let Some(transition) = self.transition.take() {
            debug!("Scroll transition interrupted by user input at {}", self.smoothed);
            transition.finish(ScrollOutcome::Cancelled);
        }
        self.raw = self.clamp(raw);
    }

    /// Report a wheel delta
    pub fn wheel(&mut self, delta: f64) {
        let base = self.input_base();
        self.user_scroll(base + delta * self.config.wheel_multiplier);
    }

    /// Report a touch drag delta
    pub fn touch(&mut self, delta: f64) {
        let base = self.input_base();
        self.user_scroll(base + delta * self.config.touch_multiplier);
    }

    /// Relative input during a transition continues from where it is now
    fn input_base(&self) -> f64 {
        if self.transition.is_some() {
            self.smoothed
        } else {
            self.raw
        }
    }

    /// Start an eased transition to `target` over `duration_ms`
    ///
    /// A running transition is cancelled first. With nothing to scroll the
    /// request completes immediately without moving.
    pub fn scroll_to(&mut self, target: f64, duration_ms: u64) -> Completion {
        let (tx, completion) = Completion::pair();
        self.cancel();

        if self.range <= 0.0 {
            debug!("scroll_to({}) ignored: nothing to scroll", target);
            let _ = tx.send(ScrollOutcome::Completed);
            return completion;
        }

        let to = self.clamp(target);
        if !self.config.smooth_enabled || duration_ms == 0 || (to - self.smoothed).abs() < SETTLE_EPSILON {
            self.smoothed = to;
            self.raw = to;
            let _ = tx.send(ScrollOutcome::Completed);
            return completion;
        }

        self.transition = Some(Transition {
            from: self.smoothed,
            to,
            elapsed: Duration::ZERO,
            duration: Duration::from_millis(duration_ms),
            easing: self.config.easing,
            done: tx,
        });
        completion
    }

    /// Start a transition using the configured duration
    pub fn scroll_to_default(&mut self, target: f64) -> Completion {
        let duration_ms = self.config.animation_duration_ms;
        self.scroll_to(target, duration_ms)
    }

    /// Cancel any running transition and stop at the current position
    pub fn cancel(&mut self) {
        if let Some(transition) = self.transition.take() {
            self.raw = self.smoothed;
            transition.finish(ScrollOutcome::Cancelled);
        }
    }
}

/// Shared handle to the engine's scroll source
///
/// Components that trigger scrolling receive a clone of this handle
/// instead of reaching for a global. Use it from event callbacks, never
/// from inside an effect handler during a tick.
#[derive(Debug, Clone)]
pub struct ScrollHandle {
    inner: Rc<RefCell<ScrollSource>>,
}

impl ScrollHandle {
    pub fn new(source: ScrollSource) -> Self {
        Self {
            inner: Rc::new(RefCell::new(source)),
        }
    }

    pub fn scroll_to(&self, target: f64, duration_ms: u64) -> Completion {
        self.inner.borrow_mut().scroll_to(target, duration_ms)
    }

    pub fn scroll_to_default(&self, target: f64) -> Completion {
        self.inner.borrow_mut().scroll_to_default(target)
    }

    /// Scroll to the element's top edge shifted by `offset` pixels
    ///
    /// A negative offset leaves that much room above the element, e.g. for a
    /// fixed header.
    pub fn scroll_to_target(
        &self,
        target: &TargetId,
        layout: &dyn Layout,
        offset: f64,
        duration_ms: u64,
    ) -> scrollfx_core::Result<Completion> {
        let rect = layout
            .rect(target)
            .ok_or_else(|| Error::MissingTarget(target.clone()))?;
        let mut source = self.inner.borrow_mut();
        let destination = source.state().position + rect.top + offset;
        debug!("Scrolling to {} at {}", target, destination);
        Ok(source.scroll_to(destination, duration_ms))
    }

    pub fn state(&self) -> ScrollState {
        self.inner.borrow().state()
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut ScrollSource) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}
