//! Horizontal carousels
//!
//! [`DragCarousel`] maps pointer and touch drags onto a horizontal scroll
//! offset. [`SlideDeck`] is the index model of a one-slide-at-a-time
//! carousel with swipe navigation.

use scrollfx_core::config::CarouselConfig;
use tracing::debug;

/// Drag state of a carousel
///
/// `is_dragging` implies `drag_anchor` is set for the same drag session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarouselState {
    pub scroll_offset: f64,
    pub drag_anchor: Option<f64>,
    pub is_dragging: bool,
}

/// Derived carousel phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselPhase {
    Idle,
    Dragging,
    /// Released between snap points; the host animates to `target`
    Snapping { target: f64 },
}

#[derive(Debug, Clone, Copy)]
struct TouchSession {
    anchor: f64,
    snapshot: f64,
}

#[derive(Debug)]
pub struct DragCarousel {
    state: CarouselState,
    snapshot: f64,
    touch: Option<TouchSession>,
    multiplier: f64,
    max_offset: Option<f64>,
    snap_interval: Option<f64>,
    snap_target: Option<f64>,
}

impl DragCarousel {
    pub fn new(config: &CarouselConfig) -> Self {
        Self {
            state: CarouselState::default(),
            snapshot: 0.0,
            touch: None,
            multiplier: config.drag_multiplier,
            max_offset: None,
            snap_interval: config.snap_interval.filter(|i| *i > 0.0),
            snap_target: None,
        }
    }

    /// Scrollable width reported by the host; offsets clamp to it
    pub fn set_max_offset(&mut self, max_offset: Option<f64>) {
        self.max_offset = max_offset.map(|m| m.max(0.0));
        self.state.scroll_offset = self.clamp(self.state.scroll_offset);
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    pub fn offset(&self) -> f64 {
        self.state.scroll_offset
    }

    pub fn phase(&self) -> CarouselPhase {
        if self.state.is_dragging || self.touch.is_some() {
            CarouselPhase::Dragging
        } else if let Some(target) = self.snap_target {
            CarouselPhase::Snapping { target }
        } else {
            CarouselPhase::Idle
        }
    }

    fn clamp(&self, offset: f64) -> f64 {
        match self.max_offset {
            Some(max) => offset.clamp(0.0, max),
            None => offset.max(0.0),
        }
    }

    fn drag_offset(&self, snapshot: f64, anchor: f64, x: f64) -> f64 {
        self.clamp(snapshot - (x - anchor) * self.multiplier)
    }

    pub fn pointer_down(&mut self, x: f64) {
        self.state.drag_anchor = Some(x);
        self.state.is_dragging = true;
        self.snapshot = self.state.scroll_offset;
        self.snap_target = None;
    }

    /// New offset while dragging, `None` when no drag is in progress
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        if !self.state.is_dragging {
            return None;
        }
        let anchor = self.state.drag_anchor?;
        self.state.scroll_offset = self.drag_offset(self.snapshot, anchor, x);
        Some(self.state.scroll_offset)
    }

    pub fn pointer_up(&mut self) -> CarouselPhase {
        self.release()
    }

    pub fn pointer_leave(&mut self) -> CarouselPhase {
        self.release()
    }

    fn release(&mut self) -> CarouselPhase {
        if self.state.is_dragging {
            self.state.is_dragging = false;
            self.state.drag_anchor = None;
            self.snap_target = self.snap_point();
        }
        self.phase()
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch = Some(TouchSession {
            anchor: x,
            snapshot: self.state.scroll_offset,
        });
        self.snap_target = None;
    }

    pub fn touch_move(&mut self, x: f64) -> Option<f64> {
        let session = self.touch?;
        self.state.scroll_offset = self.drag_offset(session.snapshot, session.anchor, x);
        Some(self.state.scroll_offset)
    }

    pub fn touch_end(&mut self) -> CarouselPhase {
        if self.touch.take().is_some() {
            self.snap_target = self.snap_point();
        }
        self.phase()
    }

    /// Step by a fixed distance, as the arrow buttons do
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.snap_target = None;
        self.state.scroll_offset = self.clamp(self.state.scroll_offset + delta);
        self.state.scroll_offset
    }

    /// Host finished animating to the snap point
    pub fn settle(&mut self) {
        if let Some(target) = self.snap_target.take() {
            debug!("Carousel settled at {:.1}", target);
            self.state.scroll_offset = target;
        }
    }

    fn snap_point(&self) -> Option<f64> {
        let interval = self.snap_interval?;
        let offset = self.state.scroll_offset;
        let target = self.clamp((offset / interval).round() * interval);
        (target != offset).then_some(target)
    }
}

/// Swipe direction on a slide deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Prev,
}

/// Index over a list of slides shown one at a time
#[derive(Debug)]
pub struct SlideDeck {
    len: usize,
    index: usize,
    swipe_threshold: f64,
    touch_start: Option<f64>,
}

impl SlideDeck {
    pub fn new(len: usize, config: &CarouselConfig) -> Self {
        Self {
            len,
            index: 0,
            swipe_threshold: config.swipe_threshold,
            touch_start: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }

    /// The visible set changed (e.g. a category filter); start over
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.index = 0;
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch_start = Some(x);
    }

    /// Finish a swipe, moving one slide when it travelled past the threshold
    pub fn touch_end(&mut self, x: f64) -> Option<Swipe> {
        let start = self.touch_start.take()?;
        let diff = start - x;
        if diff.abs() <= self.swipe_threshold {
            return None;
        }
        if diff > 0.0 {
            self.next();
            Some(Swipe::Next)
        } else {
            self.prev();
            Some(Swipe::Prev)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_moves_opposite_to_pointer() {
        let mut carousel = DragCarousel::new(&CarouselConfig::default());
        carousel.pointer_down(100.0);
        assert_eq!(carousel.phase(), CarouselPhase::Dragging);
        assert_eq!(carousel.pointer_move(80.0), Some(40.0));
        assert_eq!(carousel.pointer_up(), CarouselPhase::Idle);

        let state = carousel.state();
        assert_eq!(state.scroll_offset, 40.0);
        assert!(!state.is_dragging);
        assert_eq!(state.drag_anchor, None);

        // No momentum after release
        assert_eq!(carousel.pointer_move(0.0), None);
        assert_eq!(carousel.offset(), 40.0);
    }

    #[test]
    fn test_touch_uses_independent_anchor() {
        let mut carousel = DragCarousel::new(&CarouselConfig::default());
        carousel.scroll_by(100.0);
        carousel.touch_start(300.0);
        assert_eq!(carousel.touch_move(290.0), Some(120.0));
        assert_eq!(carousel.pointer_move(0.0), None);
        carousel.touch_end();
        assert_eq!(carousel.touch_move(0.0), None);
    }

    #[test]
    fn test_offset_clamps_to_host_width() {
        let mut carousel = DragCarousel::new(&CarouselConfig::default());
        carousel.set_max_offset(Some(150.0));
        carousel.pointer_down(0.0);
        assert_eq!(carousel.pointer_move(-500.0), Some(150.0));
        assert_eq!(carousel.pointer_move(500.0), Some(0.0));
        carousel.pointer_leave();
    }

    #[test]
    fn test_release_snaps_to_nearest_interval() {
        let config = CarouselConfig {
            snap_interval: Some(400.0),
            ..Default::default()
        };
        let mut carousel = DragCarousel::new(&config);
        carousel.pointer_down(500.0);
        carousel.pointer_move(350.0);
        assert_eq!(carousel.pointer_up(), CarouselPhase::Snapping { target: 400.0 });

        carousel.settle();
        assert_eq!(carousel.phase(), CarouselPhase::Idle);
        assert_eq!(carousel.offset(), 400.0);
    }

    #[test]
    fn test_slide_deck_wraps() {
        let mut deck = SlideDeck::new(3, &CarouselConfig::default());
        assert_eq!(deck.prev(), 2);
        assert_eq!(deck.next(), 0);
        assert_eq!(deck.next(), 1);

        deck.set_len(5);
        assert_eq!(deck.index(), 0);

        let mut empty = SlideDeck::new(0, &CarouselConfig::default());
        assert_eq!(empty.next(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_swipe_threshold() {
        let mut deck = SlideDeck::new(4, &CarouselConfig::default());

        deck.touch_start(200.0);
        assert_eq!(deck.touch_end(160.0), None);

        deck.touch_start(200.0);
        assert_eq!(deck.touch_end(120.0), Some(Swipe::Next));
        assert_eq!(deck.index(), 1);

        deck.touch_start(100.0);
        assert_eq!(deck.touch_end(151.0), Some(Swipe::Prev));
        assert_eq!(deck.index(), 0);

        assert_eq!(deck.touch_end(0.0), None);
    }
}
