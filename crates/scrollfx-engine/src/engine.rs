//! Interaction engine: the composition root
//!
//! Owns the scroll source, the frame scheduler, the effect registry, the
//! viewport observer and the custom cursor, and runs them in a fixed order
//! every frame:
//!
//! 1. measure: viewport, scroll extent, effect rects and visibility are
//!    read from the [`Layout`]; nothing is written
//! 2. the scroll source advances
//! 3. continuous effects run in registration order, then the cursor
//! 4. one-shot viewport callbacks (reveals) run last, and every viewport
//!    event of the frame is handed back in the [`FrameReport`]
//!
//! Input reported while the engine is stopped is ignored.

use std::time::Duration;

use scrollfx_core::{AppConfig, EffectBinding, EffectParams, Error, TargetId};
use tracing::{debug, info, warn};

use crate::effects::{EffectFailure, EffectRegistry, FrameContext, Measurements};
use crate::frame::FrameScheduler;
use crate::listeners::{ListenerKind, ListenerScope, Listeners};
use crate::pointer::{CustomCursor, PointerState};
use crate::scroll::{Completion, ScrollHandle, ScrollSource, ScrollState};
use crate::surface::{Layout, Surface};
use crate::viewport::{ViewportEvent, ViewportObserver};

/// Host events the engine listens to while running
const INPUT_LISTENERS: [ListenerKind; 8] = [
    ListenerKind::Scroll,
    ListenerKind::Wheel,
    ListenerKind::Touch,
    ListenerKind::PointerMove,
    ListenerKind::PointerDown,
    ListenerKind::PointerUp,
    ListenerKind::PointerLeave,
    ListenerKind::Resize,
];

/// Outcome of one frame
///
/// The host scrolls the page to `scroll.position`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub dt: f64,
    pub scroll: ScrollState,
    pub failures: Vec<EffectFailure>,
    /// Visibility changes of every observed element, in order
    pub events: Vec<ViewportEvent>,
}

pub struct InteractionEngine {
    scroll: ScrollHandle,
    scheduler: FrameScheduler,
    registry: EffectRegistry,
    observer: ViewportObserver,
    pointer: PointerState,
    cursor: CustomCursor,
    listeners: Listeners,
    scope: ListenerScope,
    measurements: Measurements,
}

impl InteractionEngine {
    /// Create an engine; `touch_only` hosts keep the native cursor
    pub fn new(config: &AppConfig, touch_only: bool) -> Self {
        Self {
            scroll: ScrollHandle::new(ScrollSource::new(config.scroll.clone())),
            scheduler: FrameScheduler::new(&config.scroll),
            registry: EffectRegistry::new(),
            observer: ViewportObserver::new(),
            pointer: PointerState::default(),
            cursor: CustomCursor::new(config.cursor.clone(), touch_only),
            listeners: Listeners::new(),
            scope: ListenerScope::new(),
            measurements: Measurements::new(),
        }
    }

    /// Handle for components that trigger programmatic scrolling
    pub fn scroll_handle(&self) -> ScrollHandle {
        self.scroll.clone()
    }

    /// Listener table shared with components such as modal dialogs
    pub fn listeners(&self) -> Listeners {
        self.listeners.clone()
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn observer(&self) -> &ViewportObserver {
        &self.observer
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn cursor(&self) -> &CustomCursor {
        &self.cursor
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Register one binding whose elements must exist in `layout`
    pub fn register(&mut self, binding: EffectBinding, layout: &dyn Layout) -> scrollfx_core::Result<()> {
        if layout.rect(&binding.target).is_none() {
            return Err(Error::MissingTarget(binding.target));
        }
        if let EffectParams::Parallax {
            trigger: Some(trigger),
            ..
        } = &binding.params
        {
            if layout.rect(trigger).is_none() {
                return Err(Error::MissingTarget(trigger.clone()));
            }
        }

        let reveal = match &binding.params {
            EffectParams::Reveal { threshold, .. } => Some((binding.target.clone(), *threshold)),
            _ => None,
        };
        self.registry.register(binding)?;
        if let Some((target, threshold)) = reveal {
            self.observer.observe_once(target, threshold);
        }
        Ok(())
    }

    /// Register a declarative binding list, skipping bindings that fail
    ///
    /// Returns how many bindings were attached.
    pub fn attach<I>(&mut self, bindings: I, layout: &dyn Layout) -> usize
    where
        I: IntoIterator<Item = EffectBinding>,
    {
        let mut attached = 0;
        for binding in bindings {
            let label = format!("{} effect for {}", binding.kind(), binding.target);
            match self.register(binding, layout) {
                Ok(()) => attached += 1,
                Err(e) => warn!("Skipping {}: {}", label, e),
            }
        }
        info!("Attached {} effect bindings", attached);
        attached
    }

    /// Watch an element's visibility with the viewport grown by `margin`
    ///
    /// Enter and exit events show up in each frame's report. Returns false if
    /// the element is already observed.
    pub fn observe(&mut self, target: TargetId, threshold: f64, margin: f64) -> bool {
        self.observer.observe_with_margin(target, threshold, margin)
    }

    /// Start an eased scroll to an element, see [`ScrollHandle::scroll_to_target`]
    pub fn scroll_to_target(
        &self,
        target: &TargetId,
        layout: &dyn Layout,
        offset: f64,
        duration_ms: u64,
    ) -> scrollfx_core::Result<Completion> {
        self.scroll.scroll_to_target(target, layout, offset, duration_ms)
    }

    /// Remove every effect bound to `target`
    pub fn unregister(&mut self, target: &TargetId) -> usize {
        self.observer.unobserve(target);
        self.registry.unregister(target)
    }

    /// Start frames, hide the native cursor and attach input listeners
    pub fn start(&mut self, surface: &mut dyn Surface) {
        if !self.scheduler.start() {
            return;
        }
        if let Err(e) = self.cursor.install(surface) {
            warn!("Custom cursor unavailable: {}", e);
        }
        for kind in INPUT_LISTENERS {
            self.scope.add(self.listeners.listen(kind, "engine"));
        }
        info!("Interaction engine started");
    }

    /// Stop frames and release everything `start` acquired
    pub fn stop(&mut self, surface: &mut dyn Surface) {
        self.scheduler.stop();
        if let Err(e) = self.cursor.teardown(surface) {
            warn!("Failed to restore native cursor: {}", e);
        }
        self.scope.dispose_all();
        info!("Interaction engine stopped");
    }

    pub fn user_scroll(&mut self, raw: f64) {
        if self.accepts_input() {
            self.scroll.with(|source| source.user_scroll(raw));
        }
    }

    pub fn wheel(&mut self, delta: f64) {
        if self.accepts_input() {
            self.scroll.with(|source| source.wheel(delta));
        }
    }

    pub fn touch(&mut self, delta: f64) {
        if self.accepts_input() {
            self.scroll.with(|source| source.touch(delta));
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.accepts_input() {
            self.pointer.move_to(x, y);
        }
    }

    pub fn pointer_down(&mut self) {
        if self.accepts_input() {
            self.pointer.is_down = true;
        }
    }

    pub fn pointer_up(&mut self) {
        if self.accepts_input() {
            self.pointer.is_down = false;
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.accepts_input() {
            self.pointer.leave();
        }
    }

    /// Whether the element under the pointer is interactive
    pub fn pointer_over(&mut self, interactive: bool) {
        if self.accepts_input() {
            self.cursor.pointer_over(interactive);
        }
    }

    /// Input only counts while the engine's listeners are attached
    fn accepts_input(&self) -> bool {
        if self.is_running() {
            return true;
        }
        debug!("Ignoring input while stopped");
        false
    }

    /// Run one frame at host time `now`
    ///
    /// Returns `None` while the engine is stopped.
    pub fn tick(
        &mut self,
        now: Duration,
        layout: &dyn Layout,
        surface: &mut dyn Surface,
    ) -> Option<FrameReport> {
        let dt = self.scheduler.begin_frame(now)?;

        // Measure
        let viewport = layout.viewport();
        let range = layout.scroll_extent();
        self.measurements.clear();
        for target in self.registry.measured_targets() {
            if let Some(rect) = layout.rect(&target) {
                self.measurements.insert(target, rect);
            }
        }
        self.observer.evaluate(layout);

        let scroll = self.scroll.with(|source| {
            source.set_range(range);
            source.advance(dt)
        });

        // Mutate
        let ctx = FrameContext {
            scroll,
            pointer: self.pointer,
            viewport,
            dt,
            rects: &self.measurements,
        };
        let mut failures = self.registry.update(&ctx, surface);

        if let Err(e) = self.cursor.update(&self.pointer, surface) {
            warn!("Skipping cursor update this frame: {}", e);
        }

        let events = self.observer.take_events();
        if !events.is_empty() {
            debug!("Dispatching {} viewport events", events.len());
        }
        failures.extend(self.registry.dispatch_viewport(&events, surface));

        Some(FrameReport {
            dt,
            scroll,
            failures,
            events,
        })
    }
}
