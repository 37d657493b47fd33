//! Viewport visibility tracking
//!
//! Entries can be fed intersection ratios directly by a host that has a
//! native intersection source, or computed from layout rects once per
//! frame with [`ViewportObserver::evaluate`]. Transitions are queued as
//! events and drained at the end of the frame.

use scrollfx_core::TargetId;
use tracing::debug;

use crate::surface::{Layout, Rect};

/// Visibility record for one observed element
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportEntry {
    pub target: TargetId,
    pub is_intersecting: bool,
    /// Set on the event that first made the entry intersecting
    pub first_trigger: bool,
    /// Visible fraction of the element's area
    pub ratio: f64,
    threshold: f64,
    /// Pixels added around the viewport for this entry, `None` for the
    /// observer default
    margin: Option<f64>,
    once: bool,
    seen: bool,
    settled: bool,
}

impl ViewportEntry {
    fn new(target: TargetId, threshold: f64, once: bool) -> Self {
        Self {
            target,
            is_intersecting: false,
            first_trigger: false,
            ratio: 0.0,
            threshold: threshold.clamp(0.0, 1.0),
            margin: None,
            once,
            seen: false,
            settled: false,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn margin(&self) -> Option<f64> {
        self.margin
    }

    /// One-shot entry that already fired and ignores further changes
    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

/// Enter/exit transition of an observed element
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    Enter {
        target: TargetId,
        ratio: f64,
        first: bool,
    },
    Exit {
        target: TargetId,
    },
}

impl ViewportEvent {
    pub fn target(&self) -> &TargetId {
        match self {
            ViewportEvent::Enter { target, .. } | ViewportEvent::Exit { target } => target,
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewportObserver {
    entries: Vec<ViewportEntry>,
    pending: Vec<ViewportEvent>,
    /// Pixels added around the viewport when computing intersections
    root_margin: f64,
}

impl ViewportObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_margin(mut self, margin: f64) -> Self {
        self.root_margin = margin;
        self
    }

    /// Observe an element; returns false if it was already observed
    pub fn observe(&mut self, target: TargetId, threshold: f64) -> bool {
        self.insert(ViewportEntry::new(target, threshold, false))
    }

    /// Observe an element against the viewport grown by `margin` pixels
    /// on every side, so it counts as visible before it scrolls in
    pub fn observe_with_margin(&mut self, target: TargetId, threshold: f64, margin: f64) -> bool {
        let mut entry = ViewportEntry::new(target, threshold, false);
        entry.margin = Some(margin);
        self.insert(entry)
    }

    /// Observe an element until it first becomes visible
    pub fn observe_once(&mut self, target: TargetId, threshold: f64) -> bool {
        self.insert(ViewportEntry::new(target, threshold, true))
    }

    fn insert(&mut self, entry: ViewportEntry) -> bool {
        if self.entries.iter().any(|e| e.target == entry.target) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Stop observing an element and drop its queued events
    pub fn unobserve(&mut self, target: &TargetId) {
        self.entries.retain(|e| &e.target != target);
        self.pending.retain(|ev| ev.target() != target);
    }

    pub fn entry(&self, target: &TargetId) -> Option<&ViewportEntry> {
        self.entries.iter().find(|e| &e.target == target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a new intersection ratio for an element
    ///
    /// Queues an event when the intersecting state flips. Returns whether
    /// an event was queued. Settled one-shot entries ignore reports.
    pub fn report(&mut self, target: &TargetId, ratio: f64) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| &e.target == target) else {
            return false;
        };
        if entry.settled {
            return false;
        }

        entry.ratio = ratio.clamp(0.0, 1.0);
        let intersecting = entry.ratio > 0.0 && entry.ratio >= entry.threshold;
        if intersecting == entry.is_intersecting {
            return false;
        }
        entry.is_intersecting = intersecting;

        if intersecting {
            entry.first_trigger = !entry.seen;
            entry.seen = true;
            if entry.once {
                entry.settled = true;
            }
            debug!("{} entered viewport (ratio {:.2})", entry.target, entry.ratio);
            self.pending.push(ViewportEvent::Enter {
                target: entry.target.clone(),
                ratio: entry.ratio,
                first: entry.first_trigger,
            });
        } else {
            entry.first_trigger = false;
            self.pending.push(ViewportEvent::Exit {
                target: entry.target.clone(),
            });
        }
        true
    }

    /// Compute ratios for every observed element from layout
    ///
    /// Elements the layout no longer knows are treated as invisible.
    pub fn evaluate(&mut self, layout: &dyn Layout) {
        let viewport = layout.viewport().rect();
        let ratios: Vec<(TargetId, f64)> = self
            .entries
            .iter()
            .filter(|e| !e.settled)
            .map(|e| {
                let bounds = expand(viewport, e.margin.unwrap_or(self.root_margin));
                let ratio = layout
                    .rect(&e.target)
                    .map(|rect| intersection_ratio(&rect, &bounds))
                    .unwrap_or(0.0);
                (e.target.clone(), ratio)
            })
            .collect();

        for (target, ratio) in ratios {
            self.report(&target, ratio);
        }
    }

    /// Drain queued events in the order they happened
    pub fn take_events(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.pending)
    }
}

fn expand(rect: Rect, margin: f64) -> Rect {
    Rect::new(
        rect.left - margin,
        rect.top - margin,
        rect.width + margin * 2.0,
        rect.height + margin * 2.0,
    )
}

/// Visible fraction of `rect` inside `bounds`
///
/// A zero-area element counts as fully visible when it lies inside.
pub fn intersection_ratio(rect: &Rect, bounds: &Rect) -> f64 {
    let width = rect.right().min(bounds.right()) - rect.left.max(bounds.left);
    let height = rect.bottom().min(bounds.bottom()) - rect.top.max(bounds.top);
    if width < 0.0 || height < 0.0 {
        return 0.0;
    }
    let area = rect.area();
    if area <= 0.0 {
        return 1.0;
    }
    ((width * height) / area).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Viewport;
    use std::collections::HashMap;

    struct Page {
        rects: HashMap<TargetId, Rect>,
    }

    impl Layout for Page {
        fn viewport(&self) -> Viewport {
            Viewport::new(1000.0, 800.0)
        }

        fn scroll_extent(&self) -> f64 {
            0.0
        }

        fn rect(&self, target: &TargetId) -> Option<Rect> {
            self.rects.get(target).copied()
        }
    }

    #[test]
    fn test_intersection_ratio() {
        let bounds = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(intersection_ratio(&Rect::new(0.0, 700.0, 100.0, 200.0), &bounds), 0.5);
        assert_eq!(intersection_ratio(&Rect::new(0.0, 900.0, 100.0, 200.0), &bounds), 0.0);
        assert_eq!(intersection_ratio(&Rect::new(0.0, 10.0, 100.0, 100.0), &bounds), 1.0);
    }

    #[test]
    fn test_enter_exit_events() {
        let mut observer = ViewportObserver::new();
        let id = TargetId::new("gallery");
        observer.observe(id.clone(), 0.1);

        assert!(!observer.report(&id, 0.05));
        assert!(observer.report(&id, 0.2));
        assert!(observer.report(&id, 0.0));
        assert!(observer.report(&id, 0.5));

        let events = observer.take_events();
        assert_eq!(
            events,
            vec![
                ViewportEvent::Enter { target: id.clone(), ratio: 0.2, first: true },
                ViewportEvent::Exit { target: id.clone() },
                ViewportEvent::Enter { target: id.clone(), ratio: 0.5, first: false },
            ]
        );
        assert!(observer.take_events().is_empty());
    }

    #[test]
    fn test_once_entry_settles() {
        let mut observer = ViewportObserver::new();
        let id = TargetId::new("about");
        observer.observe_once(id.clone(), 0.1);

        assert!(observer.report(&id, 0.3));
        assert!(observer.entry(&id).unwrap().is_settled());
        assert!(!observer.report(&id, 0.0));
        assert!(!observer.report(&id, 1.0));
        assert_eq!(observer.take_events().len(), 1);
    }

    #[test]
    fn test_evaluate_from_layout() {
        let mut observer = ViewportObserver::new();
        let shows = TargetId::new("shows");
        let footer = TargetId::new("footer");
        observer.observe(shows.clone(), 0.1);
        observer.observe(footer.clone(), 0.1);

        let page = Page {
            rects: HashMap::from([
                (shows.clone(), Rect::new(0.0, 600.0, 1000.0, 400.0)),
                (footer.clone(), Rect::new(0.0, 2000.0, 1000.0, 300.0)),
            ]),
        };
        observer.evaluate(&page);

        assert!(observer.entry(&shows).unwrap().is_intersecting);
        assert!(!observer.entry(&footer).unwrap().is_intersecting);
        assert_eq!(observer.take_events().len(), 1);
    }

    #[test]
    fn test_margin_counts_elements_just_below_the_fold() {
        let mut observer = ViewportObserver::new();
        let image = TargetId::new("gallery-image");
        let card = TargetId::new("card");
        observer.observe_with_margin(image.clone(), 0.0, 100.0);
        observer.observe(card.clone(), 0.0);

        let below = Rect::new(0.0, 850.0, 300.0, 200.0);
        let mut page = Page {
            rects: HashMap::from([(image.clone(), below), (card.clone(), below)]),
        };
        observer.evaluate(&page);
        assert!(observer.entry(&image).unwrap().is_intersecting);
        assert!(!observer.entry(&card).unwrap().is_intersecting);

        // Beyond the margin again
        page.rects.insert(image.clone(), Rect::new(0.0, 950.0, 300.0, 200.0));
        observer.evaluate(&page);
        assert_eq!(
            observer.take_events(),
            vec![
                ViewportEvent::Enter { target: image.clone(), ratio: 0.25, first: true },
                ViewportEvent::Exit { target: image },
            ]
        );
    }

    #[test]
    fn test_unobserve_drops_pending() {
        let mut observer = ViewportObserver::new();
        let id = TargetId::new("hero");
        observer.observe(id.clone(), 0.0);
        observer.report(&id, 1.0);
        observer.unobserve(&id);
        assert!(observer.is_empty());
        assert!(observer.take_events().is_empty());
        assert!(!observer.report(&id, 1.0));
    }
}
