//! Scroll-threshold classes: an element gains a class once the page is
//! scrolled past an offset and loses it on the way back

use scrollfx_core::{ScrollThreshold, TargetId};

use super::FrameContext;
use crate::surface::Mutation;

#[derive(Debug, Default)]
pub(crate) struct ScrollClassState {
    /// Last written state per threshold, `None` until first written
    applied: Vec<Option<bool>>,
}

impl ScrollClassState {
    pub(crate) fn invalidate(&mut self) {
        self.applied.clear();
    }

    pub(crate) fn update(
        &mut self,
        target: &TargetId,
        classes: &[ScrollThreshold],
        ctx: &FrameContext<'_>,
    ) -> Vec<Mutation> {
        self.applied.resize(classes.len(), None);

        let position = ctx.scroll.position;
        let mut writes = Vec::new();
        for (threshold, applied) in classes.iter().zip(self.applied.iter_mut()) {
            let enabled = position > threshold.above;
            if *applied == Some(enabled) {
                continue;
            }
            *applied = Some(enabled);
            writes.push(Mutation::Class {
                target: target.clone(),
                class: threshold.class.clone(),
                enabled,
            });
        }
        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Measurements;
    use crate::pointer::PointerState;
    use crate::scroll::ScrollState;
    use crate::surface::Viewport;

    fn header_classes() -> Vec<ScrollThreshold> {
        vec![
            ScrollThreshold::new("scrolled", 40.0),
            ScrollThreshold::new("shrink", 120.0),
        ]
    }

    fn enabled(writes: &[Mutation]) -> Vec<(&str, bool)> {
        writes
            .iter()
            .filter_map(|m| match m {
                Mutation::Class { class, enabled, .. } => Some((class.as_str(), *enabled)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_header_thresholds() {
        let rects = Measurements::new();
        let target = TargetId::new("header");
        let classes = header_classes();
        let mut state = ScrollClassState::default();
        let at = |position: f64, state: &mut ScrollClassState| {
            let ctx = FrameContext {
                scroll: ScrollState {
                    position,
                    ..Default::default()
                },
                pointer: PointerState::default(),
                viewport: Viewport::new(1200.0, 800.0),
                dt: 0.016,
                rects: &rects,
            };
            state.update(&target, &classes, &ctx)
        };

        // Initial state is written once
        assert_eq!(enabled(&at(0.0, &mut state)), vec![("scrolled", false), ("shrink", false)]);
        assert!(at(40.0, &mut state).is_empty());
        assert_eq!(enabled(&at(41.0, &mut state)), vec![("scrolled", true)]);
        assert_eq!(enabled(&at(121.0, &mut state)), vec![("shrink", true)]);
        assert!(at(500.0, &mut state).is_empty());
        assert_eq!(
            enabled(&at(10.0, &mut state)),
            vec![("scrolled", false), ("shrink", false)]
        );

        state.invalidate();
        assert_eq!(at(10.0, &mut state).len(), 2);
    }
}
