//! Reveal: one-shot hidden to shown transition on first visibility

use std::time::Duration;

use scrollfx_core::TargetId;

use crate::surface::Mutation;
use crate::viewport::ViewportEvent;

#[derive(Debug, Default)]
pub(crate) struct RevealState {
    revealed: bool,
}

impl RevealState {
    pub(crate) fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Reveal on the first enter event; everything afterwards is ignored
    pub(crate) fn on_event(
        &mut self,
        target: &TargetId,
        delay_ms: u64,
        event: &ViewportEvent,
    ) -> Option<Mutation> {
        if self.revealed || !matches!(event, ViewportEvent::Enter { .. }) {
            return None;
        }
        self.revealed = true;
        Some(Mutation::Reveal {
            target: target.clone(),
            delay: Duration::from_millis(delay_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_once() {
        let id = TargetId::new("legacy");
        let enter = ViewportEvent::Enter {
            target: id.clone(),
            ratio: 0.4,
            first: true,
        };
        let exit = ViewportEvent::Exit { target: id.clone() };

        let mut state = RevealState::default();
        assert!(state.on_event(&id, 0, &exit).is_none());
        assert_eq!(
            state.on_event(&id, 100, &enter),
            Some(Mutation::Reveal {
                target: id.clone(),
                delay: Duration::from_millis(100),
            })
        );
        assert!(state.is_revealed());
        assert!(state.on_event(&id, 100, &exit).is_none());
        assert!(state.on_event(&id, 100, &enter).is_none());
    }
}
