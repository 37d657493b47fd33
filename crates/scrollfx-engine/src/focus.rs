//! Modal dialogs with a keyboard focus trap

use scrollfx_core::TargetId;
use tracing::debug;

use crate::listeners::{Disposer, ListenerKind, Listeners};

/// Focus queries and moves performed by the host
pub trait FocusHost {
    fn focused(&self) -> Option<TargetId>;

    fn focus(&mut self, target: &TargetId);

    /// Whether the element is still part of the page
    fn exists(&self, target: &TargetId) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// What a key press did to an open dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Left to the host's default handling
    Ignored,
    /// Focus wrapped; the host suppresses its default tab move
    Wrapped,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Button,
    Escape,
    Backdrop,
}

/// A modal dialog that keeps keyboard focus inside while open
#[derive(Debug)]
pub struct ModalDialog {
    focusables: Vec<TargetId>,
    restore: Option<TargetId>,
    escape: Option<Disposer>,
    listeners: Listeners,
}

impl ModalDialog {
    pub fn new(listeners: Listeners) -> Self {
        Self {
            focusables: Vec::new(),
            restore: None,
            escape: None,
            listeners,
        }
    }

    pub fn is_open(&self) -> bool {
        self.escape.is_some()
    }

    /// Open with the dialog's focusable elements in tab order
    ///
    /// Remembers the element focused before opening and focuses the first
    /// focusable element. Reopening refreshes the focusable list only.
    pub fn open(&mut self, focusables: Vec<TargetId>, host: &mut dyn FocusHost) {
        self.focusables = focusables;
        if self.is_open() {
            return;
        }
        self.restore = host.focused();
        if let Some(first) = self.focusables.first() {
            host.focus(first);
        }
        self.escape = Some(self.listeners.listen(ListenerKind::KeyDown, "modal-escape"));
        debug!("Modal opened with {} focusable elements", self.focusables.len());
    }

    pub fn handle_key(&mut self, press: KeyPress, host: &mut dyn FocusHost) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        match press.key {
            Key::Escape => {
                self.close(CloseReason::Escape, host);
                KeyOutcome::Closed
            }
            Key::Tab => self.wrap_tab(press.shift, host),
            Key::Other => KeyOutcome::Ignored,
        }
    }

    fn wrap_tab(&self, backwards: bool, host: &mut dyn FocusHost) -> KeyOutcome {
        let (Some(first), Some(last)) = (self.focusables.first(), self.focusables.last()) else {
            return KeyOutcome::Ignored;
        };
        let current = host.focused();
        if backwards && current.as_ref() == Some(first) {
            host.focus(last);
            KeyOutcome::Wrapped
        } else if !backwards && current.as_ref() == Some(last) {
            host.focus(first);
            KeyOutcome::Wrapped
        } else {
            KeyOutcome::Ignored
        }
    }

    /// Close and give focus back to the element focused before opening,
    /// if it still exists
    pub fn close(&mut self, reason: CloseReason, host: &mut dyn FocusHost) {
        let Some(escape) = self.escape.take() else {
            return;
        };
        escape.dispose();
        debug!("Modal closed ({:?})", reason);

        if let Some(previous) = self.restore.take() {
            if host.exists(&previous) {
                host.focus(&previous);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Page {
        elements: Vec<TargetId>,
        focused: Option<TargetId>,
    }

    impl FocusHost for Page {
        fn focused(&self) -> Option<TargetId> {
            self.focused.clone()
        }

        fn focus(&mut self, target: &TargetId) {
            self.focused = Some(target.clone());
        }

        fn exists(&self, target: &TargetId) -> bool {
            self.elements.contains(target)
        }
    }

    fn ids(names: &[&str]) -> Vec<TargetId> {
        names.iter().map(|n| TargetId::new(*n)).collect()
    }

    #[test]
    fn test_tab_wraps_inside_dialog() {
        let listeners = Listeners::new();
        let mut page = Page {
            elements: ids(&["album-card", "A", "B", "C"]),
            focused: Some(TargetId::new("album-card")),
        };
        let mut modal = ModalDialog::new(listeners.clone());
        modal.open(ids(&["A", "B", "C"]), &mut page);
        assert_eq!(page.focused, Some(TargetId::new("A")));

        page.focused = Some(TargetId::new("C"));
        assert_eq!(modal.handle_key(KeyPress::new(Key::Tab), &mut page), KeyOutcome::Wrapped);
        assert_eq!(page.focused, Some(TargetId::new("A")));

        assert_eq!(
            modal.handle_key(KeyPress::shifted(Key::Tab), &mut page),
            KeyOutcome::Wrapped
        );
        assert_eq!(page.focused, Some(TargetId::new("C")));

        page.focused = Some(TargetId::new("B"));
        assert_eq!(modal.handle_key(KeyPress::new(Key::Tab), &mut page), KeyOutcome::Ignored);
        assert_eq!(modal.handle_key(KeyPress::new(Key::Other), &mut page), KeyOutcome::Ignored);
        assert_eq!(page.focused, Some(TargetId::new("B")));
    }

    #[test]
    fn test_escape_closes_and_restores_focus() {
        let listeners = Listeners::new();
        let mut page = Page {
            elements: ids(&["album-card", "close"]),
            focused: Some(TargetId::new("album-card")),
        };
        let mut modal = ModalDialog::new(listeners.clone());
        modal.open(ids(&["close"]), &mut page);
        assert!(listeners.is_listening(ListenerKind::KeyDown));

        assert_eq!(modal.handle_key(KeyPress::new(Key::Escape), &mut page), KeyOutcome::Closed);
        assert!(!modal.is_open());
        assert!(!listeners.is_listening(ListenerKind::KeyDown));
        assert_eq!(page.focused, Some(TargetId::new("album-card")));

        assert_eq!(modal.handle_key(KeyPress::new(Key::Escape), &mut page), KeyOutcome::Ignored);
    }

    #[test]
    fn test_close_skips_removed_element() {
        let mut page = Page {
            elements: ids(&["close"]),
            focused: Some(TargetId::new("gone")),
        };
        let mut modal = ModalDialog::new(Listeners::new());
        modal.open(ids(&["close"]), &mut page);
        modal.close(CloseReason::Backdrop, &mut page);
        assert_eq!(page.focused, Some(TargetId::new("close")));
    }
}
