//! Scoped event listener bookkeeping
//!
//! Every listener a component attaches is represented by a [`Disposer`];
//! dropping or disposing it releases the listener. A [`ListenerScope`]
//! collects the disposers of one component so teardown is a single call.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;
use uuid::Uuid;

/// Host events a component can listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Scroll,
    Wheel,
    Touch,
    PointerMove,
    PointerDown,
    PointerUp,
    PointerLeave,
    KeyDown,
    Resize,
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListenerKind::Scroll => "scroll",
            ListenerKind::Wheel => "wheel",
            ListenerKind::Touch => "touch",
            ListenerKind::PointerMove => "pointermove",
            ListenerKind::PointerDown => "pointerdown",
            ListenerKind::PointerUp => "pointerup",
            ListenerKind::PointerLeave => "pointerleave",
            ListenerKind::KeyDown => "keydown",
            ListenerKind::Resize => "resize",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug)]
struct Registration {
    kind: ListenerKind,
    label: String,
}

type Table = RefCell<HashMap<Uuid, Registration>>;

/// Table of attached listeners, shared by clone
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    table: Rc<Table>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener, released when the returned disposer goes away
    #[must_use = "dropping the disposer releases the listener immediately"]
    pub fn listen(&self, kind: ListenerKind, label: impl Into<String>) -> Disposer {
        let id = Uuid::new_v4();
        let label = label.into();
        debug!("Listening for {} ({})", kind, label);
        self.table.borrow_mut().insert(id, Registration { kind, label });
        Disposer {
            id,
            table: Rc::downgrade(&self.table),
        }
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.table.borrow().values().any(|r| r.kind == kind)
    }

    pub fn active_count(&self) -> usize {
        self.table.borrow().len()
    }

    /// Labels of the attached listeners of one kind
    pub fn labels(&self, kind: ListenerKind) -> Vec<String> {
        let mut labels: Vec<String> = self
            .table
            .borrow()
            .values()
            .filter(|r| r.kind == kind)
            .map(|r| r.label.clone())
            .collect();
        labels.sort();
        labels
    }
}

/// Handle that owns one attached listener
#[derive(Debug)]
pub struct Disposer {
    id: Uuid,
    table: Weak<Table>,
}

impl Disposer {
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            if let Some(registration) = table.borrow_mut().remove(&self.id) {
                debug!("Released {} listener ({})", registration.kind, registration.label);
            }
        }
    }
}

/// Disposers owned by one component
#[derive(Debug, Default)]
pub struct ListenerScope {
    disposers: Vec<Disposer>,
}

impl ListenerScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, disposer: Disposer) {
        self.disposers.push(disposer);
    }

    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    pub fn dispose_all(&mut self) {
        self.disposers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_releases_listener() {
        let listeners = Listeners::new();
        let disposer = listeners.listen(ListenerKind::KeyDown, "modal-escape");
        assert!(listeners.is_listening(ListenerKind::KeyDown));

        disposer.dispose();
        assert!(!listeners.is_listening(ListenerKind::KeyDown));
        assert_eq!(listeners.active_count(), 0);
    }

    #[test]
    fn test_scope_releases_everything() {
        let listeners = Listeners::new();
        let mut scope = ListenerScope::new();
        scope.add(listeners.listen(ListenerKind::Wheel, "scroll"));
        scope.add(listeners.listen(ListenerKind::Touch, "scroll"));
        let _other = listeners.listen(ListenerKind::Resize, "layout");
        assert_eq!(listeners.active_count(), 3);

        scope.dispose_all();
        assert!(scope.is_empty());
        assert_eq!(listeners.active_count(), 1);
        assert_eq!(listeners.labels(ListenerKind::Resize), vec!["layout".to_string()]);
    }

    #[test]
    fn test_disposer_outliving_table() {
        let listeners = Listeners::new();
        let disposer = listeners.listen(ListenerKind::Scroll, "progress");
        drop(listeners);
        drop(disposer);
    }
}
