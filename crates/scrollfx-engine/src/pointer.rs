//! Pointer state and the custom cursor that follows it

use scrollfx_core::config::CursorConfig;
use tracing::debug;

use crate::effects::EffectError;
use crate::surface::{CursorAppearance, Mutation, Surface};

/// Root class that hides the native cursor while the custom one is shown
pub const CURSOR_HIDDEN_CLASS: &str = "cursor-hidden";

/// Last known pointer position, last write wins
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
    pub is_down: bool,
    /// False until the first move and after the pointer leaves the window
    pub active: bool,
}

impl PointerState {
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.active = true;
    }

    pub fn leave(&mut self) {
        self.active = false;
        self.is_down = false;
    }
}

/// Custom cursor driven by the frame scheduler
///
/// The rendered position keeps one smoothed value from the previous frame
/// and covers `follow_factor` of the remaining distance each frame.
#[derive(Debug)]
pub struct CustomCursor {
    config: CursorConfig,
    enabled: bool,
    installed: bool,
    position: (f64, f64),
    over_interactive: bool,
    last: Option<Mutation>,
}

impl CustomCursor {
    /// Build a cursor; touch-only devices keep the native cursor
    pub fn new(config: CursorConfig, touch_only: bool) -> Self {
        let enabled = config.enabled && !touch_only;
        Self {
            config,
            enabled,
            installed: false,
            position: (0.0, 0.0),
            over_interactive: false,
            last: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Hide the native cursor; no-op when disabled or already installed
    pub fn install(&mut self, surface: &mut dyn Surface) -> Result<(), EffectError> {
        if !self.enabled || self.installed {
            return Ok(());
        }
        surface.apply(&Mutation::RootClass {
            class: CURSOR_HIDDEN_CLASS,
            enabled: true,
        })?;
        self.installed = true;
        debug!("Custom cursor installed");
        Ok(())
    }

    /// Restore the native cursor
    pub fn teardown(&mut self, surface: &mut dyn Surface) -> Result<(), EffectError> {
        if !self.installed {
            return Ok(());
        }
        self.installed = false;
        self.last = None;
        surface.apply(&Mutation::RootClass {
            class: CURSOR_HIDDEN_CLASS,
            enabled: false,
        })
    }

    /// Record whether the element under the pointer is interactive
    pub fn pointer_over(&mut self, interactive: bool) {
        self.over_interactive = interactive;
    }

    pub fn appearance(&self, pointer: &PointerState) -> CursorAppearance {
        if pointer.is_down {
            CursorAppearance::Pressed
        } else if self.over_interactive {
            CursorAppearance::Hover
        } else {
            CursorAppearance::Normal
        }
    }

    pub fn size(&self, appearance: CursorAppearance) -> f64 {
        match appearance {
            CursorAppearance::Normal => self.config.normal_size,
            CursorAppearance::Hover => self.config.hover_size,
            CursorAppearance::Pressed => self.config.pressed_size,
        }
    }

    /// Advance one frame toward the pointer and place the cursor
    pub fn update(&mut self, pointer: &PointerState, surface: &mut dyn Surface) -> Result<(), EffectError> {
        if !self.installed {
            return Ok(());
        }

        let factor = self.config.follow_factor.clamp(0.0, 1.0);
        self.position.0 += (pointer.x - self.position.0) * factor;
        self.position.1 += (pointer.y - self.position.1) * factor;

        let appearance = self.appearance(pointer);
        let mutation = Mutation::Cursor {
            x: self.position.0,
            y: self.position.1,
            size: self.size(appearance),
            appearance,
        };
        if self.last.as_ref() == Some(&mutation) {
            return Ok(());
        }
        surface.apply(&mutation)?;
        self.last = Some(mutation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn pointer(x: f64, y: f64) -> PointerState {
        PointerState {
            x,
            y,
            is_down: false,
            active: true,
        }
    }

    #[test]
    fn test_cursor_follows_with_smoothing() {
        let mut surface = RecordingSurface::new();
        let mut cursor = CustomCursor::new(CursorConfig::default(), false);
        cursor.install(&mut surface).unwrap();

        cursor.update(&pointer(100.0, 50.0), &mut surface).unwrap();
        let (x, y) = cursor.position();
        assert!((x - 30.0).abs() < 1e-9);
        assert!((y - 15.0).abs() < 1e-9);

        cursor.update(&pointer(100.0, 50.0), &mut surface).unwrap();
        assert!((cursor.position().0 - 51.0).abs() < 1e-9);
        assert_eq!(surface.mutations.len(), 3);
    }

    #[test]
    fn test_cursor_appearance_sizes() {
        let mut cursor = CustomCursor::new(CursorConfig::default(), false);
        let mut p = pointer(0.0, 0.0);
        assert_eq!(cursor.size(cursor.appearance(&p)), 8.0);

        cursor.pointer_over(true);
        assert_eq!(cursor.appearance(&p), CursorAppearance::Hover);
        assert_eq!(cursor.size(cursor.appearance(&p)), 24.0);

        p.is_down = true;
        assert_eq!(cursor.size(cursor.appearance(&p)), 6.0);

        // Release returns to whatever is under the pointer
        p.is_down = false;
        cursor.pointer_over(false);
        assert_eq!(cursor.appearance(&p), CursorAppearance::Normal);
    }

    #[test]
    fn test_touch_devices_keep_native_cursor() {
        let mut surface = RecordingSurface::new();
        let mut cursor = CustomCursor::new(CursorConfig::default(), true);
        assert!(!cursor.is_enabled());
        cursor.install(&mut surface).unwrap();
        cursor.update(&pointer(10.0, 10.0), &mut surface).unwrap();
        assert!(surface.mutations.is_empty());
    }

    #[test]
    fn test_install_and_teardown_toggle_root_class() {
        let mut surface = RecordingSurface::new();
        let mut cursor = CustomCursor::new(CursorConfig::default(), false);
        cursor.install(&mut surface).unwrap();
        cursor.install(&mut surface).unwrap();
        cursor.teardown(&mut surface).unwrap();
        cursor.teardown(&mut surface).unwrap();

        assert_eq!(
            surface.mutations,
            vec![
                Mutation::RootClass {
                    class: CURSOR_HIDDEN_CLASS,
                    enabled: true
                },
                Mutation::RootClass {
                    class: CURSOR_HIDDEN_CLASS,
                    enabled: false
                },
            ]
        );
    }

    #[test]
    fn test_pointer_leave_clears_press() {
        let mut p = PointerState::default();
        assert!(!p.active);
        p.move_to(5.0, 6.0);
        p.is_down = true;
        p.leave();
        assert!(!p.active && !p.is_down);
        assert_eq!((p.x, p.y), (5.0, 6.0));
    }
}
