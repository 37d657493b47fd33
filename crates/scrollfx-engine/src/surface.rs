//! Host seams: layout queries in, presentation mutations out
//!
//! The engine never owns page elements. A host implements [`Layout`] to
//! answer geometry questions during the measure phase of a frame and
//! [`Surface`] to apply the mutations produced in the mutate phase.

use std::time::Duration;

use scrollfx_core::TargetId;

use crate::effects::EffectError;

/// Element rectangle in viewport coordinates (CSS pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Geometry provider, read only during the measure phase
pub trait Layout {
    fn viewport(&self) -> Viewport;

    /// Scrollable distance of the page (content height minus viewport)
    fn scroll_extent(&self) -> f64;

    /// Untransformed layout rect of an element, `None` once it is gone
    fn rect(&self, target: &TargetId) -> Option<Rect>;
}

/// Appearance states of the custom cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAppearance {
    Normal,
    /// Over an interactive element
    Hover,
    Pressed,
}

/// Presentation change requested by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Offset an element from its layout position
    Translate { target: TargetId, x: f64, y: f64 },
    /// Set an element's width as a percentage of its container
    Width { target: TargetId, percent: f64 },
    /// Switch an element from hidden to shown presentation
    Reveal { target: TargetId, delay: Duration },
    /// Toggle a class on an element
    Class {
        target: TargetId,
        class: String,
        enabled: bool,
    },
    /// Toggle a class on the document root
    RootClass { class: &'static str, enabled: bool },
    /// Place the custom cursor
    Cursor {
        x: f64,
        y: f64,
        size: f64,
        appearance: CursorAppearance,
    },
}

/// Presentation sink, written only during the mutate phase
pub trait Surface {
    fn apply(&mut self, mutation: &Mutation) -> Result<(), EffectError>;
}

/// Surface that records every mutation, for hosts that batch writes
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub mutations: Vec<Mutation>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the mutations recorded so far
    pub fn drain(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }
}

impl Surface for RecordingSurface {
    fn apply(&mut self, mutation: &Mutation) -> Result<(), EffectError> {
        self.mutations.push(mutation.clone());
        Ok(())
    }
}
