//! Declarative effect bindings
//!
//! A binding ties one visual effect to one page element. Bindings are
//! created from the `[[effects.bindings]]` list of the config file (or in
//! code by the hosting UI layer) and never change once registered.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle naming an element owned by the hosting UI layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Effect kind, one binding per (target, kind) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Parallax,
    Reveal,
    ProgressBar,
    Magnetic,
    ScrollClass,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectKind::Parallax => "parallax",
            EffectKind::Reveal => "reveal",
            EffectKind::ProgressBar => "progress_bar",
            EffectKind::Magnetic => "magnetic",
            EffectKind::ScrollClass => "scroll_class",
        };
        f.write_str(name)
    }
}

/// Kind-specific effect parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectParams {
    Parallax {
        /// Fraction of the viewport height travelled over the trigger's range
        #[serde(default = "default_parallax_speed")]
        speed: f64,
        /// Element whose passage through the viewport drives the effect
        /// (defaults to the target itself)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trigger: Option<TargetId>,
        /// Time the offset takes to catch up with the scroll position;
        /// 0 tracks it exactly
        #[serde(default = "default_parallax_scrub_ms")]
        scrub_ms: u64,
    },
    Reveal {
        /// Visible fraction of the element area that triggers the reveal
        #[serde(default = "default_reveal_threshold")]
        threshold: f64,
        /// Stagger delay handed to the surface with the reveal
        #[serde(default)]
        delay_ms: u64,
    },
    ProgressBar,
    Magnetic {
        /// Fraction of the pointer's offset from center the element follows
        #[serde(default = "default_magnetic_attraction")]
        attraction: f64,
        /// Duration of the follow and return animations
        #[serde(default = "default_magnetic_duration_ms")]
        duration_ms: u64,
    },
    /// Element classes switched on past scroll offsets
    ScrollClass {
        #[serde(default = "default_scroll_classes")]
        classes: Vec<ScrollThreshold>,
    },
}

/// A class present while the scroll position is strictly past `above`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollThreshold {
    pub class: String,
    pub above: f64,
}

impl ScrollThreshold {
    pub fn new(class: impl Into<String>, above: f64) -> Self {
        Self {
            class: class.into(),
            above,
        }
    }
}

impl EffectParams {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectParams::Parallax { .. } => EffectKind::Parallax,
            EffectParams::Reveal { .. } => EffectKind::Reveal,
            EffectParams::ProgressBar => EffectKind::ProgressBar,
            EffectParams::Magnetic { .. } => EffectKind::Magnetic,
            EffectParams::ScrollClass { .. } => EffectKind::ScrollClass,
        }
    }
}

/// An effect bound to a target element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectBinding {
    pub target: TargetId,
    #[serde(flatten)]
    pub params: EffectParams,
}

impl EffectBinding {
    pub fn new(target: impl Into<TargetId>, params: EffectParams) -> Self {
        Self {
            target: target.into(),
            params,
        }
    }

    pub fn parallax(target: impl Into<TargetId>, speed: f64) -> Self {
        Self::new(
            target,
            EffectParams::Parallax {
                speed,
                trigger: None,
                scrub_ms: default_parallax_scrub_ms(),
            },
        )
    }

    pub fn reveal(target: impl Into<TargetId>) -> Self {
        Self::new(
            target,
            EffectParams::Reveal {
                threshold: default_reveal_threshold(),
                delay_ms: 0,
            },
        )
    }

    pub fn progress_bar(target: impl Into<TargetId>) -> Self {
        Self::new(target, EffectParams::ProgressBar)
    }

    pub fn magnetic(target: impl Into<TargetId>) -> Self {
        Self::new(
            target,
            EffectParams::Magnetic {
                attraction: default_magnetic_attraction(),
                duration_ms: default_magnetic_duration_ms(),
            },
        )
    }

    /// Header-style classes: `scrolled` past 40 px, `shrink` past 120 px
    pub fn scroll_class(target: impl Into<TargetId>) -> Self {
        Self::new(
            target,
            EffectParams::ScrollClass {
                classes: default_scroll_classes(),
            },
        )
    }

    #[inline]
    pub fn kind(&self) -> EffectKind {
        self.params.kind()
    }
}

pub(crate) fn default_parallax_speed() -> f64 {
    0.15
}

pub(crate) fn default_parallax_scrub_ms() -> u64 {
    500
}

pub(crate) fn default_scroll_classes() -> Vec<ScrollThreshold> {
    vec![
        ScrollThreshold::new("scrolled", 40.0),
        ScrollThreshold::new("shrink", 120.0),
    ]
}

pub(crate) fn default_reveal_threshold() -> f64 {
    0.1 // 10% of the element area visible
}

pub(crate) fn default_magnetic_attraction() -> f64 {
    0.15
}

pub(crate) fn default_magnetic_duration_ms() -> u64 {
    300
}
