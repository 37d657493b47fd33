//! Smooth scroll position source
//!
//! # Layers
//!
//! ## Atomic
//! - `timing` - Time calculation utilities (progress, easing, interpolation,
//!   smoothing)
//! - `config` - Configuration types and defaults (re-exported from scrollfx-core)
//!
//! ## Molecular
//! - `source` - Scroll source combining the atoms: passive tracking of the
//!   raw position plus programmatic `scroll_to` transitions
//!
//! # Usage
//!
//! ```ignore
//! use scrollfx_engine::scroll::{ScrollSource, ScrollConfig};
//!
//! let mut source = ScrollSource::with_defaults();
//! source.set_range(4000.0);
//!
//! // Host scroll events feed the raw position
//! source.user_scroll(1200.0);
//!
//! // Once per frame
//! let state = source.advance(dt);
//!
//! // Programmatic navigation resolves when the transition settles
//! let completion = source.scroll_to(0.0, 800);
//! ```

pub mod config;
pub mod timing;

pub mod source;

pub use config::{EasingType, ScrollConfig, ScrollConfigExt};
pub use source::{Completion, ScrollHandle, ScrollOutcome, ScrollSource, ScrollState, SETTLE_EPSILON};
