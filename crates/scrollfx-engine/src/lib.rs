//! Scroll-synchronized interaction engine
//!
//! The engine is headless: hosts answer geometry queries through
//! [`Layout`] and apply presentation changes through [`Surface`].

pub mod carousel;
pub mod effects;
pub mod engine;
pub mod focus;
pub mod frame;
pub mod listeners;
pub mod pointer;
pub mod scroll;
pub mod surface;
pub mod viewport;

pub use carousel::{CarouselPhase, CarouselState, DragCarousel, SlideDeck, Swipe};
pub use effects::{EffectError, EffectFailure, EffectRegistry, FrameContext};
pub use engine::{FrameReport, InteractionEngine};
pub use focus::{FocusHost, ModalDialog};
pub use frame::{FrameDriver, FrameScheduler};
pub use listeners::{Disposer, ListenerKind, ListenerScope, Listeners};
pub use pointer::{CustomCursor, PointerState};
pub use scroll::{Completion, ScrollHandle, ScrollOutcome, ScrollSource, ScrollState};
pub use surface::{Layout, Mutation, Rect, RecordingSurface, Surface, Viewport};
pub use viewport::{ViewportEvent, ViewportObserver};
