pub mod config;
pub mod contact;
pub mod effect;
pub mod error;
pub mod server;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use effect::{EffectBinding, EffectKind, EffectParams, ScrollThreshold, TargetId};
pub use error::{Error, Result};
pub use server::AssetServer;
