use thiserror::Error;

use crate::effect::{EffectKind, TargetId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Effect {kind} already registered for target '{target}'")]
    DuplicateBinding { target: TargetId, kind: EffectKind },

    #[error("Server error: {0}")]
    Server(String),

    #[error("Target not found: {0}")]
    MissingTarget(TargetId),

    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
