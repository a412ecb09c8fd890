//! Error types
//!
//! Only initialization can fail. Collisions and odd viewport sizes are
//! normal gameplay, not errors.

use thiserror::Error;

/// The game cannot run at all
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FatalError {
    #[error("drawing surface has no 2D context")]
    NoContext,
    #[error("drawing surface rejected configuration: {0}")]
    Surface(String),
    #[error("host is missing {0}")]
    Host(String),
}

/// A tuning override could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}
