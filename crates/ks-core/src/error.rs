//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `KsError` as one variant
//! via `#[from]`.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `ks-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum KsError {
    #[error("{0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `ks-*` crates.
pub type KsResult<T> = Result<T, KsError>;
