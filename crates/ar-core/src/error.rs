//! Core error type.
//!
//! Sub-crates define their own error enums (`LoadError`, `ProjectionError`,
//! …).  `CoreError` covers what lives here: configuration parsing and the
//! I/O around it.

use thiserror::Error;

/// Errors produced by `ar-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ar-core`.
pub type CoreResult<T> = Result<T, CoreError>;
