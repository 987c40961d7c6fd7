//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `IgoError` as one
//! variant where they need to surface configuration or parse failures.

use thiserror::Error;

/// The top-level error type for `igo-core`.
#[derive(Debug, Error)]
pub enum IgoError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `igo-core`.
pub type IgoResult<T> = Result<T, IgoError>;
