//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need it.

use thiserror::Error;

/// The base error type for `wp-core` value constructors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid grid layout: {0}")]
    InvalidLayout(String),
}

/// Shorthand result type for `wp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
