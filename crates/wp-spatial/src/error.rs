//! Spatial-subsystem error type.

use thiserror::Error;

use wp_core::Cell;

/// Errors produced by `wp-spatial`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpatialError {
    #[error("no path from {start} to {goal}")]
    Unreachable { start: Cell, goal: Cell },

    #[error("search from {start} to {goal} gave up after {limit} expansions")]
    SearchLimit { start: Cell, goal: Cell, limit: usize },
}

impl SpatialError {
    /// Both variants mean "treat the goal as unreachable"; callers that only
    /// care about liveness can match on this instead of the variants.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, SpatialError::Unreachable { .. } | SpatialError::SearchLimit { .. })
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
