use wp_core::Cell;
use wp_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("invalid navigation parameter: {0}")]
    InvalidParams(String),

    #[error("goal cell {0} is blocked and nothing walkable is nearby")]
    NoWalkableGoal(Cell),

    #[error("path planning failed: {0}")]
    Routing(#[from] SpatialError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
