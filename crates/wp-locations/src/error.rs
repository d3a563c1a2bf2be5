use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location {0:?} is not defined")]
    UnknownLocation(String),

    #[error("no route from {from:?} to {to:?}")]
    NoRoute { from: String, to: String },

    #[error("route from {from:?} to {to:?} has no concrete waypoint")]
    NoConcretePoint { from: String, to: String },

    #[error("duplicate {what} {name:?}")]
    Duplicate { what: &'static str, name: String },

    #[error("location table parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LocationError {
    /// `true` for the errors a `go_to` reports as "target not found".
    pub fn is_unresolvable(&self) -> bool {
        matches!(
            self,
            LocationError::UnknownLocation(_)
                | LocationError::NoRoute { .. }
                | LocationError::NoConcretePoint { .. }
        )
    }
}

pub type LocationResult<T> = Result<T, LocationError>;
