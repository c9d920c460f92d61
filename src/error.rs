//! Error types.

use thiserror::Error;

/// Failure result of a trip optimization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizationError {
    /// No points of interest were supplied.
    #[error("at least one point of interest is required")]
    EmptyInput,

    /// A request parameter is out of range or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other fault raised while planning.
    #[error("route optimization failed: {0}")]
    OptimizationFailed(String),
}

/// Faults raised by distance computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("distance cache lock poisoned")]
    CachePoisoned,
}

impl From<GeoError> for OptimizationError {
    fn from(err: GeoError) -> Self {
        OptimizationError::OptimizationFailed(err.to_string())
    }
}
