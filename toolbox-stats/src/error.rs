//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Runs or timesteps of different lengths.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An argument out of its domain, e.g. a quantile above 1.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
