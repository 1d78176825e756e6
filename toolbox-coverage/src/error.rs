//! Errors of coverage computations.
use thiserror::Error;

/// Errors of coverage computations.
///
/// All of them are detected before a coverage sequence is returned, so a
/// failing call never yields a partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoverageError {
    /// Observations are shorter than the slice, or frames disagree on the
    /// number of environments.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The slice or the resolution does not make sense.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A selected coordinate cannot be mapped to a cell.
    #[error("Non-finite observation at timestep {timestep}, env {env}")]
    NonFiniteObservation {
        /// Index of the frame.
        timestep: usize,
        /// Index of the environment within the frame.
        env: usize,
    },
}
