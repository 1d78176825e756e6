#![warn(missing_docs)]
//! State-coverage metrics for exploration experiments.
//!
//! Observations coming from one or many parallel environments are
//! discretized into lattice cells, and the number of distinct cells visited
//! so far is reported for every timestep:
//!
//! ```
//! use toolbox_coverage::{CoverageConfig, CoverageTracker};
//!
//! // Two environments; the position is the first two coordinates.
//! let batch = vec![
//!     vec![vec![0.0, 0.0, 7.0], vec![1.0, 1.0, 7.0]],
//!     vec![vec![0.5, 0.2, 3.0], vec![2.0, 1.0, 3.0]],
//! ];
//! let config = CoverageConfig::default().slice(0, 2).resolution(1.0);
//! let tracker = CoverageTracker::new(config).unwrap();
//! assert_eq!(tracker.track(&batch).unwrap(), vec![2, 3]);
//! ```
//!
//! * [`CoverageTracker`] processes a whole batch, optionally discretizing on
//!   several threads.
//! * [`CoverageCounter`] is fed one frame at a time.
//! * [`highest_so_far`] is the running maximum of a per-environment value,
//!   another common exploration measure for manipulation tasks.
mod cell;
mod config;
mod counter;
mod error;
mod height;
mod tracker;

pub use cell::Cell;
pub use config::{CoverageConfig, SliceSpec};
pub use counter::CoverageCounter;
pub use error::CoverageError;
pub use height::highest_so_far;
pub use tracker::{coverage_record, track_coverage, track_coverage_array, CoverageTracker};
