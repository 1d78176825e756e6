#![warn(missing_docs)]
//! Aggregation of learning curves across runs.
//!
//! [`Curves`] holds one row of values per run, sharing the same timesteps.
//! The functions in [`aggregate`] reduce the runs of every timestep to a
//! single statistic, and [`dat`] writes the result as whitespace-separated
//! text files that plotting tools such as pgfplots read directly:
//!
//! ```text
//! timestep med q0.05 q0.95
//! 25000 0.080 0.070 0.090
//! 50000 0.060 0.030 0.090
//! ```
pub mod aggregate;
mod curves;
pub mod dat;
mod error;

pub use aggregate::{iqm, linspace, median, performance_profile, quantile};
pub use curves::Curves;
pub use dat::{save_iqm, save_median, save_performance_profile};
pub use error::StatsError;
