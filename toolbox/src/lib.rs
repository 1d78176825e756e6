//! Exploration metrics and learning-curve statistics for reinforcement
//! learning experiments.
//!
//! The toolbox consists of the following crates:
//!
//! * `toolbox-core` provides records and recorders shared by the other
//!   crates, and output-size arithmetic of convolution and pooling layers.
//! * `toolbox-coverage` counts the distinct discretized states visited by
//!   parallel environments, as a measure of exploration.
//! * `toolbox-stats` aggregates learning curves of several runs (median,
//!   quantiles, interquartile mean, performance profiles) and exports them
//!   as `.dat` files.
//! * `toolbox` re-exports them, reads observation logs from CSV files and
//!   provides the `toolbox` command.
pub mod io;

pub use toolbox_core::{record, shape, ToolboxError};
pub use toolbox_coverage as coverage;
pub use toolbox_stats as stats;
