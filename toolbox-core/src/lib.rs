#![warn(missing_docs)]
//! Shared building blocks of the toolbox crates.
//!
//! * [`record`] holds key-value records of experiment results and the
//!   recorders they are written to.
//! * [`shape`] computes output sizes of convolution and pooling layers.
//! * [`error`] is the error type of this crate.
pub mod error;
pub mod record;
pub mod shape;

pub use error::ToolboxError;
pub use shape::{conv_2d, conv_transpose_2d, pool_2d, Size2};
