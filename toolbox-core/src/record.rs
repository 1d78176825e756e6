//! Records of experiment results and the recorders they are written to.
//!
//! A [`Record`] is a bag of named values, e.g. the coverage curve of one run
//! together with its final value. Records are handed to a [`Recorder`]; an
//! [`AggregateRecorder`] can additionally keep them in a [`RecordStorage`] and
//! emit summary statistics when flushed.
//!
//! ```rust
//! use toolbox_core::record::{Record, RecordValue};
//!
//! let coverage = vec![1f32, 1.0, 2.0];
//!
//! let mut record = Record::empty();
//! record.insert("run", RecordValue::String("seed-0".to_string()));
//! record.insert("coverage", RecordValue::Array1(coverage));
//! record.insert("coverage_final", RecordValue::Scalar(2.0));
//! assert_eq!(record.get_scalar("coverage_final").unwrap(), 2.0);
//! ```
//!
//! Supported values are listed in [`RecordValue`]:
//!
//! * `Scalar(f32)` - single values such as a final coverage
//! * `Array1(Vec<f32>)` - curves over timesteps
//! * `String(String)` - labels
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
