use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};

/// Writes records through the [`log`] facade.
///
/// Scalars and strings are printed as they are; arrays are summarized by
/// their length and last element, which for a coverage curve is the final
/// coverage.
pub struct LogRecorder {
    prefix: String,
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs a [`LogRecorder`] whose lines start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            storage: RecordStorage::new(),
        }
    }

    fn format_value(v: &RecordValue) -> String {
        match v {
            RecordValue::Scalar(v) => format!("{:.3}", v),
            RecordValue::String(s) => s.clone(),
            RecordValue::Array1(vs) => match vs.last() {
                Some(last) => format!("[len={}, last={:.3}]", vs.len(), last),
                None => "[]".to_string(),
            },
        }
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        let mut entries = record.iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (k, v) in entries {
            log::info!("{} {}: {}", self.prefix, k, Self::format_value(v));
        }
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self) {
        if self.storage.is_empty() {
            log::debug!("{} nothing to flush", self.prefix);
            return;
        }
        let record = self.storage.aggregate();
        self.write(record);
    }
}
