//! Records and the values they hold.
use crate::error::ToolboxError;
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// A value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single value, e.g. the final coverage of a run.
    Scalar(f32),

    /// A 1-dimensional array, e.g. a coverage curve over timesteps.
    Array1(Vec<f32>),

    /// A text value, useful for labels of runs.
    String(String),
}

/// A container of named values.
///
/// ```rust
/// use toolbox_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("coverage_final", 12.0);
/// record.insert("run", RecordValue::String("seed-3".into()));
/// assert_eq!(record.get_string("run").unwrap(), "seed-3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record, replacing any previous value.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, ToolboxError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(ToolboxError::RecordValueTypeError("Scalar".to_string())),
            None => Err(ToolboxError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, ToolboxError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(ToolboxError::RecordValueTypeError("Array1".to_string())),
            None => Err(ToolboxError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, ToolboxError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(ToolboxError::RecordValueTypeError("String".to_string())),
            None => Err(ToolboxError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns `true` if the record contains no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of values in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let mut record = Record::from_scalar("coverage_final", 3.0);
        record.insert("coverage", RecordValue::Array1(vec![1.0, 2.0, 3.0]));

        assert_eq!(record.get_scalar("coverage_final"), Ok(3.0));
        assert_eq!(record.get_array1("coverage"), Ok(vec![1.0, 2.0, 3.0]));
        assert_eq!(
            record.get_scalar("coverage"),
            Err(ToolboxError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            record.get_string("missing"),
            Err(ToolboxError::RecordKeyError("missing".to_string()))
        );
    }

    #[test]
    fn test_merge_inplace_overwrites() {
        let mut record = Record::from_slice(&[
            ("x", RecordValue::Scalar(1.0)),
            ("y", RecordValue::Scalar(2.0)),
        ]);
        record.merge_inplace(Record::from_scalar("y", 5.0));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get_scalar("x"), Ok(1.0));
        assert_eq!(record.get_scalar("y"), Ok(5.0));
    }
}
