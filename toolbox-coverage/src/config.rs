//! Configuration of [`CoverageTracker`](crate::CoverageTracker).
use crate::CoverageError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    ops::Range,
    path::Path,
};

/// Half-open range `[start, end)` of the coordinates that define a position.
///
/// Bounds are signed so that a malformed config file is reported as
/// [`CoverageError::InvalidConfig`] instead of a deserialization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SliceSpec {
    /// First selected coordinate.
    pub start: i64,

    /// One past the last selected coordinate.
    pub end: i64,
}

impl SliceSpec {
    /// Selects coordinates `start..end`, e.g. the object position inside the
    /// state vector of a robot-arm environment.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Selects the whole observation vector of length `len`.
    pub fn full(len: usize) -> Self {
        Self {
            start: 0,
            end: len as i64,
        }
    }

    /// Checks the bounds and returns them as an index range.
    pub fn range(&self) -> Result<Range<usize>, CoverageError> {
        if self.start < 0 || self.end < 0 {
            return Err(CoverageError::InvalidConfig(format!(
                "slice bounds must be non-negative, got {}..{}",
                self.start, self.end
            )));
        }
        if self.start > self.end {
            return Err(CoverageError::InvalidConfig(format!(
                "slice start {} is greater than end {}",
                self.start, self.end
            )));
        }
        Ok(self.start as usize..self.end as usize)
    }
}

fn default_n_threads() -> usize {
    1
}

/// Configuration of [`CoverageTracker`](crate::CoverageTracker).
///
/// ```yaml
/// slice:
///   start: 0
///   end: 2
/// resolution: 10.0
/// n_threads: 1
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CoverageConfig {
    /// Coordinates used for discretization.
    pub slice: SliceSpec,

    /// Multiplier applied to every coordinate before flooring.
    /// Larger values give finer cells.
    pub resolution: f64,

    /// Number of threads computing cells. The visited-set is always updated
    /// by a single sequential pass.
    #[serde(default = "default_n_threads")]
    pub n_threads: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            slice: SliceSpec::new(0, 2),
            resolution: 1.0,
            n_threads: 1,
        }
    }
}

impl CoverageConfig {
    /// Sets the coordinate slice.
    pub fn slice(mut self, start: i64, end: i64) -> Self {
        self.slice = SliceSpec::new(start, end);
        self
    }

    /// Sets the resolution.
    pub fn resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the number of threads computing cells.
    pub fn n_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Checks the config and returns the selected coordinate range.
    pub fn validate(&self) -> Result<Range<usize>, CoverageError> {
        let range = self.slice.range()?;
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(CoverageError::InvalidConfig(format!(
                "resolution must be positive and finite, got {}",
                self.resolution
            )));
        }
        if self.n_threads == 0 {
            return Err(CoverageError::InvalidConfig(
                "n_threads must be at least 1".to_string(),
            ));
        }
        Ok(range)
    }

    /// Constructs [`CoverageConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves [`CoverageConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_coverage_config() -> Result<()> {
        let config = CoverageConfig::default()
            .slice(8, 11)
            .resolution(10.0)
            .n_threads(4);

        let dir = TempDir::new("coverage_config")?;
        let path = dir.path().join("coverage_config.yaml");
        config.save(&path)?;
        let config_ = CoverageConfig::load(&path)?;
        assert_eq!(config, config_);

        Ok(())
    }

    #[test]
    fn test_n_threads_defaults_to_one() -> Result<()> {
        let yaml = "slice:\n  start: 4\n  end: 7\nresolution: 1.0\n";
        let config: CoverageConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.n_threads, 1);
        assert_eq!(config.validate()?, 4..7);
        Ok(())
    }

    #[test]
    fn test_validate_rejects_nonsense() {
        let invalid = [
            CoverageConfig::default().resolution(0.0),
            CoverageConfig::default().resolution(-1.0),
            CoverageConfig::default().resolution(f64::NAN),
            CoverageConfig::default().slice(3, 2),
            CoverageConfig::default().slice(-1, 2),
            CoverageConfig::default().n_threads(0),
        ];
        for config in invalid.iter() {
            assert!(matches!(
                config.validate(),
                Err(CoverageError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_full_slice() {
        assert_eq!(SliceSpec::full(6).range(), Ok(0..6));
        assert_eq!(SliceSpec::full(0).range(), Ok(0..0));
    }
}
