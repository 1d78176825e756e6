//! Reading observation logs and collecting coverage curves of runs.
//!
//! An observation log is a CSV file with a header row and one row per
//! environment and timestep:
//!
//! ```text
//! timestep,env,x0,x1,x2
//! 0,0,0.05,0.05,1.0
//! 0,1,0.91,0.05,1.0
//! 1,0,0.10,0.07,1.0
//! 1,1,0.92,0.03,1.0
//! ```
//!
//! Rows are grouped by timestep in increasing order; within a timestep,
//! environments are listed as `0, 1, ...`.
use anyhow::Result;
use csv::ReaderBuilder;
use ndarray::{Array1, Array2};
use std::path::Path;
use toolbox_core::{
    record::{Record, RecordValue, Recorder},
    ToolboxError,
};
use toolbox_coverage::{coverage_record, CoverageError, CoverageTracker};
use toolbox_stats::{Curves, StatsError};

/// Observations of parallel environments, one frame per timestep.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationLog {
    /// Timesteps of the frames.
    pub timesteps: Vec<i64>,

    /// `frames[t][e]` is the observation of environment `e` at `timesteps[t]`.
    pub frames: Vec<Vec<Vec<f64>>>,
}

impl ObservationLog {
    /// Appends the observation of environment `env` at `timestep`.
    pub fn push(&mut self, timestep: i64, env: usize, obs: Vec<f64>) -> Result<(), CoverageError> {
        let new_frame = match self.timesteps.last() {
            Some(&t) if t == timestep => false,
            Some(&t) if t > timestep => {
                return Err(CoverageError::ShapeMismatch(format!(
                    "timestep {} after timestep {}",
                    timestep, t
                )))
            }
            _ => true,
        };
        if new_frame {
            self.timesteps.push(timestep);
            self.frames.push(vec![]);
        }

        if let Some(frame) = self.frames.last_mut() {
            if env != frame.len() {
                return Err(CoverageError::ShapeMismatch(format!(
                    "env {} at timestep {}, expected env {}",
                    env,
                    timestep,
                    frame.len()
                )));
            }
            frame.push(obs);
        }
        Ok(())
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there is no frame.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Loads an observation log from a CSV file.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
        let mut obs_log = Self::default();

        for record in rdr.records() {
            let record = record?;
            if record.len() < 2 {
                return Err(CoverageError::ShapeMismatch(format!(
                    "row with {} fields in {:?}",
                    record.len(),
                    path
                ))
                .into());
            }
            let timestep = record[0].trim().parse::<i64>()?;
            let env = record[1].trim().parse::<usize>()?;
            let obs = record
                .iter()
                .skip(2)
                .map(|v| v.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()?;
            obs_log.push(timestep, env, obs)?;
        }

        log::debug!("Loaded {} frames from {:?}", obs_log.len(), path);
        Ok(obs_log)
    }
}

/// Tracks coverage of every observation log in `paths`, one run per file.
///
/// All logs must share the same timesteps. For every run, a record made by
/// [`coverage_record`] with key `coverage` and the path under `run` is
/// written to `recorder`, once every log has been tracked. Nothing is
/// written on failure.
pub fn track_runs<P, R>(tracker: &CoverageTracker, paths: &[P], recorder: &mut R) -> Result<Curves>
where
    P: AsRef<Path>,
    R: Recorder,
{
    let mut timesteps: Option<Vec<i64>> = None;
    let mut runs = vec![];
    let mut records = vec![];

    for path in paths {
        let obs_log = ObservationLog::load_csv(path)?;
        let coverage = tracker.track(&obs_log.frames)?;
        log::debug!("{:?}: {} frames", path.as_ref(), obs_log.len());

        let first = timesteps.get_or_insert_with(|| obs_log.timesteps.clone());
        if *first != obs_log.timesteps {
            return Err(StatsError::ShapeMismatch(format!(
                "timesteps of {:?} differ from the first run",
                path.as_ref()
            ))
            .into());
        }
        let mut record = coverage_record("coverage", &coverage);
        record.insert("run", RecordValue::String(path.as_ref().display().to_string()));
        records.push(record);
        runs.push(coverage);
    }

    for record in records {
        recorder.write(record);
    }

    let timesteps = timesteps.unwrap_or_default();
    let values = Array2::from_shape_fn((runs.len(), timesteps.len()), |(r, t)| runs[r][t] as f32);
    Ok(Curves::new(Array1::from(timesteps), values)?)
}

/// Keeps only the final coverage of a record written by [`track_runs`].
///
/// A recorder stores only the latest curve of a run, so only the final value
/// is aggregated over runs.
pub fn final_coverage(record: &Record) -> Result<Record, ToolboxError> {
    let key = "coverage_final";
    Ok(Record::from_scalar(key, record.get_scalar(key)?))
}
