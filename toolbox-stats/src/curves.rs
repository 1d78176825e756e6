//! Learning curves of several runs.
use crate::StatsError;
use anyhow::Result;
use csv::{ReaderBuilder, WriterBuilder};
use ndarray::{Array1, Array2, Axis};
use std::path::Path;

/// Values of several runs evaluated at the same timesteps.
///
/// `values` has shape `(n_runs, n_timesteps)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Curves {
    /// Timesteps shared by all runs.
    pub timesteps: Array1<i64>,

    /// One row per run.
    pub values: Array2<f32>,
}

impl Curves {
    /// Constructs [`Curves`], checking that the lengths agree.
    pub fn new(timesteps: Array1<i64>, values: Array2<f32>) -> Result<Self, StatsError> {
        if timesteps.len() != values.ncols() {
            return Err(StatsError::ShapeMismatch(format!(
                "{} timesteps for runs of length {}",
                timesteps.len(),
                values.ncols()
            )));
        }
        Ok(Self { timesteps, values })
    }

    /// Constructs [`Curves`] whose timesteps are `0, step, 2 * step, ...`.
    pub fn with_step(values: Array2<f32>, step: i64) -> Self {
        let timesteps = (0..values.ncols() as i64).map(|i| i * step).collect();
        Self { timesteps, values }
    }

    /// Constructs [`Curves`] from runs of equal length.
    pub fn from_runs(runs: Vec<Vec<f32>>, step: i64) -> Result<Self, StatsError> {
        let n_timesteps = runs.first().map_or(0, |r| r.len());
        if let Some(run) = runs.iter().find(|r| r.len() != n_timesteps) {
            return Err(StatsError::ShapeMismatch(format!(
                "run of length {}, expected {}",
                run.len(),
                n_timesteps
            )));
        }
        let n_runs = runs.len();
        let values = Array2::from_shape_vec((n_runs, n_timesteps), runs.concat())
            .map_err(|e| StatsError::ShapeMismatch(e.to_string()))?;
        Ok(Self::with_step(values, step))
    }

    /// Number of runs.
    pub fn n_runs(&self) -> usize {
        self.values.nrows()
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.timesteps.len()
    }

    /// Returns `true` if there is no timestep.
    pub fn is_empty(&self) -> bool {
        self.timesteps.is_empty()
    }

    /// Downsamples the curves to `target_length` timesteps.
    ///
    /// The `i`-th new timestep takes the original index nearest to
    /// `i * len / target_length`, ties going to the lower index.
    pub fn rescale(&self, target_length: usize) -> Result<Self, StatsError> {
        let n = self.len();
        if n == 0 || target_length == 0 {
            return Err(StatsError::InvalidArgument(format!(
                "cannot rescale {} timesteps to {}",
                n, target_length
            )));
        }
        let ixs = (0..target_length)
            .map(|i| {
                let pos = (i * n) as f64 / target_length as f64;
                ((pos - 0.5).ceil().max(0.0) as usize).min(n - 1)
            })
            .collect::<Vec<_>>();
        log::trace!("Rescale indices: {:?}", ixs);

        Ok(Self {
            timesteps: self.timesteps.select(Axis(0), &ixs),
            values: self.values.select(Axis(1), &ixs),
        })
    }

    /// Loads curves from a CSV file.
    ///
    /// The header row holds the timesteps; every following row is a run.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
        let timesteps = rdr
            .headers()?
            .iter()
            .map(|t| t.trim().parse::<i64>())
            .collect::<Result<Array1<_>, _>>()?;

        let mut runs = vec![];
        for record in rdr.records() {
            let run = record?
                .iter()
                .map(|v| v.trim().parse::<f32>())
                .collect::<Result<Vec<_>, _>>()?;
            runs.push(run);
        }

        let n_runs = runs.len();
        let values = Array2::from_shape_vec((n_runs, timesteps.len()), runs.concat())?;
        log::debug!("Loaded {} runs of {} timesteps", n_runs, timesteps.len());
        Ok(Self::new(timesteps, values)?)
    }

    /// Saves curves to a CSV file readable by [`Curves::load_csv`].
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
        wtr.write_record(self.timesteps.iter().map(|t| t.to_string()))?;
        for run in self.values.outer_iter() {
            wtr.write_record(run.iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;
    use tempdir::TempDir;

    #[test]
    fn test_from_runs() {
        let runs = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let curves = Curves::from_runs(runs, 100).unwrap();
        assert_eq!(curves.timesteps, array![0i64, 100, 200]);
        assert_eq!(curves.values, array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);

        let err = Curves::from_runs(vec![vec![1.0, 2.0], vec![4.0]], 1).unwrap_err();
        assert!(matches!(err, StatsError::ShapeMismatch(_)));
    }

    #[test]
    fn test_rescale_nearest_index() {
        let values = Array2::from_shape_fn((1, 10), |(_, j)| j as f32);
        let curves = Curves::with_step(values, 10);

        // Positions 0, 2.5, 5, 7.5 map to 0, 2, 5, 7.
        let rescaled = curves.rescale(4).unwrap();
        assert_eq!(rescaled.timesteps, array![0i64, 20, 50, 70]);
        assert_eq!(rescaled.values, array![[0.0f32, 2.0, 5.0, 7.0]]);

        // Positions 0, 3.33, 6.67 map to 0, 3, 7.
        let rescaled = curves.rescale(3).unwrap();
        assert_eq!(rescaled.timesteps, array![0i64, 30, 70]);

        // Upsampling repeats indices and never goes past the end.
        let short = Curves::with_step(array![[1.0, 2.0, 3.0]], 1);
        let expected = array![[1.0f32, 2.0, 2.0, 3.0, 3.0]];
        assert_eq!(short.rescale(5).unwrap().values, expected);

        assert!(curves.rescale(0).is_err());
    }

    #[test]
    fn test_csv_round_trip() -> Result<()> {
        let curves = Curves::new(
            array![0, 25000, 50000],
            array![[0.5, 0.25, 1.0], [2.0, -1.5, 0.0]],
        )?;

        let dir = TempDir::new("curves")?;
        let path = dir.path().join("runs.csv");
        curves.save_csv(&path)?;
        assert_eq!(Curves::load_csv(&path)?, curves);

        Ok(())
    }

    #[test]
    fn test_load_csv_rejects_ragged_rows() -> Result<()> {
        let dir = TempDir::new("curves")?;
        let path = dir.path().join("ragged.csv");
        std::fs::write(&path, "0,1,2\n1.0,2.0,3.0\n1.0,2.0\n")?;
        assert!(Curves::load_csv(&path).is_err());
        Ok(())
    }
}
