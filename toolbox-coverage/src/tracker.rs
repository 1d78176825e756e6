//! Cumulative state coverage over a batch of observations.
use crate::{counter::frame_cells, Cell, CoverageConfig, CoverageCounter, CoverageError, SliceSpec};
use ndarray::{s, ArrayView3};
use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPoolBuilder,
};
use std::ops::Range;
use toolbox_core::record::{Record, RecordValue};

/// Computes, for every timestep of a batch, the number of distinct cells
/// visited so far by all environments combined.
///
/// Cells are computed from `floor(resolution * obs[start..end])`. With more
/// than one thread in the config, timestep chunks are discretized in
/// parallel and folded into the visited-set afterwards; the result does not
/// depend on the number of threads.
pub struct CoverageTracker {
    config: CoverageConfig,
    range: Range<usize>,
}

impl CoverageTracker {
    /// Constructs a tracker, checking the config.
    pub fn new(config: CoverageConfig) -> Result<Self, CoverageError> {
        let range = config.validate()?;
        Ok(Self { config, range })
    }

    /// Returns the config of the tracker.
    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// Tracks coverage over `batch`, a sequence of frames each holding one
    /// raw observation per environment.
    ///
    /// Returns an empty sequence if there are no frames or no environments.
    pub fn track<F, O>(&self, batch: &[F]) -> Result<Vec<usize>, CoverageError>
    where
        F: AsRef<[O]> + Sync,
        O: AsRef<[f64]> + Sync,
    {
        let n_envs = match batch.first() {
            Some(frame) => frame.as_ref().len(),
            None => return Ok(vec![]),
        };
        log::debug!(
            "Tracking coverage: {} timesteps, {} envs, slice {:?}, resolution {}",
            batch.len(),
            n_envs,
            self.range,
            self.config.resolution
        );

        let coverage = self.run(batch.len(), n_envs, |t| {
            frame_cells(
                batch[t].as_ref(),
                n_envs,
                t,
                &self.range,
                self.config.resolution,
            )
        })?;

        if n_envs == 0 {
            return Ok(vec![]);
        }
        Ok(coverage)
    }

    /// Tracks coverage over an array of shape `(timesteps, envs, obs_dim)`.
    pub fn track_array(&self, batch: ArrayView3<f64>) -> Result<Vec<usize>, CoverageError> {
        let (n_steps, n_envs, obs_dim) = batch.dim();
        if n_steps == 0 || n_envs == 0 {
            return Ok(vec![]);
        }
        if obs_dim < self.range.end {
            return Err(CoverageError::ShapeMismatch(format!(
                "observations have length {}, slice ends at {}",
                obs_dim, self.range.end
            )));
        }
        log::debug!(
            "Tracking coverage: {} timesteps, {} envs, slice {:?}, resolution {}",
            n_steps,
            n_envs,
            self.range,
            self.config.resolution
        );

        let (start, end) = (self.range.start, self.range.end);
        self.run(n_steps, n_envs, |t| {
            (0..n_envs)
                .map(|e| {
                    let coords = batch.slice(s![t, e, start..end]);
                    Cell::from_coords(coords.iter().copied(), self.config.resolution, t, e)
                })
                .collect()
        })
    }

    /// Discretizes every frame with `cells_at`, then folds the cells into a
    /// fresh visited-set in timestep order.
    fn run<C>(&self, n_steps: usize, n_envs: usize, cells_at: C) -> Result<Vec<usize>, CoverageError>
    where
        C: Fn(usize) -> Result<Vec<Cell>, CoverageError> + Sync,
    {
        let mut counter = CoverageCounter::new(&self.config)?;
        let n_threads = self.config.n_threads.min(n_steps);

        let coverage: Vec<usize> = if n_threads <= 1 {
            (0..n_steps)
                .map(|t| cells_at(t).map(|cells| counter.fold(cells)))
                .collect::<Result<_, CoverageError>>()?
        } else {
            // The first error in timestep order wins, as on the sequential path.
            parallel_cells(n_steps, n_threads, &cells_at)?
                .into_iter()
                .map(|cells| cells.map(|cells| counter.fold(cells)))
                .collect::<Result<_, CoverageError>>()?
        };

        log::debug!(
            "Coverage after {} timesteps x {} envs: {}",
            n_steps,
            n_envs,
            counter.coverage()
        );
        Ok(coverage)
    }
}

/// Discretizes frames `0..n_steps` on a pool of `n_threads` threads.
///
/// The result of every frame is kept, in timestep order.
fn parallel_cells<C>(
    n_steps: usize,
    n_threads: usize,
    cells_at: &C,
) -> Result<Vec<Result<Vec<Cell>, CoverageError>>, CoverageError>
where
    C: Fn(usize) -> Result<Vec<Cell>, CoverageError> + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build()
        .map_err(|e| {
            CoverageError::InvalidConfig(format!("cannot start {} threads: {}", n_threads, e))
        })?;
    log::trace!("Discretizing {} timesteps on {} threads", n_steps, n_threads);

    Ok(pool.install(|| (0..n_steps).into_par_iter().map(cells_at).collect()))
}

/// Tracks coverage of `batch` over coordinates `slice` at `resolution`,
/// with the default number of threads.
///
/// ```
/// use toolbox_coverage::{track_coverage, SliceSpec};
///
/// let batch = vec![
///     vec![vec![0.05, 0.05]],
///     vec![vec![0.05, 0.05]],
///     vec![vec![0.91, 0.05]],
/// ];
/// let coverage = track_coverage(&batch, SliceSpec::new(0, 2), 10.0).unwrap();
/// assert_eq!(coverage, vec![1, 1, 2]);
/// ```
pub fn track_coverage<F, O>(
    batch: &[F],
    slice: SliceSpec,
    resolution: f64,
) -> Result<Vec<usize>, CoverageError>
where
    F: AsRef<[O]> + Sync,
    O: AsRef<[f64]> + Sync,
{
    let config = CoverageConfig {
        slice,
        resolution,
        ..CoverageConfig::default()
    };
    CoverageTracker::new(config)?.track(batch)
}

/// Tracks coverage of an array of shape `(timesteps, envs, obs_dim)` over
/// coordinates `slice` at `resolution`.
pub fn track_coverage_array(
    batch: ArrayView3<f64>,
    slice: SliceSpec,
    resolution: f64,
) -> Result<Vec<usize>, CoverageError> {
    let config = CoverageConfig {
        slice,
        resolution,
        ..CoverageConfig::default()
    };
    CoverageTracker::new(config)?.track_array(batch)
}

/// Packs a coverage sequence into a [`Record`].
///
/// The curve is stored as `name` and its last value as `{name}_final`
/// (zero for an empty sequence).
pub fn coverage_record(name: &str, coverage: &[usize]) -> Record {
    let curve = coverage.iter().map(|&c| c as f32).collect::<Vec<_>>();
    let last = curve.last().copied().unwrap_or(0.0);
    Record::from_slice(&[
        (name.to_string(), RecordValue::Array1(curve)),
        (format!("{}_final", name), RecordValue::Scalar(last)),
    ])
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::Array3;

    fn tracker(start: i64, end: i64, resolution: f64) -> CoverageTracker {
        let config = CoverageConfig::default()
            .slice(start, end)
            .resolution(resolution);
        CoverageTracker::new(config).unwrap()
    }

    #[test]
    fn test_single_env_revisits() {
        let batch = vec![
            vec![vec![0.05, 0.05]],
            vec![vec![0.05, 0.05]],
            vec![vec![0.91, 0.05]],
        ];
        assert_eq!(tracker(0, 2, 10.0).track(&batch).unwrap(), vec![1, 1, 2]);
    }

    #[test]
    fn test_two_envs_in_one_frame() {
        let batch = vec![vec![vec![0.0, 0.0], vec![1.0, 1.0]]];
        assert_eq!(tracker(0, 2, 1.0).track(&batch).unwrap(), vec![2]);
    }

    #[test]
    fn test_empty_batch() {
        let batch: Vec<Vec<Vec<f64>>> = vec![];
        assert_eq!(tracker(0, 2, 1.0).track(&batch).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_no_envs() {
        let batch: Vec<Vec<Vec<f64>>> = vec![vec![], vec![]];
        assert_eq!(tracker(0, 2, 1.0).track(&batch).unwrap(), Vec::<usize>::new());

        let batch = vec![vec![], vec![vec![0.0, 0.0]]];
        assert!(matches!(
            tracker(0, 2, 1.0).track(&batch),
            Err(CoverageError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_negative_coordinates_floor_down() {
        let batch = vec![vec![vec![-0.1]], vec![vec![0.0]], vec![vec![-0.05]]];
        assert_eq!(tracker(0, 1, 10.0).track(&batch).unwrap(), vec![1, 2, 2]);
    }

    #[test]
    fn test_empty_slice_is_one_cell() {
        let batch = vec![
            vec![vec![0.3, 7.0], vec![-2.0, 1.0]],
            vec![vec![5.0, 5.0], vec![1.0, 1.0]],
        ];
        assert_eq!(tracker(1, 1, 1.0).track(&batch).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_sub_slice_ignores_other_coordinates() {
        // Only coordinates 1..3 define the position.
        let batch = vec![
            vec![vec![0.0, 1.0, 1.0, 0.0]],
            vec![vec![9.0, 1.2, 1.9, -4.0]],
            vec![vec![9.0, 2.0, 1.0, -4.0]],
        ];
        assert_eq!(tracker(1, 3, 1.0).track(&batch).unwrap(), vec![1, 1, 2]);
    }

    #[test]
    fn test_shape_mismatch() {
        let short = vec![vec![vec![0.0, 0.0]], vec![vec![0.0]]];
        assert!(matches!(
            tracker(0, 2, 1.0).track(&short),
            Err(CoverageError::ShapeMismatch(_))
        ));

        let ragged = vec![vec![vec![0.0], vec![1.0]], vec![vec![0.0]]];
        assert!(matches!(
            tracker(0, 1, 1.0).track(&ragged),
            Err(CoverageError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let batch = vec![vec![vec![0.0, 0.0]]];
        for (slice, resolution) in [
            (SliceSpec::new(0, 2), 0.0),
            (SliceSpec::new(0, 2), -10.0),
            (SliceSpec::new(2, 1), 1.0),
            (SliceSpec::new(-1, 1), 1.0),
        ] {
            assert!(matches!(
                track_coverage(&batch, slice, resolution),
                Err(CoverageError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let batch = (0..97)
            .map(|t| {
                (0..3)
                    .map(|e| vec![(t as f64 * 0.37).sin() * 3.0, (t * e) as f64 * 0.11])
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let sequential = tracker(0, 2, 2.0).track(&batch).unwrap();

        for n_threads in [2, 3, 8, 200] {
            let config = CoverageConfig::default()
                .slice(0, 2)
                .resolution(2.0)
                .n_threads(n_threads);
            let parallel = CoverageTracker::new(config).unwrap().track(&batch).unwrap();
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn test_parallel_reports_earliest_error() {
        let mut batch = vec![vec![vec![0.0]]; 40];
        batch[31][0][0] = f64::NAN;
        batch[7][0][0] = f64::INFINITY;
        let config = CoverageConfig::default().slice(0, 1).n_threads(4);
        let err = CoverageTracker::new(config).unwrap().track(&batch).unwrap_err();
        assert_eq!(err, CoverageError::NonFiniteObservation { timestep: 7, env: 0 });
    }

    #[test]
    fn test_track_array() {
        let mut batch = Array3::<f64>::zeros((3, 2, 4));
        batch[[1, 1, 2]] = 1.5;
        batch[[2, 0, 3]] = -0.5;
        batch[[2, 1, 0]] = 100.0;

        let coverage = tracker(2, 4, 1.0).track_array(batch.view()).unwrap();
        assert_eq!(coverage, vec![1, 2, 3]);

        assert!(matches!(
            tracker(2, 5, 1.0).track_array(batch.view()),
            Err(CoverageError::ShapeMismatch(_))
        ));

        // The whole observation vector at resolution 2: cells differ at t = 1 and 2.
        let coverage = track_coverage_array(batch.view(), SliceSpec::full(4), 2.0).unwrap();
        assert_eq!(coverage, vec![1, 2, 4]);
    }

    #[test]
    fn test_empty_array_agrees_with_empty_batch() {
        // No frame, so the short observation length is never looked at.
        let batch = Array3::<f64>::zeros((0, 1, 1));
        let slice = SliceSpec::new(0, 2);
        assert_eq!(track_coverage_array(batch.view(), slice, 1.0), Ok(vec![]));
        let empty: Vec<Vec<Vec<f64>>> = vec![];
        assert_eq!(track_coverage(&empty, slice, 1.0), Ok(vec![]));

        let batch = Array3::<f64>::zeros((3, 0, 1));
        assert_eq!(track_coverage_array(batch.view(), slice, 1.0), Ok(vec![]));
    }

    #[test]
    fn test_coverage_record() {
        let record = coverage_record("coverage", &[1, 1, 2]);
        assert_eq!(record.get_array1("coverage").unwrap(), vec![1.0, 1.0, 2.0]);
        assert_eq!(record.get_scalar("coverage_final").unwrap(), 2.0);
        assert_eq!(coverage_record("c", &[]).get_scalar("c_final").unwrap(), 0.0);
    }
}
