//! Streaming coverage counter.
use crate::{Cell, CoverageConfig, CoverageError};
use std::{collections::HashSet, ops::Range};
use xxhash_rust::xxh3::Xxh3Builder;

/// Running count of distinct cells, fed one frame at a time.
///
/// This is the fold step of [`CoverageTracker`](crate::CoverageTracker),
/// usable inside an environment loop where the whole batch is never
/// materialized.
///
/// ```
/// use toolbox_coverage::{CoverageConfig, CoverageCounter};
///
/// let config = CoverageConfig::default().slice(0, 2).resolution(10.0);
/// let mut counter = CoverageCounter::new(&config).unwrap();
/// assert_eq!(counter.push_frame(&[[0.05, 0.05]]).unwrap(), 1);
/// assert_eq!(counter.push_frame(&[[0.05, 0.05]]).unwrap(), 1);
/// assert_eq!(counter.push_frame(&[[0.91, 0.05]]).unwrap(), 2);
/// ```
pub struct CoverageCounter {
    range: Range<usize>,
    resolution: f64,
    n_envs: Option<usize>,
    n_frames: usize,
    visited: HashSet<Cell, Xxh3Builder>,
}

impl CoverageCounter {
    /// Constructs a counter with an empty visited-set.
    pub fn new(config: &CoverageConfig) -> Result<Self, CoverageError> {
        Ok(Self {
            range: config.validate()?,
            resolution: config.resolution,
            n_envs: None,
            n_frames: 0,
            visited: HashSet::default(),
        })
    }

    /// Adds the cells of one frame and returns the coverage after it.
    ///
    /// The number of environments is fixed by the first frame. An invalid
    /// frame leaves the counter untouched.
    pub fn push_frame<O>(&mut self, frame: &[O]) -> Result<usize, CoverageError>
    where
        O: AsRef<[f64]>,
    {
        let n_envs = *self.n_envs.get_or_insert(frame.len());
        let cells = frame_cells(frame, n_envs, self.n_frames, &self.range, self.resolution);
        if cells.is_err() && self.n_frames == 0 {
            self.n_envs = None;
        }
        Ok(self.fold(cells?))
    }

    /// Inserts already computed cells of one frame.
    pub(crate) fn fold(&mut self, cells: Vec<Cell>) -> usize {
        self.n_frames += 1;
        self.visited.extend(cells);
        self.visited.len()
    }

    /// Number of distinct cells seen so far.
    pub fn coverage(&self) -> usize {
        self.visited.len()
    }

    /// Same as [`CoverageCounter::coverage`].
    pub fn n_cells(&self) -> usize {
        self.coverage()
    }

    /// Number of frames folded in so far.
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Returns `true` if `cell` has been visited.
    pub fn contains(&self, cell: &Cell) -> bool {
        self.visited.contains(cell)
    }

    /// Forgets every visited cell and the number of environments.
    pub fn reset(&mut self) {
        self.visited.clear();
        self.n_envs = None;
        self.n_frames = 0;
    }
}

/// Discretizes the observations of one frame.
///
/// Fails if the frame does not hold `n_envs` observations or an observation
/// is shorter than `range.end`.
pub(crate) fn frame_cells<O>(
    frame: &[O],
    n_envs: usize,
    timestep: usize,
    range: &Range<usize>,
    resolution: f64,
) -> Result<Vec<Cell>, CoverageError>
where
    O: AsRef<[f64]>,
{
    if frame.len() != n_envs {
        return Err(CoverageError::ShapeMismatch(format!(
            "frame {} holds {} environments, expected {}",
            timestep,
            frame.len(),
            n_envs
        )));
    }

    frame
        .iter()
        .enumerate()
        .map(|(env, obs)| {
            let obs = obs.as_ref();
            let coords = obs.get(range.clone()).ok_or_else(|| {
                CoverageError::ShapeMismatch(format!(
                    "observation of env {} at timestep {} has length {}, slice ends at {}",
                    env,
                    timestep,
                    obs.len(),
                    range.end
                ))
            })?;
            Cell::from_coords(coords.iter().copied(), resolution, timestep, env)
        })
        .collect()
}
