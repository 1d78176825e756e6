//! Highest value reached so far across parallel environments.
use crate::CoverageError;
use ndarray::ArrayView2;

/// Returns, for each timestep, the highest value any environment has reached
/// up to and including it.
///
/// `heights` has shape `(timesteps, envs)`, e.g. the height of the object in
/// a pick-and-place task. An empty input gives an empty sequence.
///
/// ```
/// use ndarray::array;
/// use toolbox_coverage::highest_so_far;
///
/// let heights = array![[0.4f32, 0.1], [0.2, 0.5], [0.3, 0.3]];
/// assert_eq!(highest_so_far(heights.view()).unwrap(), vec![0.4, 0.5, 0.5]);
/// ```
pub fn highest_so_far(heights: ArrayView2<f32>) -> Result<Vec<f32>, CoverageError> {
    let (n_steps, n_envs) = heights.dim();
    if n_steps == 0 || n_envs == 0 {
        return Ok(vec![]);
    }

    let mut highest = f32::NEG_INFINITY;
    heights
        .outer_iter()
        .enumerate()
        .map(|(t, frame)| {
            for (env, &h) in frame.iter().enumerate() {
                if h.is_nan() {
                    return Err(CoverageError::NonFiniteObservation { timestep: t, env });
                }
                highest = highest.max(h);
            }
            Ok(highest)
        })
        .collect()
}
