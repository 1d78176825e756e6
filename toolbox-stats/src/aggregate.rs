//! Per-timestep statistics over runs.
//!
//! Every function takes values of shape `(n_runs, n_timesteps)` and reduces
//! each column. These are point estimates; no confidence interval is
//! computed.
use crate::StatsError;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

fn sorted(column: ArrayView1<f32>) -> Vec<f32> {
    let mut vs = column.to_vec();
    vs.sort_by(|a, b| a.total_cmp(b));
    vs
}

fn check_runs(values: &ArrayView2<f32>) -> Result<(), StatsError> {
    if values.nrows() == 0 {
        return Err(StatsError::InvalidArgument(
            "at least one run is required".to_string(),
        ));
    }
    Ok(())
}

/// Linear interpolation between the order statistics of sorted `vs`.
fn interpolate(vs: &[f32], q: f32) -> f32 {
    let pos = q * (vs.len() - 1) as f32;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    vs[lo] + (vs[hi] - vs[lo]) * (pos - lo as f32)
}

/// Median over runs; the mean of the two middle values for an even number
/// of runs.
pub fn median(values: ArrayView2<f32>) -> Result<Array1<f32>, StatsError> {
    quantile(values, 0.5)
}

/// The `q`-quantile over runs, linearly interpolated between order
/// statistics.
pub fn quantile(values: ArrayView2<f32>, q: f32) -> Result<Array1<f32>, StatsError> {
    check_runs(&values)?;
    if !(0.0..=1.0).contains(&q) {
        return Err(StatsError::InvalidArgument(format!(
            "quantile must be in [0, 1], got {}",
            q
        )));
    }
    Ok(values.map_axis(Axis(0), |column| interpolate(&sorted(column), q)))
}

/// Interquartile mean over runs: the mean of the values left after dropping
/// the lowest and highest `floor(n_runs / 4)` of them.
pub fn iqm(values: ArrayView2<f32>) -> Result<Array1<f32>, StatsError> {
    check_runs(&values)?;
    let cut = values.nrows() / 4;
    Ok(values.map_axis(Axis(0), |column| {
        let vs = sorted(column);
        let kept = &vs[cut..vs.len() - cut];
        kept.iter().sum::<f32>() / kept.len() as f32
    }))
}

/// Fraction of all scores strictly greater than each threshold.
///
/// `values` holds the scores of every run, e.g. `(n_runs, n_evals)`.
pub fn performance_profile(
    values: ArrayView2<f32>,
    thresholds: &[f32],
) -> Result<Array1<f32>, StatsError> {
    if values.is_empty() {
        return Err(StatsError::InvalidArgument(
            "at least one score is required".to_string(),
        ));
    }
    let n = values.len() as f32;
    Ok(thresholds
        .iter()
        .map(|&tau| values.iter().filter(|&&v| v > tau).count() as f32 / n)
        .collect())
}

/// `n` evenly spaced values from `min` to `max`, both included.
pub fn linspace(min: f32, max: f32, n: usize) -> Vec<f32> {
    match n {
        0 => vec![],
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f32;
            (0..n)
                .map(|i| if i == n - 1 { max } else { min + step * i as f32 })
                .collect()
        }
    }
}
