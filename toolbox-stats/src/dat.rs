//! Export of aggregated curves as `.dat` files.
//!
//! A `.dat` file is a header line followed by whitespace-separated rows.
//! Timesteps are written as integers and statistics with three decimals:
//!
//! ```text
//! timestep med q0.05 q0.95
//! 25000 0.080 0.070 0.090
//! ```
use crate::{aggregate, Curves, StatsError};
use anyhow::Result;
use csv::WriterBuilder;
use ndarray::{Array1, ArrayView2};
use std::{fs::File, io::Write, path::Path};

/// Number of thresholds of a saved performance profile.
pub const N_THRESHOLDS: usize = 50;

/// Columns of a `.dat` file.
///
/// The first column is the abscissa, the others are statistics sharing its
/// length.
pub struct DatTable {
    header: Vec<String>,
    first: Vec<String>,
    columns: Vec<Array1<f32>>,
}

impl DatTable {
    /// A table whose first column holds integer timesteps.
    pub fn with_timesteps(name: &str, timesteps: &[i64]) -> Self {
        Self {
            header: vec![name.to_string()],
            first: timesteps.iter().map(|t| t.to_string()).collect(),
            columns: vec![],
        }
    }

    /// A table whose first column holds real-valued thresholds.
    pub fn with_thresholds(name: &str, thresholds: &[f32]) -> Self {
        Self {
            header: vec![name.to_string()],
            first: thresholds.iter().map(|t| format!("{:.3}", t)).collect(),
            columns: vec![],
        }
    }

    /// Appends a column of statistics.
    pub fn column(mut self, name: impl Into<String>, values: Array1<f32>) -> Result<Self, StatsError> {
        if values.len() != self.first.len() {
            return Err(StatsError::ShapeMismatch(format!(
                "column of length {}, expected {}",
                values.len(),
                self.first.len()
            )));
        }
        self.header.push(name.into());
        self.columns.push(values);
        Ok(self)
    }

    /// Writes the table.
    pub fn write<W: Write>(&self, wtr: W) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(wtr);
        wtr.write_record(&self.header)?;
        for (i, first) in self.first.iter().enumerate() {
            let row = std::iter::once(first.clone())
                .chain(self.columns.iter().map(|c| format!("{:.3}", c[i])));
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes the table to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.write(File::create(path)?)?;
        log::info!("Saved {} rows to {:?}", self.first.len(), path);
        Ok(())
    }
}

fn maybe_rescale(curves: &Curves, target_length: Option<usize>) -> Result<Curves, StatsError> {
    match target_length {
        Some(n) => curves.rescale(n),
        None => Ok(curves.clone()),
    }
}

/// Saves the median over runs and, optionally, quantiles.
///
/// With `quantiles = [0.05, 0.95]` the header is `timestep med q0.05 q0.95`.
/// When `target_length` is given, the curves are downsampled first.
pub fn save_median(
    curves: &Curves,
    path: impl AsRef<Path>,
    target_length: Option<usize>,
    quantiles: &[f32],
) -> Result<()> {
    let curves = maybe_rescale(curves, target_length)?;
    let values = curves.values.view();
    let timesteps = curves.timesteps.to_vec();

    let mut table = DatTable::with_timesteps("timestep", &timesteps)
        .column("med", aggregate::median(values)?)?;
    for &q in quantiles {
        table = table.column(format!("q{}", q), aggregate::quantile(values, q)?)?;
    }
    table.save(path)
}

/// Saves the interquartile mean over runs.
pub fn save_iqm(curves: &Curves, path: impl AsRef<Path>, target_length: Option<usize>) -> Result<()> {
    let curves = maybe_rescale(curves, target_length)?;
    let timesteps = curves.timesteps.to_vec();
    DatTable::with_timesteps("timestep", &timesteps)
        .column("iqm", aggregate::iqm(curves.values.view())?)?
        .save(path)
}

/// Saves the performance profile of `values` at [`N_THRESHOLDS`] thresholds
/// evenly spaced between `min_val` and `max_val`.
///
/// The header is `thresholds med`, the column name read by existing plot
/// scripts.
pub fn save_performance_profile(
    values: ArrayView2<f32>,
    min_val: f32,
    max_val: f32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let thresholds = aggregate::linspace(min_val, max_val, N_THRESHOLDS);
    let profile = aggregate::performance_profile(values, &thresholds)?;
    DatTable::with_thresholds("thresholds", &thresholds)
        .column("med", profile)?
        .save(path)
}
