//! Discretization of positions into lattice cells.
use crate::CoverageError;
use smallvec::SmallVec;

/// Integer lattice coordinate of a position, `floor(resolution * x)` per
/// coordinate.
///
/// Positions of up to four coordinates are stored inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell(SmallVec<[i64; 4]>);

// 2^63 is exactly representable, i64::MAX is not.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Cell {
    /// Discretizes the coordinates of the observation of environment `env`
    /// at `timestep`. The indices are only used for error reporting.
    ///
    /// Flooring goes towards negative infinity, so `-0.1` at resolution `10`
    /// lands in cell `-1`, not `0`.
    pub fn from_coords<I>(
        coords: I,
        resolution: f64,
        timestep: usize,
        env: usize,
    ) -> Result<Self, CoverageError>
    where
        I: IntoIterator<Item = f64>,
    {
        coords
            .into_iter()
            .map(|x| {
                let v = (resolution * x).floor();
                if v.is_finite() && v >= -I64_BOUND && v < I64_BOUND {
                    Ok(v as i64)
                } else {
                    Err(CoverageError::NonFiniteObservation { timestep, env })
                }
            })
            .collect::<Result<SmallVec<_>, _>>()
            .map(Self)
    }

    /// Number of coordinates.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// The lattice coordinates.
    pub fn coords(&self) -> &[i64] {
        &self.0
    }
}
