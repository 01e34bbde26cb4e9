//! Reconstruct unobserved weeks, one year row at a time.
//!
//! Per row:
//!
//! - no observed week: every cell is 0
//! - one observed week: every cell takes that value
//! - two or more: fit a curve through `(column position, rounded mean)`
//!   (not-a-knot cubic with 4+ samples, linear otherwise), evaluate it at all
//!   48 positions (extrapolating past the outer samples) and apply a
//!   multiplicative `N(0, 0.03)` jitter to the cells that were not observed
//!
//! Observed cells always carry their rounded mean, untouched by the curve or
//! the jitter. A cubic system that cannot be solved falls back to the linear
//! fit for that row only; a row where neither curve fits keeps only its
//! observed cells.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::domain::{COLUMN_COUNT, GridRow, YearWeekGrid};
use crate::grid::filler::{SparseGrid, SparseRow};
use crate::math::{CubicSpline, LinearInterpolant, round_price};

/// Standard deviation of the relative jitter on interpolated cells.
pub const JITTER_STD: f64 = 0.03;

/// Which path produced a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    /// No observed week; all zeros.
    Empty,
    /// Single observed week copied across the row.
    Constant,
    Linear,
    Cubic,
    /// Interpolation disabled; unobserved weeks are 0.
    PassThrough,
    /// Interpolation enabled but no curve could be fitted; unobserved weeks are 0.
    NoCurve,
}

impl FillKind {
    pub fn display_name(self) -> &'static str {
        match self {
            FillKind::Empty => "empty",
            FillKind::Constant => "constant",
            FillKind::Linear => "linear",
            FillKind::Cubic => "cubic",
            FillKind::PassThrough => "observed only",
            FillKind::NoCurve => "no curve",
        }
    }
}

/// A dense row together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledRow {
    pub row: GridRow,
    pub kind: FillKind,
}

enum Curve {
    Linear(LinearInterpolant),
    Cubic(CubicSpline),
}

impl Curve {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Curve::Linear(f) => f.eval(x),
            Curve::Cubic(f) => f.eval(x),
        }
    }

    fn kind(&self) -> FillKind {
        match self {
            Curve::Linear(_) => FillKind::Linear,
            Curve::Cubic(_) => FillKind::Cubic,
        }
    }
}

/// Densify every row of a sparse grid.
pub fn interpolate_grid<R: Rng + ?Sized>(
    sparse: &SparseGrid,
    interpolate: bool,
    rng: &mut R,
) -> (YearWeekGrid, Vec<FilledRow>) {
    let filled: Vec<FilledRow> = sparse
        .rows
        .iter()
        .map(|row| interpolate_row(row, interpolate, rng))
        .collect();
    let grid = YearWeekGrid::new(filled.iter().map(|f| f.row.clone()).collect());
    (grid, filled)
}

/// Densify one year row.
pub fn interpolate_row<R: Rng + ?Sized>(row: &SparseRow, interpolate: bool, rng: &mut R) -> FilledRow {
    let observed: Vec<(usize, f64)> = row
        .known()
        .into_iter()
        .map(|(i, v)| (i, v.round_ties_even()))
        .collect();

    let mut cells = [0u32; COLUMN_COUNT];
    for &(i, v) in &observed {
        cells[i] = round_price(v);
    }

    if !interpolate {
        return FilledRow {
            row: GridRow { year: row.year, cells },
            kind: FillKind::PassThrough,
        };
    }

    let kind = match observed.as_slice() {
        [] => FillKind::Empty,
        [(_, v)] => {
            cells = [round_price(*v); COLUMN_COUNT];
            FillKind::Constant
        }
        _ => match fit_curve(row.year, &observed) {
            Some(curve) => {
                for (pos, cell) in cells.iter_mut().enumerate() {
                    if row.cells[pos].is_some() {
                        continue;
                    }
                    let z: f64 = rng.sample(StandardNormal);
                    let fitted = curve.eval(pos as f64);
                    *cell = round_price(fitted * (1.0 + JITTER_STD * z));
                }
                curve.kind()
            }
            None => {
                tracing::warn!(year = row.year, "No usable curve; unobserved weeks left at 0");
                FillKind::NoCurve
            }
        },
    };

    tracing::debug!(
        year = row.year,
        observed = observed.len(),
        kind = kind.display_name(),
        "Row filled"
    );

    FilledRow {
        row: GridRow { year: row.year, cells },
        kind,
    }
}

fn fit_curve(year: i32, observed: &[(usize, f64)]) -> Option<Curve> {
    let xs: Vec<f64> = observed.iter().map(|(i, _)| *i as f64).collect();
    let ys: Vec<f64> = observed.iter().map(|(_, v)| *v).collect();

    if observed.len() >= CubicSpline::MIN_SAMPLES {
        match CubicSpline::not_a_knot(&xs, &ys) {
            Some(spline) => return Some(Curve::Cubic(spline)),
            None => tracing::warn!(year, "Cubic fit failed; falling back to linear"),
        }
    }

    LinearInterpolant::new(&xs, &ys).map(Curve::Linear)
}
