//! One-dimensional interpolants with polynomial extrapolation.
//!
//! Two curve shapes are used to reconstruct missing weeks:
//!
//! - piecewise linear through the samples
//! - a cubic spline with *not-a-knot* end conditions (the third derivative is
//!   continuous across the second and the second-to-last knot)
//!
//! Both extrapolate past the outer samples by extending the first/last piece,
//! so values outside the sampled range follow the same fitted function.
//!
//! The spline is solved in second-derivative form:
//!
//! ```text
//! S_i(x) = M_i a^3/(6h) + M_{i+1} b^3/(6h) + (y_i/h - M_i h/6) a + (y_{i+1}/h - M_{i+1} h/6) b
//! a = x_{i+1} - x,  b = x - x_i,  h = x_{i+1} - x_i
//! ```

use nalgebra::{DMatrix, DVector};

/// Piecewise-linear interpolant.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    /// Requires at least 2 samples with strictly increasing, finite `xs`.
    pub fn new(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if !valid_samples(xs, ys, 2) {
            return None;
        }
        Some(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let i = segment_index(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let u = (x - x0) / (x1 - x0);
        y0 + u * (y1 - y0)
    }
}

/// Cubic spline with not-a-knot end conditions.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Minimum number of samples for a not-a-knot cubic.
    pub const MIN_SAMPLES: usize = 4;

    /// Fit the spline.
    ///
    /// Returns `None` if the samples are invalid or the linear system cannot be
    /// solved to finite values.
    pub fn not_a_knot(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if !valid_samples(xs, ys, Self::MIN_SAMPLES) {
            return None;
        }

        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        let mut a = DMatrix::<f64>::zeros(n, n);
        let mut rhs = DVector::<f64>::zeros(n);

        // Third derivative continuous at x_1.
        a[(0, 0)] = h[1];
        a[(0, 1)] = -(h[0] + h[1]);
        a[(0, 2)] = h[0];

        for i in 1..n - 1 {
            a[(i, i - 1)] = h[i - 1];
            a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            a[(i, i + 1)] = h[i];
            rhs[i] = 6.0 * (slope[i] - slope[i - 1]);
        }

        // Third derivative continuous at x_{n-2}.
        a[(n - 1, n - 3)] = h[n - 2];
        a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
        a[(n - 1, n - 1)] = h[n - 3];

        let m = a.lu().solve(&rhs)?;
        if !m.iter().all(|v| v.is_finite()) {
            return None;
        }

        Some(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m: m.iter().copied().collect(),
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let i = segment_index(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);

        let h = x1 - x0;
        let a = x1 - x;
        let b = x - x0;

        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}

fn valid_samples(xs: &[f64], ys: &[f64], min_len: usize) -> bool {
    xs.len() == ys.len()
        && xs.len() >= min_len
        && xs.iter().chain(ys).all(|v| v.is_finite())
        && xs.windows(2).all(|w| w[1] > w[0])
}

/// Index of the piece used to evaluate `x`; outer pieces cover extrapolation.
fn segment_index(xs: &[f64], x: f64) -> usize {
    let last = xs.len() - 2;
    if x <= xs[0] {
        return 0;
    }
    xs.partition_point(|&k| k <= x).saturating_sub(1).min(last)
}
