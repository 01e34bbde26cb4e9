//! Mathematical utilities: curve interpolants and descriptive statistics.

pub mod spline;
pub mod stats;

pub use spline::*;
pub use stats::*;
