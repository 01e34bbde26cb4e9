//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed week-column layout (`Column`)
//! - raw and normalized price observations (`RawRecord`, `PriceRecord`)
//! - grid outputs (`YearWeekGrid`, `BucketGrid`, `Thresholds`)

pub mod column;
pub mod types;

pub use column::*;
pub use types::*;
