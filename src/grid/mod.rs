//! Weekly price grid construction.
//!
//! Responsibilities:
//!
//! - aggregate normalized records into year x week means (`filler`)
//! - fill unobserved weeks per year (`interpolate`)
//! - bucket cells by global percentiles (`classify`)
//! - run the three steps for one selection (`builder`)

pub mod builder;
pub mod classify;
pub mod filler;
pub mod interpolate;

pub use builder::*;
pub use classify::*;
pub use filler::*;
pub use interpolate::*;
