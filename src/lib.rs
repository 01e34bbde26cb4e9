//! `weekly-price-grid` library crate.
//!
//! The binary (`wpg`) is a thin wrapper around this library so that:
//!
//! - grid construction is testable without spawning processes
//! - the same pipeline can back other front-ends (dashboards, notebooks)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod grid;
pub mod io;
pub mod logging;
pub mod math;
pub mod report;
