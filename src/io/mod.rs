//! Input/output helpers.
//!
//! - market CSV ingest + record normalization (`ingest`)
//! - grid CSV export/re-import (`export`)
//! - grid JSON read/write (`grid_json`)

pub mod export;
pub mod grid_json;
pub mod ingest;

pub use export::*;
pub use grid_json::*;
pub use ingest::*;
