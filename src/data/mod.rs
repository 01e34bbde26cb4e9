//! Market data sources.

pub mod store;

pub use store::*;
