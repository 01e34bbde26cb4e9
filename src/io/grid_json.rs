//! Read/write grid JSON files.
//!
//! Grid JSON is the presentation-ready representation of one selection:
//! - selection metadata (market, crop, price type, interpolation toggle)
//! - the 48 column labels
//! - per-year values with their percentile buckets
//! - the thresholds used for bucketing

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Column, PercentileBucket, PriceType, Thresholds};
use crate::error::AppError;
use crate::grid::GridOutput;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFile {
    pub tool: String,
    pub market: String,
    pub crop: String,
    pub price_type: PriceType,
    pub interpolated: bool,
    pub columns: Vec<String>,
    pub rows: Vec<GridFileRow>,
    pub thresholds: Option<Thresholds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFileRow {
    pub year: i32,
    pub values: Vec<u32>,
    pub buckets: Vec<PercentileBucket>,
}

impl GridFile {
    pub fn from_output(market: &str, crop: &str, price_type: PriceType, interpolated: bool, out: &GridOutput) -> Self {
        let rows = out
            .grid
            .rows()
            .iter()
            .zip(out.buckets.rows.iter())
            .map(|(g, b)| GridFileRow {
                year: g.year,
                values: g.cells.to_vec(),
                buckets: b.cells.to_vec(),
            })
            .collect();

        Self {
            tool: "wpg".to_string(),
            market: market.to_string(),
            crop: crop.to_string(),
            price_type,
            interpolated,
            columns: Column::ALL.iter().map(|c| c.label().to_string()).collect(),
            rows,
            thresholds: out.thresholds,
        }
    }
}

/// Write a grid JSON file.
pub fn write_grid_json(path: &Path, grid: &GridFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create grid JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, grid)
        .map_err(|e| AppError::internal(format!("Failed to write grid JSON: {e}")))?;
    Ok(())
}

/// Read a grid JSON file.
pub fn read_grid_json(path: &Path) -> Result<GridFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open grid JSON '{}': {e}", path.display())))?;
    let grid: GridFile =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid grid JSON: {e}")))?;
    Ok(grid)
}
