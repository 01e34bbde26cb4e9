//! Shared domain types.
//!
//! These are kept small and serializable so they can be:
//!
//! - built by ingest and consumed by the grid builder
//! - rendered in the terminal
//! - exported to CSV/JSON

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::column::{COLUMN_COUNT, Column};

/// Which price field to grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Modal,
    Min,
    Max,
}

impl PriceType {
    /// Source column name, as found in market CSV headers and export names.
    pub fn column_name(self) -> &'static str {
        match self {
            PriceType::Modal => "Modal_Price",
            PriceType::Min => "Min_Price",
            PriceType::Max => "Max_Price",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            PriceType::Modal => "Modal Price",
            PriceType::Min => "Min Price",
            PriceType::Max => "Max Price",
        }
    }
}

/// A raw row before normalization.
///
/// Prices are optional because source exports regularly leave cells blank.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub date: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub modal_price: Option<f64>,
    pub commodity: String,
    pub market: String,
}

/// A normalized observation: parsed date, all three prices present.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
    pub commodity: String,
    pub market: String,
}

impl PriceRecord {
    pub fn price(&self, price_type: PriceType) -> f64 {
        match price_type {
            PriceType::Modal => self.modal_price,
            PriceType::Min => self.min_price,
            PriceType::Max => self.max_price,
        }
    }
}

/// How a single grid build is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub price_type: PriceType,
    /// Fill unobserved weeks from the fitted curve. When off, unobserved weeks are 0.
    pub interpolate: bool,
    /// Seed for the jitter RNG. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            price_type: PriceType::Modal,
            interpolate: true,
            seed: None,
        }
    }
}

/// One dense year row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub year: i32,
    pub cells: [u32; COLUMN_COUNT],
}

/// Dense `(year, column) -> price` table with rows in ascending year order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearWeekGrid {
    rows: Vec<GridRow>,
}

impl YearWeekGrid {
    /// Build a grid; rows are sorted by year.
    pub fn new(mut rows: Vec<GridRow>) -> Self {
        rows.sort_by_key(|r| r.year);
        Self { rows }
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.iter().map(|r| r.year)
    }

    pub fn row(&self, year: i32) -> Option<&GridRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    pub fn get(&self, year: i32, column: Column) -> Option<u32> {
        self.row(year).map(|r| r.cells[column.index()])
    }

    /// Every cell value, row by row.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.iter().flat_map(|r| r.cells.iter().copied())
    }
}

/// Qualitative price class of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PercentileBucket {
    NoData,
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl PercentileBucket {
    pub const ALL: [PercentileBucket; 6] = [
        PercentileBucket::NoData,
        PercentileBucket::VeryLow,
        PercentileBucket::Low,
        PercentileBucket::Medium,
        PercentileBucket::High,
        PercentileBucket::VeryHigh,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            PercentileBucket::NoData => "No Data",
            PercentileBucket::VeryLow => "Very Low",
            PercentileBucket::Low => "Low",
            PercentileBucket::Medium => "Medium",
            PercentileBucket::High => "High",
            PercentileBucket::VeryHigh => "Very High",
        }
    }

    /// Single-character marker used by the terminal table.
    pub fn marker(self) -> char {
        match self {
            PercentileBucket::NoData => ' ',
            PercentileBucket::VeryLow => '_',
            PercentileBucket::Low => '-',
            PercentileBucket::Medium => '=',
            PercentileBucket::High => '+',
            PercentileBucket::VeryHigh => '#',
        }
    }

    /// Percentile band described in the legend.
    pub fn band(self) -> &'static str {
        match self {
            PercentileBucket::NoData => "zero / missing",
            PercentileBucket::VeryLow => "bottom 25%",
            PercentileBucket::Low => "25-50%",
            PercentileBucket::Medium => "50-75%",
            PercentileBucket::High => "75-90%",
            PercentileBucket::VeryHigh => "top 10%",
        }
    }
}

/// Percentile cut points over the positive cells of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

/// One year of buckets, parallel to a `GridRow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRow {
    pub year: i32,
    pub cells: [PercentileBucket; COLUMN_COUNT],
}

/// Bucket assignment for every cell of a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketGrid {
    pub rows: Vec<BucketRow>,
}

impl BucketGrid {
    pub fn get(&self, year: i32, column: Column) -> Option<PercentileBucket> {
        self.rows
            .iter()
            .find(|r| r.year == year)
            .map(|r| r.cells[column.index()])
    }
}
