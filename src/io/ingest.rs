//! CSV ingest and record normalization.
//!
//! This module turns per-market CSV exports into clean, chronologically ordered
//! `PriceRecord`s:
//!
//! - **Strict schema** for required columns (a file without them is rejected)
//! - **Row-level leniency**: rows with an unparseable date or a missing price are
//!   dropped and counted, never fatal
//! - **Stable ordering**: records are sorted by date, ties keep file order

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::{PriceRecord, RawRecord};
use crate::error::AppError;

/// Columns every market file must provide (matched case-insensitively).
pub const REQUIRED_COLUMNS: [&str; 5] = ["arrival_date", "commodity", "min_price", "max_price", "modal_price"];

/// Row counts from one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub rows_read: usize,
    pub dropped_bad_date: usize,
    pub dropped_missing_price: usize,
}

impl NormalizeStats {
    pub fn rows_used(&self) -> usize {
        self.rows_read - self.dropped_bad_date - self.dropped_missing_price
    }
}

/// Normalized records plus what was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<PriceRecord>,
    pub stats: NormalizeStats,
}

/// Parse dates, drop incomplete rows, sort ascending by date (stable).
pub fn normalize_records<I>(raw: I) -> Normalized
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut stats = NormalizeStats::default();
    let mut records = Vec::new();

    for row in raw {
        stats.rows_read += 1;

        let Some(date) = parse_date(&row.date) else {
            stats.dropped_bad_date += 1;
            continue;
        };
        let (Some(min_price), Some(max_price), Some(modal_price)) = (
            finite(row.min_price),
            finite(row.max_price),
            finite(row.modal_price),
        ) else {
            stats.dropped_missing_price += 1;
            continue;
        };

        records.push(PriceRecord {
            date,
            min_price,
            max_price,
            modal_price,
            commodity: row.commodity,
            market: row.market,
        });
    }

    records.sort_by_key(|r| r.date);

    tracing::debug!(
        rows_read = stats.rows_read,
        dropped_bad_date = stats.dropped_bad_date,
        dropped_missing_price = stats.dropped_missing_price,
        "Records normalized"
    );

    Normalized { records, stats }
}

/// Read every row of a market CSV as raw records tagged with `market`.
///
/// Fails if the file cannot be opened or lacks a required column. Rows that the
/// CSV reader cannot decode become records with an empty date, so they are
/// counted as dropped by `normalize_records`.
pub fn read_market_csv(path: &Path, market: &str) -> Result<Vec<RawRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers of '{}': {e}", path.display())))?
        .clone();
    let header_map = build_header_map(&headers);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::input(format!(
            "'{}' is missing required column(s): {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let Ok(record) = result else {
            rows.push(RawRecord {
                market: market.to_string(),
                ..RawRecord::default()
            });
            continue;
        };
        rows.push(RawRecord {
            date: get_field(&record, &header_map, "arrival_date").unwrap_or_default().to_string(),
            min_price: parse_opt_f64(get_field(&record, &header_map, "min_price")),
            max_price: parse_opt_f64(get_field(&record, &header_map, "max_price")),
            modal_price: parse_opt_f64(get_field(&record, &header_map, "modal_price")),
            commodity: get_field(&record, &header_map, "commodity").unwrap_or_default().to_string(),
            market: market.to_string(),
        });
    }

    Ok(rows)
}

/// Parse a date in one of the accepted formats.
///
/// Date-only: `YYYY-MM-DD`, `DD/MM/YYYY`, `DD-MM-YYYY`, `YYYY/MM/DD`,
/// `DD-Mon-YYYY`. Slash dates are always read day-first. Any of the first
/// three may carry a `HH:MM:SS` suffix.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const DATE_FMTS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d-%b-%Y"];
    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d-%m-%Y %H:%M:%S",
    ];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FMTS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FMTS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_field<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
