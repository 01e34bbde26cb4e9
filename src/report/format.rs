//! Formatted terminal output: grid table, legend, summaries, market listing.
//!
//! Formatting is kept in one place so:
//! - the grid/statistics code stays free of presentation concerns
//! - output changes are localized

use crate::data::MarketStore;
use crate::domain::{COLUMN_COUNT, Column, PercentileBucket, PriceType, Thresholds};
use crate::grid::GridOutput;
use crate::io::ingest::NormalizeStats;
use crate::report::{CropSummary, FrequencyInfo, PriceMetric};

const YEAR_WIDTH: usize = 6;
const CELL_WIDTH: usize = 7;

/// Render the grid with one bucket marker after each value.
///
/// Zero cells print as `-`.
pub fn format_grid(out: &GridOutput) -> String {
    let mut s = String::new();

    s.push_str(&format!("{:<width$}", "Year", width = YEAR_WIDTH));
    for col in Column::ALL {
        s.push_str(&format!("{:>width$}", col.label(), width = CELL_WIDTH));
    }
    s.push('\n');
    s.push_str(&"-".repeat(YEAR_WIDTH + CELL_WIDTH * COLUMN_COUNT));
    s.push('\n');

    for (row, buckets) in out.grid.rows().iter().zip(out.buckets.rows.iter()) {
        s.push_str(&format!("{:<width$}", row.year, width = YEAR_WIDTH));
        for (&value, &bucket) in row.cells.iter().zip(buckets.cells.iter()) {
            let text = if value > 0 { value.to_string() } else { "-".to_string() };
            s.push_str(&format!("{:>width$}{}", text, bucket.marker(), width = CELL_WIDTH - 1));
        }
        s.push('\n');
    }

    s
}

/// One line per bucket: marker, name, band and (when known) the value range.
pub fn format_legend(thresholds: Option<&Thresholds>) -> String {
    let mut s = String::from("Legend:\n");
    for bucket in PercentileBucket::ALL {
        let range = thresholds.map(|t| bucket_range(bucket, t)).unwrap_or_default();
        s.push_str(
            format!(
                "  [{}] {:<10} {:<15} {}\n",
                bucket.marker(),
                bucket.display_name(),
                bucket.band(),
                range
            )
            .trim_end(),
        );
        s.push('\n');
    }
    s
}

/// Header block printed above a grid.
pub fn format_grid_header(market: &str, crop: &str, price_type: PriceType, out: &GridOutput) -> String {
    let mut s = String::new();
    s.push_str(&format!("=== {crop} Weekly Price Table - {market} Market ===\n"));
    s.push_str(&format!("Price Type: {}\n", price_type.display_name()));

    let years: Vec<i32> = out.grid.years().collect();
    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        s.push_str(&format!("Years: {first} to {last} | Weeks: {COLUMN_COUNT} columns\n"));
    }

    let fills: Vec<String> = out
        .rows
        .iter()
        .map(|f| format!("{}={}", f.row.year, f.kind.display_name()))
        .collect();
    if !fills.is_empty() {
        s.push_str(&format!("Fill: {}\n", fills.join(", ")));
    }
    s
}

pub fn format_summary(crop: &str, summary: &CropSummary) -> String {
    let mut s = String::new();
    s.push_str(&format!("Current Market Summary ({crop}, as of {}):\n", summary.latest_date));
    for m in [&summary.min, &summary.max, &summary.modal] {
        s.push_str(&format_metric(m));
        s.push('\n');
    }
    match summary.modal_volatility_pct {
        Some(v) => s.push_str(&format!("  {:<18} {v:.1}% (std/mean of modal price)\n", "Price Volatility")),
        None => s.push_str(&format!("  {:<18} n/a\n", "Price Volatility")),
    }
    s
}

pub fn format_frequency(info: &FrequencyInfo) -> String {
    format!(
        "Data Information:\n  From: {}\n  To: {}\n  Data points: {}\n  Data Pattern: Average {:.1} days between records ({})\n",
        info.first,
        info.last,
        info.n_records,
        info.mean_gap_days,
        info.cadence.display_name()
    )
}

/// Row counts from ingest, one line.
pub fn format_ingest_stats(stats: &NormalizeStats) -> String {
    format!(
        "Rows: read={} used={} dropped(date)={} dropped(price)={}",
        stats.rows_read,
        stats.rows_used(),
        stats.dropped_bad_date,
        stats.dropped_missing_price
    )
}

/// List markets and their crops.
pub fn format_market_list(store: &MarketStore) -> String {
    let mut s = String::new();
    for market in store.markets() {
        s.push_str(&format!("{} ({} crops, {})\n", market.name, market.crops.len(), format_ingest_stats(&market.stats)));
        for crop in &market.crops {
            s.push_str(&format!("  - {crop}\n"));
        }
    }
    s
}

fn format_metric(m: &PriceMetric) -> String {
    let label = format!("Latest {}", m.price_type.display_name());
    let delta = m
        .delta_pct
        .map(|d| format!("{d:+.1}% vs avg"))
        .unwrap_or_else(|| "n/a".to_string());
    format!("  {label:<18} {:>10.0}  ({delta})", m.latest)
}

fn bucket_range(bucket: PercentileBucket, t: &Thresholds) -> String {
    match bucket {
        PercentileBucket::NoData => "0".to_string(),
        PercentileBucket::VeryLow => format!("<= {:.0}", t.p25),
        PercentileBucket::Low => format!("{:.0} - {:.0}", t.p25, t.p50),
        PercentileBucket::Medium => format!("{:.0} - {:.0}", t.p50, t.p75),
        PercentileBucket::High => format!("{:.0} - {:.0}", t.p75, t.p90),
        PercentileBucket::VeryHigh => format!("> {:.0}", t.p90),
    }
}
