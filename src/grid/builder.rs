//! End-to-end grid construction: fill -> interpolate -> classify.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{BucketGrid, GridConfig, PriceRecord, Thresholds, YearWeekGrid};
use crate::grid::classify::classify;
use crate::grid::filler::fill_grid;
use crate::grid::interpolate::{FilledRow, interpolate_grid};

/// A finished grid and its presentation buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOutput {
    pub grid: YearWeekGrid,
    pub buckets: BucketGrid,
    pub thresholds: Option<Thresholds>,
    /// How each year row was filled, in year order.
    pub rows: Vec<FilledRow>,
}

/// Result of a grid build.
#[derive(Debug, Clone, PartialEq)]
pub enum GridOutcome {
    /// The selection produced no cleaned records.
    NoData,
    Ready(GridOutput),
}

impl GridOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, GridOutcome::NoData)
    }

    pub fn output(&self) -> Option<&GridOutput> {
        match self {
            GridOutcome::NoData => None,
            GridOutcome::Ready(out) => Some(out),
        }
    }
}

/// Build a grid drawing jitter from `rng`.
pub fn build_grid<R: Rng + ?Sized>(records: &[PriceRecord], config: &GridConfig, rng: &mut R) -> GridOutcome {
    let sparse = fill_grid(records, config.price_type);
    if sparse.is_empty() {
        tracing::info!(price_type = config.price_type.column_name(), "No records to grid");
        return GridOutcome::NoData;
    }

    let (grid, rows) = interpolate_grid(&sparse, config.interpolate, rng);
    let classification = classify(&grid);

    tracing::debug!(
        years = grid.len(),
        interpolate = config.interpolate,
        "Grid built"
    );

    GridOutcome::Ready(GridOutput {
        grid,
        buckets: classification.buckets,
        thresholds: classification.thresholds,
        rows,
    })
}

/// Jitter RNG for a grid request; entropy-seeded when `seed` is unset.
pub fn jitter_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Build a grid with an RNG derived from `config.seed`.
pub fn build_grid_seeded(records: &[PriceRecord], config: &GridConfig) -> GridOutcome {
    build_grid(records, config, &mut jitter_rng(config.seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{COLUMN_COUNT, Column, PercentileBucket, PriceType};

    fn rec(date: NaiveDate, modal: f64) -> PriceRecord {
        PriceRecord {
            date,
            min_price: modal * 0.9,
            max_price: modal * 1.1,
            modal_price: modal,
            commodity: "Wheat".to_string(),
            market: "Indore".to_string(),
        }
    }

    fn seeded(seed: u64) -> GridConfig {
        GridConfig {
            price_type: PriceType::Modal,
            interpolate: true,
            seed: Some(seed),
        }
    }

    /// A date inside the given ISO week of `year`.
    fn in_week(year: i32, week: u32) -> NaiveDate {
        NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Wed).unwrap()
    }

    #[test]
    fn no_records_is_no_data() {
        let outcome = build_grid_seeded(&[], &seeded(1));
        assert!(outcome.is_no_data());
        assert!(outcome.output().is_none());
    }

    #[test]
    fn linear_scenario_keeps_observed_cells() {
        // Jan_W1 = 100, Mar_W2 = 140.
        let records = vec![rec(in_week(2023, 1), 100.0), rec(in_week(2023, 10), 140.0)];
        let outcome = build_grid_seeded(&records, &seeded(2023));
        let out = outcome.output().unwrap();

        assert_eq!(out.grid.len(), 1);
        let jan_w1 = "Jan_W1".parse::<Column>().unwrap();
        let mar_w2 = "Mar_W2".parse::<Column>().unwrap();
        assert_eq!(mar_w2.index(), 9);
        assert_eq!(out.grid.get(2023, jan_w1), Some(100));
        assert_eq!(out.grid.get(2023, mar_w2), Some(140));
        assert!(out.thresholds.is_some());
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let records: Vec<PriceRecord> = [(2022, 3, 180.0), (2022, 14, 220.0), (2022, 30, 150.0), (2022, 44, 260.0)]
            .iter()
            .map(|&(y, w, p)| rec(in_week(y, w), p))
            .collect();
        let a = build_grid_seeded(&records, &seeded(99));
        let b = build_grid_seeded(&records, &seeded(99));
        assert_eq!(a, b);
    }

    #[test]
    fn years_with_no_mapped_week_are_zero_rows() {
        // ISO week 25 has no column.
        let records = vec![rec(in_week(2020, 25), 300.0), rec(in_week(2021, 5), 120.0)];
        let out = build_grid_seeded(&records, &seeded(4)).output().cloned().unwrap();
        assert_eq!(out.grid.years().collect::<Vec<_>>(), vec![2020, 2021]);
        assert!(out.grid.row(2020).unwrap().cells.iter().all(|&c| c == 0));
        assert!(out.grid.row(2021).unwrap().cells.iter().all(|&c| c == 120));
        let b = &out.buckets.rows[0];
        assert_eq!(b.cells, [PercentileBucket::NoData; COLUMN_COUNT]);
    }

    #[test]
    fn disabled_interpolation_is_observed_only() {
        let records = vec![rec(in_week(2023, 1), 100.0), rec(in_week(2023, 10), 140.0)];
        let config = GridConfig {
            interpolate: false,
            ..seeded(1)
        };
        let out = build_grid_seeded(&records, &config).output().cloned().unwrap();
        let row = out.grid.row(2023).unwrap();
        assert_eq!(row.cells.iter().filter(|&&c| c > 0).count(), 2);
    }
}
