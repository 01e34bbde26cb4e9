//! Percentile bucketing of a dense grid.
//!
//! Thresholds come from the positive cells of the whole grid (all years). Zero
//! cells are "no data"; upper bounds are inclusive, so a value sitting exactly on
//! a threshold takes the lower bucket.

use crate::domain::{BucketGrid, BucketRow, COLUMN_COUNT, PercentileBucket, Thresholds, YearWeekGrid};
use crate::math::percentile;

/// Bucket assignment plus the thresholds it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub buckets: BucketGrid,
    /// `None` when the grid has no positive cell.
    pub thresholds: Option<Thresholds>,
}

/// Compute p25/p50/p75/p90 over the grid's positive cells.
pub fn compute_thresholds(grid: &YearWeekGrid) -> Option<Thresholds> {
    let mut positive: Vec<f64> = grid.values().filter(|&v| v > 0).map(f64::from).collect();
    positive.sort_by(|a, b| a.total_cmp(b));

    Some(Thresholds {
        p25: percentile(&positive, 25.0)?,
        p50: percentile(&positive, 50.0)?,
        p75: percentile(&positive, 75.0)?,
        p90: percentile(&positive, 90.0)?,
    })
}

/// Bucket for a single cell value.
pub fn classify_value(value: u32, thresholds: Option<&Thresholds>) -> PercentileBucket {
    let Some(t) = thresholds else {
        return PercentileBucket::NoData;
    };
    if value == 0 {
        return PercentileBucket::NoData;
    }
    let v = f64::from(value);
    if v <= t.p25 {
        PercentileBucket::VeryLow
    } else if v <= t.p50 {
        PercentileBucket::Low
    } else if v <= t.p75 {
        PercentileBucket::Medium
    } else if v <= t.p90 {
        PercentileBucket::High
    } else {
        PercentileBucket::VeryHigh
    }
}

/// Classify every cell of the grid.
pub fn classify(grid: &YearWeekGrid) -> Classification {
    let thresholds = compute_thresholds(grid);

    let rows = grid
        .rows()
        .iter()
        .map(|row| {
            let mut cells = [PercentileBucket::NoData; COLUMN_COUNT];
            for (bucket, &value) in cells.iter_mut().zip(row.cells.iter()) {
                *bucket = classify_value(value, thresholds.as_ref());
            }
            BucketRow { year: row.year, cells }
        })
        .collect();

    Classification {
        buckets: BucketGrid { rows },
        thresholds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, GridRow};

    fn grid_with(values: &[u32]) -> YearWeekGrid {
        let mut cells = [0u32; COLUMN_COUNT];
        cells[..values.len()].copy_from_slice(values);
        YearWeekGrid::new(vec![GridRow { year: 2023, cells }])
    }

    #[test]
    fn five_value_distribution() {
        let grid = grid_with(&[50, 80, 120, 200, 400]);
        let c = classify(&grid);
        let t = c.thresholds.unwrap();
        assert_eq!((t.p25, t.p50, t.p75), (80.0, 120.0, 200.0));
        assert!((t.p90 - 320.0).abs() < 1e-9);

        let at = |i: usize| c.buckets.get(2023, Column::ALL[i]).unwrap();
        assert_eq!(at(0), PercentileBucket::VeryLow);
        assert_eq!(at(1), PercentileBucket::VeryLow);
        // Exactly on p50: inclusive bound resolves to the lower bucket.
        assert_eq!(at(2), PercentileBucket::Low);
        assert_eq!(at(3), PercentileBucket::Medium);
        assert_eq!(at(4), PercentileBucket::VeryHigh);
        // Zero padding cells.
        assert_eq!(at(5), PercentileBucket::NoData);
    }

    #[test]
    fn between_thresholds() {
        let t = Thresholds { p25: 80.0, p50: 120.0, p75: 200.0, p90: 320.0 };
        assert_eq!(classify_value(121, Some(&t)), PercentileBucket::Medium);
        assert_eq!(classify_value(250, Some(&t)), PercentileBucket::High);
        assert_eq!(classify_value(320, Some(&t)), PercentileBucket::High);
        assert_eq!(classify_value(321, Some(&t)), PercentileBucket::VeryHigh);
        assert_eq!(classify_value(0, Some(&t)), PercentileBucket::NoData);
    }

    #[test]
    fn all_zero_grid_is_no_data() {
        let c = classify(&grid_with(&[]));
        assert!(c.thresholds.is_none());
        assert!(c.buckets.rows[0].cells.iter().all(|&b| b == PercentileBucket::NoData));
    }

    #[test]
    fn classification_is_idempotent() {
        let grid = YearWeekGrid::new(vec![
            GridRow { year: 2022, cells: std::array::from_fn(|i| (i as u32 * 7) % 50) },
            GridRow { year: 2023, cells: std::array::from_fn(|i| 100 + i as u32) },
        ]);
        assert_eq!(classify(&grid), classify(&grid));
    }

    #[test]
    fn empty_grid_has_no_rows() {
        let c = classify(&YearWeekGrid::default());
        assert!(c.buckets.rows.is_empty());
        assert!(c.thresholds.is_none());
    }
}
