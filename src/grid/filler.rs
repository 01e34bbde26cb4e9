//! Aggregate normalized records into a sparse year x week matrix.
//!
//! A record lands in the row of its calendar year and the column whose ISO
//! week it falls in. Records whose ISO week has no column still make their
//! year appear (as a row with no known cells).

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::{COLUMN_COUNT, Column, PriceRecord, PriceType};

/// One year of per-week means; `None` marks an unobserved week.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseRow {
    pub year: i32,
    pub cells: [Option<f64>; COLUMN_COUNT],
}

impl SparseRow {
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            cells: [None; COLUMN_COUNT],
        }
    }

    /// `(position, mean)` for every observed column, in column order.
    pub fn known(&self) -> Vec<(usize, f64)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|v| (i, v)))
            .collect()
    }

    pub fn known_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Sparse grid with rows in ascending year order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseGrid {
    pub rows: Vec<SparseRow>,
}

impl SparseGrid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Acc {
    sum: f64,
    n: usize,
}

/// Build the sparse grid of mean prices for one price field.
pub fn fill_grid(records: &[PriceRecord], price_type: PriceType) -> SparseGrid {
    let mut years: BTreeMap<i32, [Acc; COLUMN_COUNT]> = BTreeMap::new();
    let mut unmapped = 0usize;

    for rec in records {
        let accs = years
            .entry(rec.date.year())
            .or_insert([Acc::default(); COLUMN_COUNT]);

        let Some(col) = Column::from_iso_week(rec.date.iso_week().week()) else {
            unmapped += 1;
            continue;
        };
        let acc = &mut accs[col.index()];
        acc.sum += rec.price(price_type);
        acc.n += 1;
    }

    if unmapped > 0 {
        tracing::debug!(unmapped, "Records outside the week-column table were skipped");
    }

    let rows = years
        .into_iter()
        .map(|(year, accs)| {
            let mut row = SparseRow::empty(year);
            for (cell, acc) in row.cells.iter_mut().zip(accs.iter()) {
                if acc.n > 0 {
                    *cell = Some(acc.sum / acc.n as f64);
                }
            }
            row
        })
        .collect();

    SparseGrid { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(y: i32, m: u32, d: u32, modal: f64) -> PriceRecord {
        PriceRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            min_price: modal - 10.0,
            max_price: modal + 10.0,
            modal_price: modal,
            commodity: "Tomato".to_string(),
            market: "Nashik".to_string(),
        }
    }

    #[test]
    fn same_week_observations_are_averaged() {
        // 2023-01-02 and 2023-01-04 are both ISO week 1.
        let records = vec![rec(2023, 1, 2, 100.0), rec(2023, 1, 4, 110.0)];
        let grid = fill_grid(&records, PriceType::Modal);
        assert_eq!(grid.rows.len(), 1);
        assert_eq!(grid.rows[0].cells[0], Some(105.0));
        assert_eq!(grid.rows[0].known_count(), 1);

        let min_grid = fill_grid(&records, PriceType::Min);
        assert_eq!(min_grid.rows[0].cells[0], Some(95.0));
    }

    #[test]
    fn years_are_ascending_and_independent_of_input_order() {
        let a = vec![rec(2024, 3, 6, 50.0), rec(2022, 3, 9, 40.0), rec(2024, 3, 7, 70.0)];
        let mut b = a.clone();
        b.reverse();
        let ga = fill_grid(&a, PriceType::Modal);
        let gb = fill_grid(&b, PriceType::Modal);
        assert_eq!(ga, gb);
        assert_eq!(ga.rows.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2022, 2024]);
    }

    #[test]
    fn unmapped_weeks_keep_the_year_but_no_cells() {
        // 2023-06-20 is ISO week 25, which has no column.
        let grid = fill_grid(&[rec(2023, 6, 20, 80.0)], PriceType::Modal);
        assert_eq!(grid.rows.len(), 1);
        assert_eq!(grid.rows[0].known_count(), 0);
    }

    #[test]
    fn calendar_year_pairs_with_iso_week() {
        // 2024-12-30 is ISO week 1 of 2025 but stays in calendar year 2024.
        let grid = fill_grid(&[rec(2024, 12, 30, 90.0)], PriceType::Modal);
        assert_eq!(grid.rows[0].year, 2024);
        assert_eq!(grid.rows[0].cells[0], Some(90.0));

        // 2021-01-01 is ISO week 53: dropped from every column.
        let grid = fill_grid(&[rec(2021, 1, 1, 90.0)], PriceType::Modal);
        assert_eq!(grid.rows[0].year, 2021);
        assert_eq!(grid.rows[0].known_count(), 0);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(fill_grid(&[], PriceType::Modal).is_empty());
    }
}
