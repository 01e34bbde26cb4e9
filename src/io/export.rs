//! Delimited-text export of a weekly grid.
//!
//! Layout: a `Year` column followed by the 48 week columns in calendar order,
//! one row per year, plain non-negative integers. The format is meant to be
//! easy to consume in spreadsheets and to re-read without loss.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::domain::{COLUMN_COUNT, Column, GridRow, PriceType, YearWeekGrid};
use crate::error::AppError;

/// Header of the year column.
pub const YEAR_HEADER: &str = "Year";

/// Write the grid as CSV to any writer.
pub fn write_grid<W: Write>(writer: W, grid: &YearWeekGrid) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header = std::iter::once(YEAR_HEADER).chain(Column::ALL.iter().map(|c| c.label()));
    wtr.write_record(header)
        .map_err(|e| AppError::input(format!("Failed to write grid CSV header: {e}")))?;

    for row in grid.rows() {
        let fields = std::iter::once(row.year.to_string()).chain(row.cells.iter().map(u32::to_string));
        wtr.write_record(fields)
            .map_err(|e| AppError::input(format!("Failed to write grid CSV row {}: {e}", row.year)))?;
    }

    wtr.flush()
        .map_err(|e| AppError::input(format!("Failed to flush grid CSV: {e}")))?;
    Ok(())
}

/// Read a grid back from CSV produced by `write_grid`.
pub fn read_grid<R: Read>(reader: R) -> Result<YearWeekGrid, AppError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read grid CSV header: {e}")))?
        .clone();
    validate_header(&headers)?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("Grid CSV line {line}: {e}")))?;
        if record.len() != COLUMN_COUNT + 1 {
            return Err(AppError::input(format!(
                "Grid CSV line {line}: expected {} fields, found {}.",
                COLUMN_COUNT + 1,
                record.len()
            )));
        }

        let year = record[0]
            .parse::<i32>()
            .map_err(|e| AppError::input(format!("Grid CSV line {line}: invalid year '{}': {e}", &record[0])))?;

        let mut cells = [0u32; COLUMN_COUNT];
        for (i, cell) in cells.iter_mut().enumerate() {
            let raw = &record[i + 1];
            *cell = raw.parse::<u32>().map_err(|e| {
                AppError::input(format!(
                    "Grid CSV line {line}, column {}: invalid value '{raw}': {e}",
                    Column::ALL[i]
                ))
            })?;
        }
        rows.push(GridRow { year, cells });
    }

    Ok(YearWeekGrid::new(rows))
}

pub fn grid_to_csv_string(grid: &YearWeekGrid) -> Result<String, AppError> {
    let mut buf = Vec::new();
    write_grid(&mut buf, grid)?;
    String::from_utf8(buf).map_err(|e| AppError::internal(format!("Grid CSV is not UTF-8: {e}")))
}

pub fn parse_grid_csv(text: &str) -> Result<YearWeekGrid, AppError> {
    read_grid(text.as_bytes())
}

/// Write the grid to a CSV file.
pub fn write_grid_csv(path: &Path, grid: &YearWeekGrid) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_grid(file, grid)
}

/// Read a grid CSV file.
pub fn read_grid_csv(path: &Path) -> Result<YearWeekGrid, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open grid CSV '{}': {e}", path.display())))?;
    read_grid(file)
}

/// Default export file name: `{market}_{crop}_{Price_Type}_weekly.csv`.
pub fn default_export_name(market: &str, crop: &str, price_type: PriceType) -> String {
    format!(
        "{}_{}_{}_weekly.csv",
        safe_file_stem(market),
        safe_file_stem(crop),
        price_type.column_name()
    )
}

/// Replace characters that are unsafe in file names with `_`, collapse runs of
/// `_` and cap the length at 50 characters.
pub fn safe_file_stem(name: &str) -> String {
    const INVALID: [char; 10] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*', ' '];
    let replaced: String = name
        .chars()
        .map(|c| if INVALID.contains(&c) { '_' } else { c })
        .collect();
    let joined = replaced
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    joined.chars().take(50).collect()
}

fn validate_header(headers: &csv::StringRecord) -> Result<(), AppError> {
    let expected = std::iter::once(YEAR_HEADER).chain(Column::ALL.iter().map(|c| c.label()));
    let matches = headers.len() == COLUMN_COUNT + 1
        && headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}'))
            .zip(expected)
            .all(|(got, want)| got == want);
    if matches {
        Ok(())
    } else {
        Err(AppError::input(
            "Grid CSV header must be `Year` followed by Jan_W1..Dec_W4 in calendar order.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> YearWeekGrid {
        YearWeekGrid::new(vec![
            GridRow {
                year: 2023,
                cells: std::array::from_fn(|i| 1000 + 13 * i as u32),
            },
            GridRow {
                year: 2021,
                cells: std::array::from_fn(|i| if i % 3 == 0 { 0 } else { 850 + i as u32 }),
            },
        ])
    }

    #[test]
    fn csv_round_trip_preserves_the_matrix() {
        let grid = sample_grid();
        let text = grid_to_csv_string(&grid).unwrap();
        assert_eq!(parse_grid_csv(&text).unwrap(), grid);
    }

    #[test]
    fn header_lists_year_then_weeks() {
        let text = grid_to_csv_string(&sample_grid()).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("Year,Jan_W1,Jan_W2,Jan_W3,Jan_W4,Feb_W1"));
        assert!(header.ends_with("Dec_W3,Dec_W4"));
        // Rows are in ascending year order.
        assert!(text.lines().nth(1).unwrap().starts_with("2021,0,"));
    }

    #[test]
    fn empty_grid_is_header_only() {
        let text = grid_to_csv_string(&YearWeekGrid::default()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(parse_grid_csv(&text).unwrap().is_empty());
    }

    #[test]
    fn rejects_negative_values_and_bad_headers() {
        let mut text = grid_to_csv_string(&sample_grid()).unwrap();
        text = text.replacen("2021,0,", "2021,-5,", 1);
        assert!(parse_grid_csv(&text).is_err());
        assert!(parse_grid_csv("Year,Feb_W1\n2020,1\n").is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        let grid = sample_grid();
        write_grid_csv(&path, &grid).unwrap();
        assert_eq!(read_grid_csv(&path).unwrap(), grid);
    }

    #[test]
    fn export_names_are_file_safe() {
        assert_eq!(
            default_export_name("Pune", "Onion", PriceType::Modal),
            "Pune_Onion_Modal_Price_weekly.csv"
        );
        assert_eq!(safe_file_stem("Bhindi (Ladies Finger)"), "Bhindi_(Ladies_Finger)");
        assert_eq!(safe_file_stem("a / b"), "a_b");
        assert_eq!(safe_file_stem(&"x".repeat(80)).len(), 50);
    }
}
