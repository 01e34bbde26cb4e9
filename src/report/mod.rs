//! Reporting utilities: crop summary metrics and sampling-frequency analysis.
//!
//! Formatting lives in `format` so the numbers here stay testable on their own.

use chrono::NaiveDate;

use crate::domain::{PriceRecord, PriceType};
use crate::math::{mean, sample_std};

pub mod format;

pub use format::*;

/// Latest price of one field against its mean over all records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceMetric {
    pub price_type: PriceType,
    pub latest: f64,
    pub mean: f64,
    /// `(latest - mean) / mean * 100`; `None` when the mean is 0.
    pub delta_pct: Option<f64>,
}

/// Headline numbers for one crop in one market.
#[derive(Debug, Clone, PartialEq)]
pub struct CropSummary {
    pub latest_date: NaiveDate,
    pub min: PriceMetric,
    pub max: PriceMetric,
    pub modal: PriceMetric,
    /// Coefficient of variation of the modal price, in percent.
    pub modal_volatility_pct: Option<f64>,
}

/// How densely a crop is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Weekly,
    BiWeekly,
    TriWeekly,
    Irregular,
}

impl Cadence {
    pub fn from_mean_gap(days: f64) -> Self {
        if days <= 8.0 {
            Cadence::Weekly
        } else if days <= 15.0 {
            Cadence::BiWeekly
        } else if days <= 22.0 {
            Cadence::TriWeekly
        } else {
            Cadence::Irregular
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Cadence::Weekly => "Weekly data",
            Cadence::BiWeekly => "Bi-weekly data",
            Cadence::TriWeekly => "Tri-weekly data",
            Cadence::Irregular => "Monthly or irregular data",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyInfo {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub n_records: usize,
    /// Mean gap between consecutive records; 0 with a single record.
    pub mean_gap_days: f64,
    pub cadence: Cadence,
}

/// Summary metrics over date-ordered records. `None` if there are none.
pub fn summarize_crop(records: &[PriceRecord]) -> Option<CropSummary> {
    let latest = records.last()?;

    let metric = |price_type: PriceType| -> Option<PriceMetric> {
        let values: Vec<f64> = records.iter().map(|r| r.price(price_type)).collect();
        let m = mean(&values)?;
        let latest_value = latest.price(price_type);
        Some(PriceMetric {
            price_type,
            latest: latest_value,
            mean: m,
            delta_pct: (m != 0.0).then(|| (latest_value - m) / m * 100.0),
        })
    };

    let modal_values: Vec<f64> = records.iter().map(|r| r.modal_price).collect();
    let modal_volatility_pct = match (sample_std(&modal_values), mean(&modal_values)) {
        (Some(sd), Some(m)) if m != 0.0 => Some(sd / m * 100.0),
        _ => None,
    };

    Some(CropSummary {
        latest_date: latest.date,
        min: metric(PriceType::Min)?,
        max: metric(PriceType::Max)?,
        modal: metric(PriceType::Modal)?,
        modal_volatility_pct,
    })
}

/// Sampling cadence over date-ordered records. `None` if there are none.
pub fn analyze_frequency(records: &[PriceRecord]) -> Option<FrequencyInfo> {
    let first = records.first()?.date;
    let last = records.last()?.date;

    let gaps: Vec<f64> = records
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days() as f64)
        .collect();
    let mean_gap_days = mean(&gaps).unwrap_or(0.0);

    Some(FrequencyInfo {
        first,
        last,
        n_records: records.len(),
        mean_gap_days,
        cadence: Cadence::from_mean_gap(mean_gap_days),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, min: f64, max: f64, modal: f64) -> PriceRecord {
        PriceRecord {
            date: date.parse().unwrap(),
            min_price: min,
            max_price: max,
            modal_price: modal,
            commodity: "Garlic".to_string(),
            market: "Mandsaur".to_string(),
        }
    }

    #[test]
    fn summary_compares_latest_with_mean() {
        let records = vec![
            rec("2024-01-01", 80.0, 120.0, 100.0),
            rec("2024-01-08", 100.0, 140.0, 120.0),
            rec("2024-01-15", 120.0, 160.0, 140.0),
        ];
        let s = summarize_crop(&records).unwrap();
        assert_eq!(s.latest_date.to_string(), "2024-01-15");
        assert_eq!(s.modal.latest, 140.0);
        assert_eq!(s.modal.mean, 120.0);
        assert!((s.modal.delta_pct.unwrap() - 16.666_666).abs() < 1e-3);
        assert!((s.min.delta_pct.unwrap() - 20.0).abs() < 1e-9);
        // std = 20, mean = 120.
        assert!((s.modal_volatility_pct.unwrap() - 20.0 / 120.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn single_record_has_no_volatility() {
        let s = summarize_crop(&[rec("2024-01-01", 1.0, 2.0, 1.5)]).unwrap();
        assert!(s.modal_volatility_pct.is_none());
        assert_eq!(s.modal.delta_pct, Some(0.0));
        assert!(summarize_crop(&[]).is_none());
    }

    #[test]
    fn cadence_from_mean_gap() {
        let records = vec![
            rec("2024-01-01", 1.0, 1.0, 1.0),
            rec("2024-01-11", 1.0, 1.0, 1.0),
            rec("2024-01-25", 1.0, 1.0, 1.0),
        ];
        let f = analyze_frequency(&records).unwrap();
        assert_eq!(f.n_records, 3);
        assert!((f.mean_gap_days - 12.0).abs() < 1e-12);
        assert_eq!(f.cadence, Cadence::BiWeekly);

        assert_eq!(Cadence::from_mean_gap(8.0), Cadence::Weekly);
        assert_eq!(Cadence::from_mean_gap(22.0), Cadence::TriWeekly);
        assert_eq!(Cadence::from_mean_gap(30.0), Cadence::Irregular);

        let one = analyze_frequency(&records[..1]).unwrap();
        assert_eq!(one.mean_gap_days, 0.0);
        assert_eq!(one.cadence, Cadence::Weekly);
    }
}
