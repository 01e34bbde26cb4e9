//! Small descriptive statistics helpers.

/// Percentile of an ascending-sorted slice, `pct` in `[0, 100]`.
///
/// Uses linear interpolation between the two closest ranks
/// (`rank = pct / 100 * (n - 1)`). Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], pct: f64) -> Option<f64> {
    if sorted.is_empty() || !pct.is_finite() {
        return None;
    }
    let pct = pct.clamp(0.0, 100.0);
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs at least 2 values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Round half to even and clamp at zero, for non-negative price cells.
pub fn round_price(value: f64) -> u32 {
    let r = value.round_ties_even();
    if r.is_finite() && r > 0.0 {
        r.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_between_ranks() {
        let v = [50.0, 80.0, 120.0, 200.0, 400.0];
        assert_eq!(percentile(&v, 25.0), Some(80.0));
        assert_eq!(percentile(&v, 50.0), Some(120.0));
        assert_eq!(percentile(&v, 75.0), Some(200.0));
        let p90 = percentile(&v, 90.0).unwrap();
        assert!((p90 - 320.0).abs() < 1e-9);
        assert_eq!(percentile(&v, 0.0), Some(50.0));
        assert_eq!(percentile(&v, 100.0), Some(400.0));
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 90.0), Some(7.0));
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = sample_std(&v).unwrap();
        assert!((s - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn round_price_is_half_even_and_non_negative() {
        assert_eq!(round_price(100.5), 100);
        assert_eq!(round_price(101.5), 102);
        assert_eq!(round_price(99.49), 99);
        assert_eq!(round_price(-3.0), 0);
        assert_eq!(round_price(f64::NAN), 0);
    }
}
