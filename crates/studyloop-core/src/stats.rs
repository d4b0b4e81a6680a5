//! Small robust-statistics helpers shared by the engines.

/// Median of a sample.
///
/// Odd length picks the middle element after sorting ascending; even length
/// averages the two central elements. Returns `None` for an empty sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Clamp into `[0, 1]`. NaN maps to the neutral 0.5.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        return 0.5;
    }
    x.clamp(0.0, 1.0)
}

/// Round to two decimals, halves away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Convert a `[0, 1]` ratio to a whole percentage.
pub fn percent(ratio: f64) -> u32 {
    (clamp01(ratio) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[120.0, 40.0, 75.0, 60.0, 90.0]), Some(75.0));
    }

    #[test]
    fn test_median_even_averages_central_pair() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[1.0, 1.0]), Some(1.0));
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_ignores_single_outlier() {
        assert_eq!(median(&[0.14, 1.0, 1.0, 1.0, 1.0]), Some(1.0));
    }

    #[test]
    fn test_median_does_not_reorder_input() {
        let values = vec![5.0, 1.0, 3.0];
        let _ = median(&values);
        assert_eq!(values, vec![5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(1.4), 1.0);
        assert_eq!(clamp01(0.42), 0.42);
        assert_eq!(clamp01(f64::NAN), 0.5);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.966_666), 0.97);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.666), 67);
        assert_eq!(percent(1.0), 100);
        assert_eq!(percent(0.0), 0);
    }
}
