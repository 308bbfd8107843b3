//! Sample quantiles by linear interpolation between closest ranks.
//!
//! For sorted data `x[0..n]` and probability `p`, the position is
//! `h = (n - 1) * p` and the quantile is
//! `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
//! This is the "linear" (type 7) definition used by most statistics packages.

/// Quantile `p` of `data` (unsorted).
///
/// Returns `None` for empty input, `p` outside `[0, 1]`, or any NaN value.
pub fn quantile(data: &[f64], p: f64) -> Option<f64> {
    let sorted = sorted_finite(data)?;
    quantile_sorted(&sorted, p)
}

/// Several quantiles of `data`, sorting only once.
pub fn quantiles(data: &[f64], ps: &[f64]) -> Option<Vec<f64>> {
    let sorted = sorted_finite(data)?;
    ps.iter().map(|&p| quantile_sorted(&sorted, p)).collect()
}

/// Quantile `p` of already sorted (ascending) data.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

fn sorted_finite(data: &[f64]) -> Option<Vec<f64>> {
    if data.is_empty() || data.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_of_small_sample() {
        let data = [50_000.0, 52_000.0, 48_000.0, 51_000.0, 300_000.0];
        assert_eq!(quantile(&data, 0.25), Some(50_000.0));
        assert_eq!(quantile(&data, 0.75), Some(52_000.0));
        assert_eq!(quantile(&data, 0.5), Some(51_000.0));
    }

    #[test]
    fn interpolates_between_ranks() {
        let data = [1.0, 2.0, 3.0, 4.0];
        // h = 3 * 0.25 = 0.75 -> 1 + 0.75 * (2 - 1)
        assert_eq!(quantile(&data, 0.25), Some(1.75));
        assert_eq!(quantile(&data, 0.75), Some(3.25));
    }

    #[test]
    fn extremes_are_min_and_max() {
        let data = [3.0, 9.0, 1.0];
        assert_eq!(quantile(&data, 0.0), Some(1.0));
        assert_eq!(quantile(&data, 1.0), Some(9.0));
    }

    #[test]
    fn single_value() {
        assert_eq!(quantile(&[7.0], 0.25), Some(7.0));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[1.0, 2.0], 1.5), None);
        assert_eq!(quantile(&[1.0, f64::NAN], 0.5), None);
    }

    #[test]
    fn quantiles_batch_matches_single() {
        let data = [1.0, 1.0, 1.0, 1.0, 100.0];
        let qs = quantiles(&data, &[0.25, 0.75]).unwrap();
        assert_eq!(qs, vec![1.0, 1.0]);
    }
}
