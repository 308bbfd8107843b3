//! Median rank plotting positions for probability plots.

/// Bernard's approximation of the median rank of the `rank`-th (1-based)
/// ordered failure out of `n`: `F_i = (i - 0.3) / (n + 0.4)`.
///
/// Returns NaN when `rank` is 0 or exceeds `n`.
pub fn bernard_median_rank(rank: usize, n: usize) -> f64 {
    if rank == 0 || rank > n {
        return f64::NAN;
    }
    (rank as f64 - 0.3) / (n as f64 + 0.4)
}

/// Weibull probability-plot ordinate `ln(-ln(1 - F))`.
pub fn weibull_plot_y(f: f64) -> f64 {
    if !(f > 0.0 && f < 1.0) {
        return f64::NAN;
    }
    (-(1.0 - f).ln()).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_increasing_and_inside_unit_interval() {
        let n = 10;
        let ranks: Vec<f64> = (1..=n).map(|i| bernard_median_rank(i, n)).collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
        assert!(ranks.iter().all(|&f| f > 0.0 && f < 1.0));
        assert!((ranks[0] - 0.7 / 10.4).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_rank_is_nan() {
        assert!(bernard_median_rank(0, 5).is_nan());
        assert!(bernard_median_rank(6, 5).is_nan());
    }

    #[test]
    fn plot_y_at_characteristic_life_is_zero() {
        // F = 1 - 1/e at t = eta, where ln(-ln(1 - F)) = 0.
        let f = 1.0 - (-1.0_f64).exp();
        assert!(weibull_plot_y(f).abs() < 1e-12);
        assert!(weibull_plot_y(0.0).is_nan());
        assert!(weibull_plot_y(1.0).is_nan());
    }
}
