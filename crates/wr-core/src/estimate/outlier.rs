//! High-side IQR trimming and degenerate-sample perturbation.
//!
//! Failure intervals are positive by construction, so only the long upper
//! tail is trimmed. A sample whose retained values are all identical has no
//! finite Weibull MLE; it is perturbed with seeded Gaussian noise
//! proportional to each value so a fit remains possible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use wr_config::{JitterConfig, OutlierConfig};
use wr_math::quantiles;

/// Samples that survived trimming, ready for fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredSample {
    pub values: Vec<f64>,
    /// `q3 + k * IQR` bound used for trimming.
    pub upper_bound: f64,
    /// Values removed above the bound.
    pub trimmed: usize,
    /// Whether seeded noise was added.
    pub jittered: bool,
}

impl FilteredSample {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }
}

/// Result of outlier filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterOutcome {
    Filtered(FilteredSample),
    /// Too few values before (`after == before`) or after trimming.
    Insufficient { before: usize, after: usize },
}

/// Trim the upper tail and perturb degenerate samples.
///
/// `seed` must be derived from the cohort so results are independent of the
/// order in which cohorts are processed.
pub fn filter_outliers(
    values: &[f64],
    outliers: &OutlierConfig,
    jitter: &JitterConfig,
    seed: u64,
) -> FilterOutcome {
    let before = values.len();
    if before < outliers.min_samples {
        return FilterOutcome::Insufficient {
            before,
            after: before,
        };
    }

    let (q1, q3) = match quantiles(values, &[0.25, 0.75]).as_deref() {
        Some(&[q1, q3]) => (q1, q3),
        _ => return FilterOutcome::Insufficient { before, after: 0 },
    };
    let upper_bound = q3 + outliers.iqr_multiplier * (q3 - q1);

    let mut retained: Vec<f64> = values.iter().copied().filter(|&v| v <= upper_bound).collect();
    let after = retained.len();
    if after < outliers.min_samples {
        return FilterOutcome::Insufficient { before, after };
    }

    let jittered = needs_jitter(&retained, jitter.low_variance_cv);
    if jittered {
        perturb(&mut retained, jitter.relative_sigma, seed);
    }

    FilterOutcome::Filtered(FilteredSample {
        values: retained,
        upper_bound,
        trimmed: before - after,
        jittered,
    })
}

fn needs_jitter(values: &[f64], low_variance_cv: Option<f64>) -> bool {
    let first = values[0];
    if values.iter().all(|&v| v == first) {
        return true;
    }
    let Some(threshold) = low_variance_cv else {
        return false;
    };
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return false;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt() / mean <= threshold
}

/// Add N(0, (sigma * v)^2) noise to every value, Box-Muller from a seeded
/// generator. Length is preserved.
fn perturb(values: &mut [f64], relative_sigma: f64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for v in values.iter_mut() {
        // 1 - U keeps u1 in (0, 1] so ln never sees zero.
        let u1: f64 = 1.0 - rng.random::<f64>();
        let u2: f64 = rng.random();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        *v += z * relative_sigma * *v;
    }
}
