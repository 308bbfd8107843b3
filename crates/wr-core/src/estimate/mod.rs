//! Per-cohort distribution estimation.
//!
//! - [`outlier`]: IQR upper-tail trimming and degenerate-sample jitter
//! - [`weibull`]: MLE fit, theoretical mean, and milestone probabilities

pub mod outlier;
pub mod weibull;

pub use outlier::{filter_outliers, FilterOutcome, FilteredSample};
pub use weibull::{
    Estimate, FitOutcome, FitUnavailable, MilestoneProbability, WeibullEstimator, WeibullFit,
};
