//! Probability-plot data for one flagged cohort.
//!
//! The snapshot is presentation data only: the filtered samples a fit used,
//! the fit itself, and Weibull plot coordinates pairing Bernard median ranks
//! with the fitted CDF at each ordered sample.

use serde::{Deserialize, Serialize};
use wr_common::{CohortKey, REPORT_SCHEMA_VERSION};
use wr_config::AnalysisConfig;
use wr_math::{bernard_median_rank, weibull_plot_y};

use crate::classify::{FailurePattern, SuspicionReason};
use crate::estimate::{FilterOutcome, WeibullFit};
use crate::pipeline::{filter_cohort, PipelineOutput};

/// One point on a Weibull probability plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    /// Filtered sample value, ascending.
    pub value: f64,
    /// Bernard median rank `(i - 0.3) / (n + 0.4)`.
    pub median_rank: f64,
    /// Fitted CDF at `value`.
    pub fitted_cdf: f64,
    /// `ln(value)`, the plot x coordinate.
    pub ln_value: f64,
    /// `ln(-ln(1 - median_rank))`, the plot y coordinate.
    pub plot_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSnapshot {
    pub schema_version: String,
    pub cohort: CohortKey,
    pub reasons: Vec<SuspicionReason>,
    pub pattern: FailurePattern,
    pub fit: WeibullFit,
    pub upper_bound: f64,
    pub trimmed: usize,
    pub jittered: bool,
    /// Filtered samples in the order they were fitted.
    pub samples: Vec<f64>,
    pub points: Vec<PlotPoint>,
}

impl DiagnosticSnapshot {
    /// Snapshot of the first suspicious cohort, in report order, that has a
    /// fit. `None` when no such cohort exists.
    pub fn for_first_suspicious(output: &PipelineOutput, config: &AnalysisConfig) -> Option<Self> {
        output
            .analyses
            .iter()
            .filter(|a| a.classification.suspicious)
            .find_map(|a| {
                let fit = *a.estimate.fit.fit()?;
                let FilterOutcome::Filtered(sample) = filter_cohort(&a.cohort, config) else {
                    return None;
                };
                let dist = fit.distribution()?;

                let mut ordered = sample.values.clone();
                ordered.sort_by(f64::total_cmp);
                let n = ordered.len();
                let points = ordered
                    .iter()
                    .enumerate()
                    .map(|(i, &value)| {
                        let median_rank = bernard_median_rank(i + 1, n);
                        PlotPoint {
                            value,
                            median_rank,
                            fitted_cdf: dist.cdf(value),
                            ln_value: value.ln(),
                            plot_y: weibull_plot_y(median_rank),
                        }
                    })
                    .collect();

                Some(Self {
                    schema_version: REPORT_SCHEMA_VERSION.to_string(),
                    cohort: a.cohort.key.clone(),
                    reasons: a.classification.reasons.clone(),
                    pattern: a.pattern,
                    fit,
                    upper_bound: sample.upper_bound,
                    trimmed: sample.trimmed,
                    jittered: sample.jittered,
                    samples: sample.values,
                    points,
                })
            })
    }

    pub fn write_json<W: std::io::Write>(&self, mut writer: W) -> wr_common::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimRecord;
    use crate::pipeline::run;

    fn cohort_claims(model: &str, distances: &[f64]) -> Vec<ClaimRecord> {
        distances
            .iter()
            .enumerate()
            .map(|(i, &d)| ClaimRecord::new(format!("{model}-V{i}"), model, "P1", d, 10.0, format!("{model}-{i}")))
            .collect()
    }

    fn low_threshold_config() -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.thresholds.min_claims_suspect = 3;
        config.milestones.distances = vec![50_000.0, 60_000.0];
        config
    }

    #[test]
    fn picks_first_suspicious_fitted_cohort() {
        let config = low_threshold_config();
        let mut records = cohort_claims("A", &[1_000.0, 2_000.0]);
        records.extend(cohort_claims("B", &[50_000.0, 52_000.0, 48_000.0, 51_000.0, 300_000.0]));
        records.extend(cohort_claims("C", &[40_000.0, 42_000.0, 41_000.0, 43_000.0]));
        let out = run(&records, &config).unwrap();

        let snap = DiagnosticSnapshot::for_first_suspicious(&out, &config).expect("snapshot");
        assert_eq!(snap.cohort, CohortKey::new("B", "P1"));
        assert_eq!(snap.samples.len(), 4);
        assert_eq!(snap.trimmed, 1);
        assert_eq!(snap.points.len(), 4);
        assert!(snap.points.windows(2).all(|w| w[0].value <= w[1].value));
        assert!((snap.points[0].median_rank - 0.7 / 4.4).abs() < 1e-12);
        assert!(snap.reasons.contains(&SuspicionReason::MilestoneProbability));
    }

    #[test]
    fn none_when_nothing_suspicious() {
        let config = AnalysisConfig::default();
        let out = run(&cohort_claims("A", &[10_000.0, 20_000.0, 30_000.0]), &config).unwrap();
        assert!(DiagnosticSnapshot::for_first_suspicious(&out, &config).is_none());
    }
}
