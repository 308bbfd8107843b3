//! End-to-end analysis run.
//!
//! Configuration is validated before any record is touched; after that no
//! per-cohort problem can fail the run. Each cohort is analyzed as a pure
//! function of `(cohort, config)`, including its jitter seed, so results do
//! not depend on processing order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wr_config::{validate, AnalysisConfig, ConfigError};

use crate::claims::ClaimRecord;
use crate::classify::{classify, Classification, FailurePattern};
use crate::cohort::{aggregate_cohorts, Cohort};
use crate::estimate::{
    filter_outliers, Estimate, FilterOutcome, FitUnavailable, WeibullEstimator,
};
use crate::intervals::{build_intervals, IntervalStats};
use crate::report::{ReportRecord, ReportTable};

/// Everything computed for one cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortAnalysis {
    pub cohort: Cohort,
    /// Whether the filtered sample was perturbed before fitting.
    pub jittered: bool,
    pub estimate: Estimate,
    pub classification: Classification,
    pub pattern: FailurePattern,
}

/// Run-level counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub intervals: IntervalStats,
    pub cohorts: usize,
    pub fitted: usize,
    pub jittered: usize,
    pub suspicious: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub report: ReportTable,
    /// Same order as `report.records`.
    pub analyses: Vec<CohortAnalysis>,
    pub summary: PipelineSummary,
}

impl PipelineOutput {
    pub fn has_suspicious(&self) -> bool {
        self.summary.suspicious > 0
    }
}

/// Jitter seed for a cohort: its key digest mixed with the configured base.
pub fn cohort_seed(cohort: &Cohort, config: &AnalysisConfig) -> u64 {
    cohort.key.digest() ^ config.jitter.base_seed
}

/// Outlier filtering for one cohort with its derived seed.
pub fn filter_cohort(cohort: &Cohort, config: &AnalysisConfig) -> FilterOutcome {
    filter_outliers(
        &cohort.intervals,
        &config.outliers,
        &config.jitter,
        cohort_seed(cohort, config),
    )
}

/// Filter, fit, and classify one cohort.
pub fn analyze_cohort(cohort: &Cohort, config: &AnalysisConfig) -> CohortAnalysis {
    let estimator = WeibullEstimator::new(&config.milestones);
    analyze_with(cohort, config, &estimator)
}

fn analyze_with(
    cohort: &Cohort,
    config: &AnalysisConfig,
    estimator: &WeibullEstimator,
) -> CohortAnalysis {
    let (estimate, jittered) = match filter_cohort(cohort, config) {
        FilterOutcome::Filtered(sample) => (estimator.estimate(&sample), sample.jittered),
        FilterOutcome::Insufficient { before, after } => (
            estimator.unavailable(FitUnavailable::InsufficientSamples { before, after }),
            false,
        ),
    };

    let classification = classify(
        cohort.total_claims,
        cohort.unique_vehicles,
        estimate.nearest_probability(),
        &config.thresholds,
    );
    let pattern = FailurePattern::from_shape(estimate.fit.shape());

    debug!(
        cohort = %cohort.key,
        samples = cohort.intervals.len(),
        jittered,
        fit = ?estimate.fit,
        suspicious = classification.suspicious,
        pattern = %pattern,
        "cohort analyzed"
    );

    CohortAnalysis {
        cohort: cohort.clone(),
        jittered,
        estimate,
        classification,
        pattern,
    }
}

/// Run every stage over `records`.
///
/// Fails only when `config` is invalid.
pub fn run(records: &[ClaimRecord], config: &AnalysisConfig) -> wr_common::Result<PipelineOutput> {
    validate(config).map_err(ConfigError::Invalid)?;

    info!(records = records.len(), "analysis started");

    let interval_set = build_intervals(records);
    let cohorts = aggregate_cohorts(&interval_set.intervals);
    let estimator = WeibullEstimator::new(&config.milestones);

    let mut report = ReportTable::new(&config.milestones);
    let mut analyses = Vec::with_capacity(cohorts.len());
    let mut summary = PipelineSummary {
        intervals: interval_set.stats,
        cohorts: cohorts.len(),
        ..PipelineSummary::default()
    };

    for cohort in &cohorts {
        let analysis = analyze_with(cohort, config, &estimator);
        if analysis.estimate.fit.is_fitted() {
            summary.fitted += 1;
        }
        if analysis.jittered {
            summary.jittered += 1;
        }
        if analysis.classification.suspicious {
            summary.suspicious += 1;
        }
        report.push(ReportRecord::build(
            &analysis.cohort,
            &analysis.estimate,
            &analysis.classification,
        ));
        analyses.push(analysis);
    }

    info!(
        cohorts = summary.cohorts,
        fitted = summary.fitted,
        suspicious = summary.suspicious,
        intervals = summary.intervals.intervals,
        "analysis finished"
    );

    Ok(PipelineOutput {
        report,
        analyses,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wr_common::Error;

    fn vehicle_claims(model: &str, part: &str, distances: &[f64]) -> Vec<ClaimRecord> {
        distances
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                ClaimRecord::new(
                    format!("{model}-{part}-V{i}"),
                    model,
                    part,
                    d,
                    100.0,
                    format!("{model}-{part}-RO{i}"),
                )
            })
            .collect()
    }

    #[test]
    fn invalid_config_aborts_naming_field() {
        let mut config = AnalysisConfig::default();
        config.milestones.distances.clear();
        let err = run(&[], &config).unwrap_err();
        match err {
            Error::InvalidField { field, .. } => assert_eq!(field, "milestones.distances"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_gives_empty_report() {
        let out = run(&[], &AnalysisConfig::default()).unwrap();
        assert!(out.report.is_empty());
        assert_eq!(out.summary.cohorts, 0);
        assert!(!out.has_suspicious());
    }

    #[test]
    fn small_cohort_has_no_fit_but_still_reports() {
        let records = vehicle_claims("M1", "P1", &[10_000.0, 12_000.0]);
        let out = run(&records, &AnalysisConfig::default()).unwrap();
        assert_eq!(out.report.len(), 1);
        let rec = &out.report.records[0];
        assert_eq!(rec.beta, None);
        assert_eq!(rec.failure_pattern, FailurePattern::NotComputed);
        assert!(rec.milestone_probabilities.iter().all(Option::is_none));
        assert_eq!(rec.milestone_probabilities.len(), 30);
        assert!(!rec.suspicious);
        assert_eq!(out.summary.fitted, 0);
    }

    #[test]
    fn one_bad_cohort_does_not_affect_another() {
        let mut records = vehicle_claims("M1", "P1", &[5_000.0]);
        records.extend(vehicle_claims(
            "M2",
            "P2",
            &[50_000.0, 52_000.0, 48_000.0, 51_000.0, 300_000.0],
        ));
        let out = run(&records, &AnalysisConfig::default()).unwrap();
        assert_eq!(out.report.len(), 2);
        assert!(!out.analyses[0].estimate.fit.is_fitted());
        assert!(out.analyses[1].estimate.fit.is_fitted());
        assert_eq!(out.analyses[1].pattern, FailurePattern::WearOut);
    }

    #[test]
    fn identical_intervals_are_jittered_and_fitted() {
        let records = vehicle_claims("M1", "P1", &[20_000.0; 8]);
        let out = run(&records, &AnalysisConfig::default()).unwrap();
        assert_eq!(out.summary.jittered, 1);
        assert!(out.analyses[0].estimate.fit.is_fitted());
    }

    #[test]
    fn seed_depends_on_key_and_base() {
        let records = vehicle_claims("M1", "P1", &[1.0]);
        let cohort = aggregate_cohorts(&build_intervals(&records).intervals).remove(0);
        let config = AnalysisConfig::default();
        let mut other = config.clone();
        other.jitter.base_seed = 7;
        assert_ne!(cohort_seed(&cohort, &config), cohort_seed(&cohort, &other));
        assert_eq!(cohort_seed(&cohort, &config), cohort_seed(&cohort.clone(), &config));
    }
}
