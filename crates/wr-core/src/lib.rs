//! Warranty claim reliability estimation.
//!
//! Converts raw warranty claims into per-(model, component) failure-interval
//! cohorts, fits a two-parameter Weibull lifetime distribution to each
//! cohort, and flags cohorts whose claim volume or early-life failure
//! probability is anomalous.
//!
//! Data flows strictly forward through the stages:
//!
//! ```text
//! ClaimRecord -> intervals -> cohort -> estimate (outliers, Weibull) -> classify -> report
//! ```
//!
//! [`pipeline::run`] drives all stages from an explicit [`AnalysisConfig`].

pub mod claims;
pub mod cli;
pub mod classify;
pub mod cohort;
pub mod diagnostic;
pub mod estimate;
pub mod exit_codes;
pub mod ingest;
pub mod intervals;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use claims::ClaimRecord;
pub use classify::{classify, Classification, FailurePattern, SuspicionReason};
pub use cohort::{aggregate_cohorts, Cohort};
pub use diagnostic::DiagnosticSnapshot;
pub use estimate::{
    filter_outliers, Estimate, FilterOutcome, FilteredSample, FitOutcome, FitUnavailable,
    MilestoneProbability, WeibullEstimator, WeibullFit,
};
pub use intervals::{build_intervals, FailureInterval, IntervalSet, IntervalStats};
pub use pipeline::{analyze_cohort, run, CohortAnalysis, PipelineOutput, PipelineSummary};
pub use report::{ReportRecord, ReportTable};
pub use wr_config::AnalysisConfig;
