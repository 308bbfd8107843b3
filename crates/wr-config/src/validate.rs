//! Semantic validation of analysis configuration.
//!
//! Validation collects every problem instead of stopping at the first, so a
//! malformed file can be fixed in one pass.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::CONFIG_SCHEMA_VERSION;

/// A single invalid configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `milestones.distances`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate a fully resolved configuration.
pub fn validate(config: &AnalysisConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let major = |v: &str| v.split('.').next().map(str::to_string);
    if major(&config.schema_version) != major(CONFIG_SCHEMA_VERSION) {
        errors.push(ValidationError::new(
            "schema_version",
            format!(
                "unsupported version {} (expected {}.x)",
                config.schema_version,
                major(CONFIG_SCHEMA_VERSION).unwrap_or_default()
            ),
        ));
    }

    let t = &config.thresholds;
    if t.min_claims_suspect == 0 {
        errors.push(ValidationError::new(
            "thresholds.min_claims_suspect",
            "must be at least 1",
        ));
    }
    if !t.failure_rate_alert_ratio.is_finite() || t.failure_rate_alert_ratio < 0.0 {
        errors.push(ValidationError::new(
            "thresholds.failure_rate_alert_ratio",
            format!(
                "must be a finite non-negative number, got {}",
                t.failure_rate_alert_ratio
            ),
        ));
    }
    if !(0.0..=1.0).contains(&t.milestone_alert_probability) {
        errors.push(ValidationError::new(
            "thresholds.milestone_alert_probability",
            format!("must be in [0, 1], got {}", t.milestone_alert_probability),
        ));
    }

    let m = &config.milestones;
    if m.distances.is_empty() {
        errors.push(ValidationError::new(
            "milestones.distances",
            "must contain at least one distance",
        ));
    }
    if let Some(bad) = m.distances.iter().find(|d| !d.is_finite() || **d <= 0.0) {
        errors.push(ValidationError::new(
            "milestones.distances",
            format!("distances must be finite and positive, got {}", bad),
        ));
    }
    if m.distances.windows(2).any(|w| w[0] >= w[1]) {
        errors.push(ValidationError::new(
            "milestones.distances",
            "distances must be strictly ascending",
        ));
    }
    if !m.far_threshold.is_finite() || m.far_threshold <= 0.0 {
        errors.push(ValidationError::new(
            "milestones.far_threshold",
            format!("must be finite and positive, got {}", m.far_threshold),
        ));
    }
    if m.unit.trim().is_empty() {
        errors.push(ValidationError::new("milestones.unit", "must not be empty"));
    }

    let o = &config.outliers;
    if !o.iqr_multiplier.is_finite() || o.iqr_multiplier < 0.0 {
        errors.push(ValidationError::new(
            "outliers.iqr_multiplier",
            format!("must be finite and non-negative, got {}", o.iqr_multiplier),
        ));
    }
    if o.min_samples < 3 {
        errors.push(ValidationError::new(
            "outliers.min_samples",
            format!("must be at least 3, got {}", o.min_samples),
        ));
    }

    let j = &config.jitter;
    if !j.relative_sigma.is_finite() || j.relative_sigma <= 0.0 {
        errors.push(ValidationError::new(
            "jitter.relative_sigma",
            format!("must be finite and positive, got {}", j.relative_sigma),
        ));
    }
    if let Some(cv) = j.low_variance_cv {
        if !cv.is_finite() || cv < 0.0 {
            errors.push(ValidationError::new(
                "jitter.low_variance_cv",
                format!("must be finite and non-negative, got {}", cv),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
