//! Analysis configuration types.
//!
//! Every field has a default matching the reference deployment, so a config
//! file only needs to name the values it changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::CONFIG_SCHEMA_VERSION;

/// Complete analysis configuration passed into the pipeline entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    pub schema_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub thresholds: SuspicionThresholds,
    pub milestones: MilestoneConfig,
    pub outliers: OutlierConfig,
    pub jitter: JitterConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            thresholds: SuspicionThresholds::default(),
            milestones: MilestoneConfig::default(),
            outliers: OutlierConfig::default(),
            jitter: JitterConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Volume- and probability-based suspicion thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SuspicionThresholds {
    /// Minimum distinct vehicles for the failure-rate rule.
    pub min_vehicles_suspect: u64,
    /// Minimum distinct claims for any suspicion.
    pub min_claims_suspect: u64,
    /// Claims per vehicle above which the failure-rate rule fires.
    pub failure_rate_alert_ratio: f64,
    /// Claim count above which a cohort is suspicious on volume alone.
    pub high_volume_claims: u64,
    /// Nearest-milestone failure probability above which the fit rule fires.
    pub milestone_alert_probability: f64,
}

impl Default for SuspicionThresholds {
    fn default() -> Self {
        Self {
            min_vehicles_suspect: 20,
            min_claims_suspect: 25,
            failure_rate_alert_ratio: 1.2,
            high_volume_claims: 100,
            milestone_alert_probability: 0.25,
        }
    }
}

/// Distance milestones at which failure probabilities are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MilestoneConfig {
    /// Ascending, strictly positive distances.
    pub distances: Vec<f64>,
    /// Distance for the "survives beyond" probability.
    pub far_threshold: f64,
    /// Distance unit label used in report column names.
    pub unit: String,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            distances: (1..=30).map(|k| f64::from(k) * 10_000.0).collect(),
            far_threshold: 300_000.0,
            unit: "km".to_string(),
        }
    }
}

impl MilestoneConfig {
    /// The nearest (smallest) milestone, used by the probability alert.
    pub fn nearest(&self) -> Option<f64> {
        self.distances.first().copied()
    }

    /// Report column name for a milestone probability.
    pub fn column_name(&self, distance: f64) -> String {
        format!("prob_{}_{}", format_distance(distance), self.unit)
    }

    /// Report column name for the far-threshold survival probability.
    pub fn far_column_name(&self) -> String {
        format!(
            "prob_beyond_{}_{}",
            format_distance(self.far_threshold),
            self.unit
        )
    }
}

fn format_distance(distance: f64) -> String {
    if distance.fract() == 0.0 && distance.abs() < 1e15 {
        format!("{}", distance as i64)
    } else {
        format!("{}", distance)
    }
}

/// IQR outlier trimming parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutlierConfig {
    /// Upper bound is `q3 + iqr_multiplier * (q3 - q1)`.
    pub iqr_multiplier: f64,
    /// Minimum samples before and after trimming for a fit.
    pub min_samples: usize,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            min_samples: 3,
        }
    }
}

/// Degenerate-sample perturbation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct JitterConfig {
    /// Noise standard deviation as a fraction of each value.
    pub relative_sigma: f64,
    /// Mixed with each cohort key digest to seed its generator.
    pub base_seed: u64,
    /// Also perturb samples whose coefficient of variation is at or below
    /// this value. `None` perturbs only fully identical samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_variance_cv: Option<f64>,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            relative_sigma: 0.1,
            base_seed: 42,
            low_variance_cv: None,
        }
    }
}
