//! Suspicion flagging and failure-pattern classification.
//!
//! A cohort is suspicious when its claim volume is anomalous, or when its
//! fitted distribution predicts a high failure probability at the nearest
//! milestone and it has enough claims to matter. Probability rules only apply
//! when a fit exists; without one, suspicion rests on volume alone.

use std::fmt;

use serde::{Deserialize, Serialize};
use wr_config::SuspicionThresholds;

/// Rule that contributed to a suspicious flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionReason {
    /// Claims above the high-volume cut.
    HighVolume,
    /// Claims per vehicle above the alert ratio with enough vehicles.
    FailureRate,
    /// Nearest-milestone failure probability above the alert level.
    MilestoneProbability,
}

impl fmt::Display for SuspicionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighVolume => write!(f, "high_volume"),
            Self::FailureRate => write!(f, "failure_rate"),
            Self::MilestoneProbability => write!(f, "milestone_probability"),
        }
    }
}

/// Suspicion verdict for one cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub suspicious: bool,
    /// Claims per unique vehicle (0 when there are no vehicles).
    pub failure_rate: f64,
    pub reasons: Vec<SuspicionReason>,
}

/// Apply volume and probability rules.
///
/// `nearest_probability` is the CDF at the first milestone, `None` when the
/// cohort has no fit.
pub fn classify(
    total_claims: u64,
    unique_vehicles: u64,
    nearest_probability: Option<f64>,
    thresholds: &SuspicionThresholds,
) -> Classification {
    let failure_rate = if unique_vehicles == 0 {
        0.0
    } else {
        total_claims as f64 / unique_vehicles as f64
    };
    let enough_claims = total_claims >= thresholds.min_claims_suspect;

    let high_volume = total_claims > thresholds.high_volume_claims;
    let rate_alert = failure_rate > thresholds.failure_rate_alert_ratio
        && unique_vehicles >= thresholds.min_vehicles_suspect;
    let volume = enough_claims && (high_volume || rate_alert);

    let probability = nearest_probability
        .is_some_and(|p| p > thresholds.milestone_alert_probability);

    let mut reasons = Vec::new();
    if volume && high_volume {
        reasons.push(SuspicionReason::HighVolume);
    }
    if volume && rate_alert {
        reasons.push(SuspicionReason::FailureRate);
    }
    if probability && enough_claims {
        reasons.push(SuspicionReason::MilestoneProbability);
    }

    Classification {
        suspicious: !reasons.is_empty(),
        failure_rate,
        reasons,
    }
}

/// Failure regime implied by the Weibull shape parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePattern {
    #[serde(rename = "not computed")]
    NotComputed,
    /// beta < 1: decreasing hazard.
    #[serde(rename = "infant mortality")]
    InfantMortality,
    /// 1 <= beta < 3: roughly constant hazard.
    #[serde(rename = "random")]
    Random,
    /// beta >= 3: increasing hazard.
    #[serde(rename = "wear-out")]
    WearOut,
}

impl FailurePattern {
    pub fn from_shape(shape: Option<f64>) -> Self {
        match shape {
            Some(beta) if beta.is_finite() && beta > 0.0 => {
                if beta < 1.0 {
                    FailurePattern::InfantMortality
                } else if beta < 3.0 {
                    FailurePattern::Random
                } else {
                    FailurePattern::WearOut
                }
            }
            _ => FailurePattern::NotComputed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FailurePattern::NotComputed => "not computed",
            FailurePattern::InfantMortality => "infant mortality",
            FailurePattern::Random => "random",
            FailurePattern::WearOut => "wear-out",
        }
    }
}

impl fmt::Display for FailurePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
