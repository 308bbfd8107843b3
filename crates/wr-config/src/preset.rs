//! Built-in configuration presets.
//!
//! - `reference`: thresholds of the reference warranty deployment.
//! - `strict`: early-warning profile that flags smaller, sparser cohorts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetName {
    Reference,
    Strict,
}

impl PresetName {
    pub const ALL: [PresetName; 2] = [PresetName::Reference, PresetName::Strict];

    pub fn description(self) -> &'static str {
        match self {
            PresetName::Reference => "Reference deployment thresholds (25 claims, 20 vehicles, 1.2 rate)",
            PresetName::Strict => "Early warning: 10 claims, 8 vehicles, 1.1 rate, 15% nearest-milestone alert",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetName::Reference => write!(f, "reference"),
            PresetName::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for PresetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" | "default" => Ok(PresetName::Reference),
            "strict" => Ok(PresetName::Strict),
            other => Err(other.to_string()),
        }
    }
}

/// Summary row for `list_presets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: PresetName,
    pub description: String,
}

pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .iter()
        .map(|&name| PresetInfo {
            name,
            description: name.description().to_string(),
        })
        .collect()
}

/// Build the configuration for a preset.
pub fn get_preset(name: PresetName) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    match name {
        PresetName::Reference => {
            config.description = Some(name.description().to_string());
        }
        PresetName::Strict => {
            config.description = Some(name.description().to_string());
            config.thresholds.min_claims_suspect = 10;
            config.thresholds.min_vehicles_suspect = 8;
            config.thresholds.failure_rate_alert_ratio = 1.1;
            config.thresholds.milestone_alert_probability = 0.15;
        }
    }
    config
}
