//! Output format selection for report writers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialization format for the cohort report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pretty-printed JSON document with header metadata.
    #[default]
    Json,
    /// Plain CSV with one header row; unavailable values are empty fields.
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_name() {
        for fmt in [OutputFormat::Json, OutputFormat::Csv] {
            let json = serde_json::to_string(&fmt).unwrap();
            assert_eq!(json, format!("\"{}\"", fmt));
        }
    }
}
