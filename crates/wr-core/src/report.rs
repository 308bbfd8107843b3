//! Per-cohort report rows and their JSON / CSV renderings.
//!
//! Column order is fixed: identity, volume and cost, verdict, fit
//! parameters, one probability per milestone in ascending order, and the
//! far-threshold survival probability. Unavailable values are `null` in JSON
//! and an empty field in CSV.

use std::io::Write;

use serde::{Deserialize, Serialize};
use wr_common::{ComponentId, ModelId, REPORT_SCHEMA_VERSION};
use wr_config::MilestoneConfig;

use crate::classify::{Classification, FailurePattern};
use crate::cohort::Cohort;
use crate::estimate::Estimate;

const LEADING_COLUMNS: [&str; 12] = [
    "model",
    "component",
    "total_claims",
    "unique_vehicles",
    "total_cost",
    "average_cost",
    "mean_interval",
    "suspicious",
    "failure_pattern",
    "beta",
    "eta",
    "theoretical_mean",
];

/// One row of the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub model: ModelId,
    pub component: ComponentId,
    pub total_claims: u64,
    pub unique_vehicles: u64,
    pub total_cost: f64,
    pub average_cost: Option<f64>,
    pub mean_interval: Option<f64>,
    pub suspicious: bool,
    pub failure_pattern: FailurePattern,
    pub beta: Option<f64>,
    pub eta: Option<f64>,
    pub theoretical_mean: Option<f64>,
    /// Aligned with [`ReportTable::milestones`].
    pub milestone_probabilities: Vec<Option<f64>>,
    pub far_survival: Option<f64>,
}

impl ReportRecord {
    /// Join a cohort with its estimate and verdict.
    pub fn build(cohort: &Cohort, estimate: &Estimate, classification: &Classification) -> Self {
        Self {
            model: cohort.key.model.clone(),
            component: cohort.key.component.clone(),
            total_claims: cohort.total_claims,
            unique_vehicles: cohort.unique_vehicles,
            total_cost: cohort.total_cost,
            average_cost: cohort.average_cost(),
            mean_interval: cohort.mean_interval(),
            suspicious: classification.suspicious,
            failure_pattern: FailurePattern::from_shape(estimate.fit.shape()),
            beta: estimate.fit.shape(),
            eta: estimate.fit.scale(),
            theoretical_mean: estimate.theoretical_mean,
            milestone_probabilities: estimate.milestones.iter().map(|m| m.probability).collect(),
            far_survival: estimate.far_survival,
        }
    }

    fn csv_fields(&self) -> Vec<String> {
        let width = LEADING_COLUMNS.len() + self.milestone_probabilities.len() + 1;
        let mut fields = Vec::with_capacity(width);
        fields.push(escape_field(self.model.as_str()));
        fields.push(escape_field(self.component.as_str()));
        fields.push(self.total_claims.to_string());
        fields.push(self.unique_vehicles.to_string());
        fields.push(self.total_cost.to_string());
        fields.push(optional(self.average_cost));
        fields.push(optional(self.mean_interval));
        fields.push(self.suspicious.to_string());
        fields.push(escape_field(self.failure_pattern.label()));
        fields.push(optional(self.beta));
        fields.push(optional(self.eta));
        fields.push(optional(self.theoretical_mean));
        fields.extend(self.milestone_probabilities.iter().copied().map(optional));
        fields.push(optional(self.far_survival));
        fields
    }
}

/// Ordered report rows plus the column layout they were built against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub schema_version: String,
    pub unit: String,
    pub milestones: Vec<f64>,
    pub far_threshold: f64,
    pub columns: Vec<String>,
    pub records: Vec<ReportRecord>,
}

impl ReportTable {
    pub fn new(milestones: &MilestoneConfig) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            unit: milestones.unit.clone(),
            milestones: milestones.distances.clone(),
            far_threshold: milestones.far_threshold,
            columns: Self::columns(milestones),
            records: Vec::new(),
        }
    }

    /// Header names in output order.
    pub fn columns(milestones: &MilestoneConfig) -> Vec<String> {
        LEADING_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(milestones.distances.iter().map(|&d| milestones.column_name(d)))
            .chain(std::iter::once(milestones.far_column_name()))
            .collect()
    }

    pub fn push(&mut self, record: ReportRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn suspicious(&self) -> impl Iterator<Item = &ReportRecord> {
        self.records.iter().filter(|r| r.suspicious)
    }

    /// Pretty JSON with a trailing newline.
    pub fn write_json<W: Write>(&self, mut writer: W) -> wr_common::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Header row, then one row per record.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> wr_common::Result<()> {
        let header: Vec<String> = self.columns.iter().map(|c| escape_field(c)).collect();
        writeln!(writer, "{}", header.join(","))?;
        for record in &self.records {
            writeln!(writer, "{}", record.csv_fields().join(","))?;
        }
        Ok(())
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Quote fields containing a comma, quote, or newline; double inner quotes.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::estimate::{FitUnavailable, WeibullEstimator};
    use wr_common::CohortKey;
    use wr_config::SuspicionThresholds;

    fn small_milestones() -> MilestoneConfig {
        MilestoneConfig {
            distances: vec![10_000.0, 20_000.0],
            far_threshold: 50_000.0,
            unit: "km".to_string(),
        }
    }

    fn unfitted_record(model: &str) -> ReportRecord {
        let cohort = Cohort {
            key: CohortKey::new(model, "P1"),
            total_claims: 2,
            total_cost: 150.0,
            unique_vehicles: 2,
            intervals: vec![1_000.0, 3_000.0],
        };
        let estimate = WeibullEstimator::new(&small_milestones())
            .unavailable(FitUnavailable::InsufficientSamples { before: 2, after: 2 });
        let class = classify(2, 2, None, &SuspicionThresholds::default());
        ReportRecord::build(&cohort, &estimate, &class)
    }

    #[test]
    fn column_order() {
        let cols = ReportTable::columns(&small_milestones());
        assert_eq!(cols[0], "model");
        assert_eq!(cols[8], "failure_pattern");
        assert_eq!(cols[11], "theoretical_mean");
        assert_eq!(&cols[12..], ["prob_10000_km", "prob_20000_km", "prob_beyond_50000_km"]);
    }

    #[test]
    fn unavailable_values_are_empty_csv_fields() {
        let mut table = ReportTable::new(&small_milestones());
        table.push(unfitted_record("M1"));
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "M1,P1,2,2,150,75,2000,false,not computed,,,,,,");
        assert_eq!(lines[0].split(',').count(), lines[1].split(',').count());
    }

    #[test]
    fn unavailable_values_are_json_null() {
        let mut table = ReportTable::new(&small_milestones());
        table.push(unfitted_record("M1"));
        let mut buf = Vec::new();
        table.write_json(&mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let rec = &v["records"][0];
        assert!(rec["beta"].is_null());
        assert!(rec["far_survival"].is_null());
        assert_eq!(rec["failure_pattern"], "not computed");
        assert_eq!(rec["milestone_probabilities"], serde_json::json!([null, null]));
        assert_eq!(v["schema_version"], REPORT_SCHEMA_VERSION);
    }

    #[test]
    fn csv_escapes_identifiers() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");

        let mut table = ReportTable::new(&small_milestones());
        table.push(unfitted_record("M,1"));
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("\"M,1\",P1"));
    }
}
