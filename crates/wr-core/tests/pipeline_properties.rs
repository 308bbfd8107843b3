//! Property-based tests for pipeline determinism and report invariants.

use proptest::prelude::*;
use wr_core::{run, AnalysisConfig, ClaimRecord};

fn claim_strategy() -> impl Strategy<Value = ClaimRecord> {
    (
        0u8..12,
        0u8..3,
        0u8..4,
        prop_oneof![Just(0.0f64), 1.0f64..150_000.0],
        0.0f64..2_000.0,
        0u16..400,
    )
        .prop_map(|(vin, model, part, distance, cost, order)| {
            ClaimRecord::new(
                format!("V{vin}"),
                format!("M{model}"),
                format!("P{part}"),
                distance,
                cost,
                format!("RO{order}"),
            )
        })
}

fn render(records: &[ClaimRecord], config: &AnalysisConfig) -> (Vec<u8>, Vec<u8>) {
    let out = run(records, config).expect("valid config");
    let mut json = Vec::new();
    out.report.write_json(&mut json).expect("json");
    let mut csv = Vec::new();
    out.report.write_csv(&mut csv).expect("csv");
    (json, csv)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn identical_input_gives_byte_identical_reports(
        records in prop::collection::vec(claim_strategy(), 0..120)
    ) {
        let config = AnalysisConfig::default();
        prop_assert_eq!(render(&records, &config), render(&records, &config));
    }

    #[test]
    fn report_independent_of_input_order(
        records in prop::collection::vec(claim_strategy(), 0..120)
    ) {
        // Distinct distances per (vin, part) keep the stable sort unambiguous.
        let mut seen = std::collections::HashSet::new();
        let records: Vec<ClaimRecord> = records
            .into_iter()
            .filter(|r| {
                seen.insert((
                    r.vin.clone(),
                    r.part_item_id.clone(),
                    r.in_distance_measure.map(f64::to_bits),
                ))
            })
            .collect();
        let mut reversed = records.clone();
        reversed.reverse();

        let config = AnalysisConfig::default();
        let a = run(&records, &config).expect("run");
        let b = run(&reversed, &config).expect("run");
        prop_assert_eq!(a.report.records.len(), b.report.records.len());
        for (x, y) in a.report.records.iter().zip(&b.report.records) {
            prop_assert_eq!(&x.model, &y.model);
            prop_assert_eq!(&x.component, &y.component);
            prop_assert_eq!(x.total_claims, y.total_claims);
            prop_assert_eq!(x.unique_vehicles, y.unique_vehicles);
            prop_assert_eq!(x.suspicious, y.suspicious);
            prop_assert_eq!(x.failure_pattern, y.failure_pattern);
        }
    }

    #[test]
    fn report_rows_are_well_formed(
        records in prop::collection::vec(claim_strategy(), 0..120)
    ) {
        let config = AnalysisConfig::default();
        let out = run(&records, &config).expect("run");
        prop_assert_eq!(out.report.records.len(), out.summary.cohorts);
        for rec in &out.report.records {
            prop_assert!(rec.total_claims >= 1);
            prop_assert!(rec.unique_vehicles >= 1);
            prop_assert!(rec.mean_interval.unwrap_or(0.0) > 0.0);
            prop_assert_eq!(rec.milestone_probabilities.len(), config.milestones.distances.len());
            prop_assert_eq!(rec.beta.is_some(), rec.eta.is_some());

            let probs: Vec<f64> = rec.milestone_probabilities.iter().flatten().copied().collect();
            if rec.beta.is_some() {
                prop_assert_eq!(probs.len(), config.milestones.distances.len());
                for p in &probs {
                    prop_assert!((0.0..=1.0).contains(p));
                }
                for w in probs.windows(2) {
                    prop_assert!(w[0] <= w[1] + 1e-12);
                }
            } else {
                prop_assert!(probs.is_empty());
                prop_assert!(rec.far_survival.is_none());
            }
        }
    }
}
