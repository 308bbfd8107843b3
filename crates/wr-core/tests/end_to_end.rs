//! End-to-end pipeline scenarios on small synthetic claim sets.

use wr_core::{run, AnalysisConfig, ClaimRecord, FailurePattern, FitOutcome, FitUnavailable};

/// One claim per vehicle, so every interval equals its odometer distance.
fn single_claim_vehicles(model: &str, part: &str, distances: &[f64]) -> Vec<ClaimRecord> {
    distances
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            ClaimRecord::new(
                format!("{model}-{part}-{i}"),
                model,
                part,
                d,
                250.0,
                format!("RO-{model}-{part}-{i}"),
            )
        })
        .collect()
}

#[test]
fn clustered_failures_with_far_outlier() {
    let records = single_claim_vehicles(
        "TRUCK",
        "PUMP",
        &[50_000.0, 52_000.0, 48_000.0, 51_000.0, 300_000.0],
    );
    let out = run(&records, &AnalysisConfig::default()).expect("run");
    assert_eq!(out.report.len(), 1);

    let analysis = &out.analyses[0];
    let FitOutcome::Fitted(fit) = analysis.estimate.fit else {
        panic!("expected a fit, got {:?}", analysis.estimate.fit);
    };
    // 300000 trimmed; fitted on the four clustered values.
    assert_eq!(fit.sample_size, 4);
    assert!(fit.shape > 10.0, "shape = {}", fit.shape);
    assert!(fit.scale > 48_000.0 && fit.scale < 53_000.0);
    assert_eq!(analysis.pattern, FailurePattern::WearOut);

    let rec = &out.report.records[0];
    assert_eq!(rec.milestone_probabilities.len(), 30);
    // 10k..40k: essentially no failures yet.
    assert!(rec.milestone_probabilities[0].unwrap() < 1e-6);
    // 60k: almost certainly failed.
    assert!(rec.milestone_probabilities[5].unwrap() > 0.99);
    assert!(rec.far_survival.unwrap() < 1e-9);
    // Mean interval is over raw intervals, outlier included.
    assert_eq!(rec.mean_interval, Some(501_000.0 / 5.0));
    assert_eq!(rec.total_claims, 5);
    assert_eq!(rec.average_cost, Some(250.0));
    // Five claims is far below the volume thresholds.
    assert!(!rec.suspicious);
}

#[test]
fn fewer_than_three_intervals_have_no_derived_values() {
    let records = single_claim_vehicles("VAN", "SEAL", &[12_000.0, 30_000.0]);
    let out = run(&records, &AnalysisConfig::default()).expect("run");
    assert_eq!(
        out.analyses[0].estimate.fit,
        FitOutcome::Unavailable(FitUnavailable::InsufficientSamples { before: 2, after: 2 })
    );
    let rec = &out.report.records[0];
    assert_eq!(rec.beta, None);
    assert_eq!(rec.eta, None);
    assert_eq!(rec.theoretical_mean, None);
    assert_eq!(rec.far_survival, None);
    assert_eq!(rec.failure_pattern, FailurePattern::NotComputed);
}

#[test]
fn high_claim_rate_is_flagged_on_volume() {
    // 20 vehicles, each with a repeated odometer reading and one later claim.
    let mut records = Vec::new();
    for v in 0..20 {
        let vin = format!("V{v}");
        records.push(ClaimRecord::new(vin.as_str(), "SUV", "BRAKE", 15_000.0, 80.0, format!("{vin}-a")));
        records.push(ClaimRecord::new(vin.as_str(), "SUV", "BRAKE", 15_000.0, 80.0, format!("{vin}-b")));
        records.push(ClaimRecord::new(
            vin.as_str(),
            "SUV",
            "BRAKE",
            15_000.0 + 1_000.0 * f64::from(v + 1),
            80.0,
            format!("{vin}-c"),
        ));
    }
    let out = run(&records, &AnalysisConfig::default()).expect("run");
    let rec = &out.report.records[0];
    // The repeated reading is a zero interval and drops out: 2 orders per vehicle.
    assert_eq!(rec.total_claims, 40);
    assert_eq!(rec.unique_vehicles, 20);
    assert!(rec.suspicious);
    assert!(out.has_suspicious());
}

#[test]
fn report_rows_sorted_by_model_then_component() {
    let mut records = single_claim_vehicles("B", "X", &[1_000.0, 2_000.0, 3_000.0]);
    records.extend(single_claim_vehicles("A", "Z", &[1_000.0, 2_000.0, 3_000.0]));
    records.extend(single_claim_vehicles("A", "Y", &[1_000.0, 2_000.0, 3_000.0]));
    let out = run(&records, &AnalysisConfig::default()).expect("run");
    let keys: Vec<(String, String)> = out
        .report
        .records
        .iter()
        .map(|r| (r.model.to_string(), r.component.to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("A".to_string(), "Y".to_string()),
            ("A".to_string(), "Z".to_string()),
            ("B".to_string(), "X".to_string()),
        ]
    );
}

#[test]
fn csv_and_json_have_matching_row_counts() {
    let mut records = single_claim_vehicles("A", "P", &[10_000.0, 11_000.0, 12_500.0, 9_000.0]);
    records.extend(single_claim_vehicles("B", "P", &[5_000.0]));
    let out = run(&records, &AnalysisConfig::default()).expect("run");

    let mut csv = Vec::new();
    out.report.write_csv(&mut csv).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("model,component,total_claims,"));
    assert!(csv.lines().next().unwrap().ends_with("prob_300000_km,prob_beyond_300000_km"));

    let mut json = Vec::new();
    out.report.write_json(&mut json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["records"].as_array().unwrap().len(), 2);
    assert_eq!(value["columns"].as_array().unwrap().len(), 12 + 30 + 1);
}
