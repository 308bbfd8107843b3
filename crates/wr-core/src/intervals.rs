//! Failure-interval construction (the MTBF proxy).
//!
//! Within each (vehicle, component) group, ordered by odometer distance, a
//! claim's interval is its distance minus the preceding claim's distance.
//! The first claim of a group is measured from zero, so first failures are
//! included. Non-positive intervals mark duplicate or out-of-order odometer
//! readings and are dropped without error.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wr_common::{ClaimOrderId, CohortKey, VehicleId};

use crate::claims::ClaimRecord;

/// A positive distance between consecutive failures of one component on one
/// vehicle, with the fields of the claim that closed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureInterval {
    pub key: CohortKey,
    pub vin: VehicleId,
    pub claim_order: ClaimOrderId,
    /// Odometer distance of the closing claim.
    pub distance: f64,
    pub cost: f64,
    /// Always > 0.
    pub interval: f64,
}

/// Counts of rows consumed and dropped while building intervals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalStats {
    pub records_in: usize,
    /// Rows failing the null / positivity pre-filter.
    pub dropped_prefilter: usize,
    /// Usable rows whose interval was zero or negative.
    pub dropped_non_positive: usize,
    pub intervals: usize,
}

#[derive(Debug, Clone, Default)]
pub struct IntervalSet {
    pub intervals: Vec<FailureInterval>,
    pub stats: IntervalStats,
}

/// Build failure intervals from raw claims.
pub fn build_intervals(records: &[ClaimRecord]) -> IntervalSet {
    struct Usable<'a> {
        record: &'a ClaimRecord,
        key: CohortKey,
        distance: f64,
        cost: f64,
    }

    let mut usable: Vec<Usable<'_>> = records
        .iter()
        .filter(|r| r.is_usable())
        .filter_map(|record| {
            Some(Usable {
                record,
                key: record.cohort_key()?,
                distance: record.in_distance_measure?,
                cost: record.repr_ord_amt_total?,
            })
        })
        .collect();
    let dropped_prefilter = records.len() - usable.len();

    // Stable: equal distances keep input order.
    usable.sort_by(|a, b| {
        a.record
            .vin
            .cmp(&b.record.vin)
            .then_with(|| a.key.component.cmp(&b.key.component))
            .then_with(|| a.distance.total_cmp(&b.distance))
    });

    let mut intervals = Vec::with_capacity(usable.len());
    let mut dropped_non_positive = 0;
    let mut previous: Option<&Usable<'_>> = None;

    for row in &usable {
        let previous_distance = match previous {
            Some(p) if p.record.vin == row.record.vin && p.key.component == row.key.component => {
                p.distance
            }
            _ => 0.0,
        };
        previous = Some(row);

        let interval = row.distance - previous_distance;
        if interval > 0.0 {
            intervals.push(FailureInterval {
                key: row.key.clone(),
                vin: row.record.vin.clone(),
                claim_order: row.record.repr_ord_nbr.clone(),
                distance: row.distance,
                cost: row.cost,
                interval,
            });
        } else {
            dropped_non_positive += 1;
        }
    }

    let stats = IntervalStats {
        records_in: records.len(),
        dropped_prefilter,
        dropped_non_positive,
        intervals: intervals.len(),
    };
    debug!(
        records_in = stats.records_in,
        dropped_prefilter = stats.dropped_prefilter,
        dropped_non_positive = stats.dropped_non_positive,
        intervals = stats.intervals,
        "failure intervals built"
    );

    IntervalSet { intervals, stats }
}
