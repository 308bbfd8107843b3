//! Cohort aggregation by (model, component).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use wr_common::{ClaimOrderId, CohortKey, VehicleId};

use crate::intervals::FailureInterval;

/// All failure intervals sharing a (model, component) key, with claim
/// volume and cost totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    pub key: CohortKey,
    /// Distinct repair orders.
    pub total_claims: u64,
    pub total_cost: f64,
    /// Distinct vehicles.
    pub unique_vehicles: u64,
    /// Interval values; order carries no meaning downstream.
    pub intervals: Vec<f64>,
}

impl Cohort {
    /// Claims per vehicle, 0 when there are no vehicles.
    pub fn failure_rate(&self) -> f64 {
        if self.unique_vehicles == 0 {
            0.0
        } else {
            self.total_claims as f64 / self.unique_vehicles as f64
        }
    }

    /// Cost per claim, `None` when there are no claims.
    pub fn average_cost(&self) -> Option<f64> {
        if self.total_claims == 0 {
            None
        } else {
            Some(self.total_cost / self.total_claims as f64)
        }
    }

    /// Arithmetic mean of the raw (untrimmed) intervals.
    pub fn mean_interval(&self) -> Option<f64> {
        if self.intervals.is_empty() {
            None
        } else {
            Some(self.intervals.iter().sum::<f64>() / self.intervals.len() as f64)
        }
    }
}

#[derive(Default)]
struct Accumulator {
    orders: BTreeSet<ClaimOrderId>,
    vehicles: BTreeSet<VehicleId>,
    cost: f64,
    intervals: Vec<f64>,
}

/// Group intervals into cohorts, sorted by key.
///
/// Only keys with at least one interval produce a cohort.
pub fn aggregate_cohorts(intervals: &[FailureInterval]) -> Vec<Cohort> {
    let mut groups: BTreeMap<&CohortKey, Accumulator> = BTreeMap::new();
    for fi in intervals {
        let acc = groups.entry(&fi.key).or_default();
        acc.orders.insert(fi.claim_order.clone());
        acc.vehicles.insert(fi.vin.clone());
        acc.cost += fi.cost;
        acc.intervals.push(fi.interval);
    }

    groups
        .into_iter()
        .map(|(key, acc)| Cohort {
            key: key.clone(),
            total_claims: acc.orders.len() as u64,
            total_cost: acc.cost,
            unique_vehicles: acc.vehicles.len() as u64,
            intervals: acc.intervals,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fi(model: &str, part: &str, vin: &str, order: &str, cost: f64, interval: f64) -> FailureInterval {
        FailureInterval {
            key: CohortKey::new(model, part),
            vin: vin.into(),
            claim_order: order.into(),
            distance: interval,
            cost,
            interval,
        }
    }

    #[test]
    fn counts_distinct_orders_and_vehicles() {
        let cohorts = aggregate_cohorts(&[
            fi("M1", "P1", "V1", "RO1", 100.0, 10_000.0),
            fi("M1", "P1", "V1", "RO2", 50.0, 5_000.0),
            fi("M1", "P1", "V2", "RO2", 25.0, 7_000.0),
        ]);
        assert_eq!(cohorts.len(), 1);
        let c = &cohorts[0];
        assert_eq!(c.total_claims, 2);
        assert_eq!(c.unique_vehicles, 2);
        assert_eq!(c.total_cost, 175.0);
        assert_eq!(c.intervals, vec![10_000.0, 5_000.0, 7_000.0]);
        assert_eq!(c.failure_rate(), 1.0);
        assert_eq!(c.average_cost(), Some(87.5));
        assert_eq!(c.mean_interval(), Some(22_000.0 / 3.0));
    }

    #[test]
    fn sorted_by_key_regardless_of_input_order() {
        let forward = aggregate_cohorts(&[
            fi("M2", "P1", "V1", "A", 1.0, 1.0),
            fi("M1", "P9", "V2", "B", 1.0, 1.0),
            fi("M1", "P1", "V3", "C", 1.0, 1.0),
        ]);
        let keys: Vec<String> = forward.iter().map(|c| c.key.to_string()).collect();
        assert_eq!(keys, vec!["M1/P1", "M1/P9", "M2/P1"]);
    }

    #[test]
    fn empty_cohort_sentinels() {
        let c = Cohort {
            key: CohortKey::new("M", "P"),
            total_claims: 0,
            total_cost: 0.0,
            unique_vehicles: 0,
            intervals: vec![],
        };
        assert_eq!(c.failure_rate(), 0.0);
        assert_eq!(c.average_cost(), None);
        assert_eq!(c.mean_interval(), None);
    }
}
