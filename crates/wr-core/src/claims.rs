//! Raw warranty claim rows.

use serde::{Deserialize, Serialize};
use wr_common::{ClaimOrderId, CohortKey, ComponentId, ModelId, VehicleId};

/// One raw claim row, field names as in the source claim extract.
///
/// Model, component, distance and cost may be missing in the source; such
/// rows are dropped by [`ClaimRecord::is_usable`] before interval building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub vin: VehicleId,

    #[serde(default)]
    pub model: Option<ModelId>,

    #[serde(default)]
    pub part_item_id: Option<ComponentId>,

    /// Cumulative odometer distance at the claim.
    #[serde(default)]
    pub in_distance_measure: Option<f64>,

    /// Total repair cost of the claim row.
    #[serde(default)]
    pub repr_ord_amt_total: Option<f64>,

    /// Repair order number.
    pub repr_ord_nbr: ClaimOrderId,
}

impl ClaimRecord {
    /// Convenience constructor for fully populated rows.
    pub fn new(
        vin: impl Into<VehicleId>,
        model: impl Into<ModelId>,
        component: impl Into<ComponentId>,
        distance: f64,
        cost: f64,
        order: impl Into<ClaimOrderId>,
    ) -> Self {
        Self {
            vin: vin.into(),
            model: Some(model.into()),
            part_item_id: Some(component.into()),
            in_distance_measure: Some(distance),
            repr_ord_amt_total: Some(cost),
            repr_ord_nbr: order.into(),
        }
    }

    /// Row passes the data-quality pre-filter: key fields present, positive
    /// distance, non-negative cost.
    pub fn is_usable(&self) -> bool {
        let distance_ok = self
            .in_distance_measure
            .is_some_and(|d| d.is_finite() && d > 0.0);
        let cost_ok = self
            .repr_ord_amt_total
            .is_some_and(|c| c.is_finite() && c >= 0.0);
        self.model.is_some() && self.part_item_id.is_some() && distance_ok && cost_ok
    }

    /// Cohort this row belongs to, if its key fields are present.
    pub fn cohort_key(&self) -> Option<CohortKey> {
        Some(CohortKey {
            model: self.model.clone()?,
            component: self.part_item_id.clone()?,
        })
    }
}
