//! Claim and cohort identity types.
//!
//! Identifiers are opaque strings from the source claim system. A cohort is
//! uniquely identified by its (model, component) pair.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }
    };
}

string_id!(
    /// Vehicle identification number.
    VehicleId
);

string_id!(
    /// Vehicle model identifier.
    ModelId
);

string_id!(
    /// Component (part item) identifier.
    ComponentId
);

string_id!(
    /// Repair order number; one order may appear on several claim rows.
    ClaimOrderId
);

/// Cohort key: all failure intervals sharing a (model, component) pair.
///
/// Ordering is by model, then component, which fixes report row order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CohortKey {
    pub model: ModelId,
    pub component: ComponentId,
}

impl CohortKey {
    pub fn new(model: impl Into<ModelId>, component: impl Into<ComponentId>) -> Self {
        CohortKey {
            model: model.into(),
            component: component.into(),
        }
    }

    /// Deterministic 64-bit digest of the key.
    ///
    /// Used to derive per-cohort random seeds, so two cohorts never share a
    /// perturbation stream and results do not depend on processing order.
    pub fn digest(&self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.model.0.as_bytes());
        // Separator keeps ("ab", "c") and ("a", "bc") apart.
        hasher.update([0u8]);
        hasher.update(self.component.0.as_bytes());
        let hash = hex::encode(hasher.finalize());
        u64::from_str_radix(&hash[..16], 16).unwrap_or(0)
    }
}

impl fmt::Display for CohortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.model, self.component)
    }
}
