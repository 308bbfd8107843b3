//! Warranty reliability common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Claim and cohort identity types
//! - Report schema versioning
//! - The unified error type
//! - Output format selection

pub mod error;
pub mod id;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use id::{ClaimOrderId, CohortKey, ComponentId, ModelId, VehicleId};
pub use output::OutputFormat;
pub use schema::REPORT_SCHEMA_VERSION;
