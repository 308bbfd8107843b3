//! Core math modules.

pub mod gamma;
pub mod quantile;
pub mod ranks;
pub mod weibull;
