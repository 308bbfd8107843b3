//! Warranty reliability configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the analysis configuration file
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation that names every invalid field
//! - Configuration presets for common analysis profiles

pub mod analysis;
pub mod preset;
pub mod resolve;
pub mod validate;

pub use analysis::{
    AnalysisConfig, JitterConfig, MilestoneConfig, OutlierConfig, SuspicionThresholds,
};
pub use preset::{get_preset, list_presets, PresetInfo, PresetName};
pub use resolve::{resolve_config, ConfigError, ConfigOverrides, ConfigSource, ResolvedConfig};
pub use validate::{validate, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
