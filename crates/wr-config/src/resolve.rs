//! Layered configuration resolution.
//!
//! The base document comes from the first available source:
//! 1. explicit path (`--config`)
//! 2. `WR_CONFIG` environment variable
//! 3. named preset (`--preset`)
//! 4. `$XDG_CONFIG_HOME/warranty-reliability/config.json`
//! 5. built-in defaults
//!
//! Scalar environment overrides and then CLI overrides are applied on top,
//! and the result is validated before any cohort is processed.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::analysis::AnalysisConfig;
use crate::preset::{get_preset, PresetName};
use crate::validate::{validate, ValidationError};

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "WR_CONFIG";
pub const ENV_MIN_VEHICLES: &str = "WR_MIN_VEHICLES_SUSPECT";
pub const ENV_MIN_CLAIMS: &str = "WR_MIN_CLAIMS_SUSPECT";
pub const ENV_RATE_RATIO: &str = "WR_FAILURE_RATE_ALERT_RATIO";
pub const ENV_FAR_THRESHOLD: &str = "WR_FAR_THRESHOLD";
pub const ENV_MILESTONES: &str = "WR_MILESTONES";

const APP_DIR: &str = "warranty-reliability";
const CONFIG_FILE: &str = "config.json";

/// Errors that can occur while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {name}: {value:?}")]
    InvalidOverride { name: String, value: String },

    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigError> for wr_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(mut errors) if errors.len() == 1 => {
                let e = errors.remove(0);
                wr_common::Error::InvalidField {
                    field: e.field,
                    message: e.message,
                }
            }
            other => wr_common::Error::Config(other.to_string()),
        }
    }
}

/// Where the base configuration document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Env(PathBuf),
    Preset(PresetName),
    Xdg(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "file {}", p.display()),
            ConfigSource::Env(p) => write!(f, "{} {}", ENV_CONFIG_PATH, p.display()),
            ConfigSource::Preset(name) => write!(f, "preset {}", name),
            ConfigSource::Xdg(p) => write!(f, "xdg {}", p.display()),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub preset: Option<PresetName>,
    pub min_vehicles_suspect: Option<u64>,
    pub min_claims_suspect: Option<u64>,
    pub failure_rate_alert_ratio: Option<f64>,
    pub milestones: Option<Vec<f64>>,
    pub far_threshold: Option<f64>,
}

/// A validated configuration and its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AnalysisConfig,
    pub source: ConfigSource,
}

/// Resolve configuration from CLI overrides, the process environment, the
/// XDG config directory, and defaults.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig, ConfigError> {
    let xdg = dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE));
    resolve_with(overrides, |name| std::env::var(name).ok(), xdg.as_deref())
}

/// Resolution with an injectable environment and XDG path.
pub fn resolve_with<F>(
    overrides: &ConfigOverrides,
    env: F,
    xdg_path: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (mut config, source) = if let Some(path) = &overrides.config_path {
        (load_file(path)?, ConfigSource::Explicit(path.clone()))
    } else if let Some(path) = env(ENV_CONFIG_PATH).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        (load_file(&path)?, ConfigSource::Env(path))
    } else if let Some(preset) = overrides.preset {
        (get_preset(preset), ConfigSource::Preset(preset))
    } else if let Some(path) = xdg_path.filter(|p| p.is_file()) {
        (load_file(path)?, ConfigSource::Xdg(path.to_path_buf()))
    } else {
        (AnalysisConfig::default(), ConfigSource::Defaults)
    };

    apply_env(&mut config, &env)?;
    apply_overrides(&mut config, overrides);

    validate(&config).map_err(ConfigError::Invalid)?;
    debug!(source = %source, "configuration resolved");

    Ok(ResolvedConfig { config, source })
}

fn load_file(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    AnalysisConfig::from_json(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_env<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigError> {
    match env(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidOverride {
                name: name.to_string(),
                value: raw,
            }),
    }
}

/// Parse a comma-separated distance list such as `10000,20000,50000`.
pub fn parse_distance_list(raw: &str) -> Option<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok())
        .collect()
}

fn apply_env(
    config: &mut AnalysisConfig,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(v) = parse_env::<u64>(env, ENV_MIN_VEHICLES)? {
        config.thresholds.min_vehicles_suspect = v;
    }
    if let Some(v) = parse_env::<u64>(env, ENV_MIN_CLAIMS)? {
        config.thresholds.min_claims_suspect = v;
    }
    if let Some(v) = parse_env::<f64>(env, ENV_RATE_RATIO)? {
        config.thresholds.failure_rate_alert_ratio = v;
    }
    if let Some(v) = parse_env::<f64>(env, ENV_FAR_THRESHOLD)? {
        config.milestones.far_threshold = v;
    }
    if let Some(raw) = env(ENV_MILESTONES) {
        config.milestones.distances =
            parse_distance_list(&raw).ok_or_else(|| ConfigError::InvalidOverride {
                name: ENV_MILESTONES.to_string(),
                value: raw.clone(),
            })?;
    }
    Ok(())
}

fn apply_overrides(config: &mut AnalysisConfig, overrides: &ConfigOverrides) {
    if let Some(v) = overrides.min_vehicles_suspect {
        config.thresholds.min_vehicles_suspect = v;
    }
    if let Some(v) = overrides.min_claims_suspect {
        config.thresholds.min_claims_suspect = v;
    }
    if let Some(v) = overrides.failure_rate_alert_ratio {
        config.thresholds.failure_rate_alert_ratio = v;
    }
    if let Some(v) = &overrides.milestones {
        config.milestones.distances = v.clone();
    }
    if let Some(v) = overrides.far_threshold {
        config.milestones.far_threshold = v;
    }
}
