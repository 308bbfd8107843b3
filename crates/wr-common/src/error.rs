//! Error types for warranty reliability analysis.

use thiserror::Error;

/// Result type alias for warranty reliability operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for warranty reliability analysis.
///
/// Per-cohort estimation problems are never errors; they surface as
/// unavailable fit results. Only configuration, input, and I/O failures
/// abort a run.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration field `{field}`: {message}")]
    InvalidField { field: String, message: String },

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    // Input errors (20-29)
    #[error("claim input error: {0}")]
    Input(String),

    #[error("malformed claim record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("claim input contained no usable records")]
    EmptyInput,

    // Estimation errors (30-39)
    #[error("estimation failed: {0}")]
    Estimation(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidField { .. } => 11,
            Error::UnknownPreset(_) => 12,
            Error::Input(_) => 20,
            Error::MalformedRecord { .. } => 21,
            Error::EmptyInput => 22,
            Error::Estimation(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Whether this error stems from configuration (code group 10-19).
    pub fn is_config(&self) -> bool {
        (10..20).contains(&self.code())
    }

    /// Whether this error stems from claim input (code group 20-29).
    pub fn is_input(&self) -> bool {
        (20..30).contains(&self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_grouped() {
        assert!(Error::Config("x".into()).is_config());
        assert!(Error::InvalidField {
            field: "milestones.distances".into(),
            message: "empty".into()
        }
        .is_config());
        assert!(Error::EmptyInput.is_input());
        assert!(!Error::Estimation("x".into()).is_config());
    }

    #[test]
    fn invalid_field_names_the_field() {
        let err = Error::InvalidField {
            field: "thresholds.min_claims_suspect".into(),
            message: "must be positive".into(),
        };
        let text = err.to_string();
        assert!(text.contains("thresholds.min_claims_suspect"));
        assert!(text.contains("must be positive"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert_eq!(err.code(), 60);
    }
}
