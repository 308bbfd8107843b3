//! Exit codes for the wr-core CLI.
//!
//! Exit codes communicate the run outcome without requiring output parsing.

use wr_common::Error;

/// Exit codes for wr-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report produced, no suspicious cohorts
    Clean = 0,

    /// Report produced, at least one suspicious cohort
    SuspiciousFound = 1,

    /// Configuration error
    ConfigError = 10,

    /// Claim input error
    InputError = 11,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates a completed run.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::SuspiciousFound)
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Exit code for a completed run.
    pub fn for_run(suspicious: bool) -> Self {
        if suspicious {
            ExitCode::SuspiciousFound
        } else {
            ExitCode::Clean
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            e if e.is_config() => ExitCode::ConfigError,
            e if e.is_input() => ExitCode::InputError,
            Error::Io(_) | Error::Json(_) => ExitCode::IoError,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
