//! Error types for the placeholder gate.

use std::path::PathBuf;
use thiserror::Error;

use pguard_dictionary::DictionaryError;

use crate::report::FailureReport;

/// Result type alias for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Errors that can occur while checking a deployment plan.
#[derive(Error, Debug)]
pub enum GateError {
    /// Dictionaries could not be consolidated; validation never ran.
    #[error("Dictionary resolution failed: {0}")]
    Resolution(#[from] DictionaryError),

    /// One or more placeholders violate the active policy.
    #[error("{0}")]
    ValidationFailed(FailureReport),

    #[error("Invalid deployment plan: {0}")]
    InvalidPlan(String),

    #[error("Unsupported plan file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GateError {
    /// The aggregated report, when validation failed.
    pub fn report(&self) -> Option<&FailureReport> {
        match self {
            GateError::ValidationFailed(report) => Some(report),
            _ => None,
        }
    }
}
