//! Error types for dictionary loading and resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dictionary operations.
pub type DictionaryResult<T> = Result<T, DictionaryError>;

/// Errors that can occur while loading or resolving dictionaries.
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Dictionary entry '{key}' refers to itself")]
    SelfReference { key: String },

    #[error("Dictionary entries form a reference cycle: {}", cycle.join(" -> "))]
    CyclicReference { cycle: Vec<String> },

    #[error(
        "Dictionary entries still unresolved after {passes} passes: {}",
        pending.join(", ")
    )]
    PassLimitExceeded { passes: usize, pending: Vec<String> },

    #[error("Dictionary entry '{value}' refers to non-existent placeholder '{placeholder}'")]
    MissingReference { value: String, placeholder: String },

    #[error("Unsupported dictionary file format: {0}")]
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

impl DictionaryError {
    /// Whether resolution failed because entries refer back to themselves,
    /// directly or through other entries.
    pub fn is_cyclic(&self) -> bool {
        matches!(
            self,
            DictionaryError::SelfReference { .. } | DictionaryError::CyclicReference { .. }
        )
    }

    /// Whether resolution failed on a reference to an unknown key.
    pub fn is_missing_reference(&self) -> bool {
        matches!(self, DictionaryError::MissingReference { .. })
    }

    /// Whether this error came out of resolution rather than file loading.
    pub fn is_resolution_error(&self) -> bool {
        self.is_cyclic()
            || self.is_missing_reference()
            || matches!(self, DictionaryError::PassLimitExceeded { .. })
    }
}
