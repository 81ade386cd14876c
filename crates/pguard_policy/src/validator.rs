//! Placeholder validation against the consolidated dictionary.

use std::collections::BTreeMap;
use std::fmt;

use pguard_dictionary::ConsolidatedDictionary;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::policy::ValidationPolicy;

/// A deployable artifact and the placeholders it declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    #[serde(default)]
    pub placeholders: BTreeMap<String, String>,
}

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placeholders: BTreeMap::new(),
        }
    }

    pub fn with_placeholder(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholders.insert(key.into(), value.into());
        self
    }
}

/// A policy violation attributed to an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub artifact: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.artifact, self.message)
    }
}

/// Checks artifact placeholders against a consolidated dictionary.
pub struct PlaceholderValidator;

impl PlaceholderValidator {
    /// Validate every placeholder of every artifact and collect all violations.
    ///
    /// Violations follow artifact order, then the key order of each artifact's
    /// placeholders (sorted by key, not the order the plan declares them).
    pub fn validate(
        artifacts: &[Artifact],
        dictionary: &ConsolidatedDictionary,
        policy: &ValidationPolicy,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for artifact in artifacts {
            for (key, value) in &artifact.placeholders {
                if let Some(message) = Self::check_placeholder(
                    key,
                    value,
                    dictionary,
                    policy.limit_placeholder_values,
                ) {
                    debug!("{}: {}", artifact.name, message);
                    errors.push(ValidationError {
                        artifact: artifact.name.clone(),
                        message,
                    });
                }
            }
        }

        errors
    }

    /// Check a single placeholder; `None` means it is acceptable.
    pub fn check_placeholder(
        key: &str,
        value: &str,
        dictionary: &ConsolidatedDictionary,
        value_must_match: bool,
    ) -> Option<String> {
        match dictionary.get(key) {
            None => Some(format!("'{}' not found in any dictionary", key)),
            Some(expected) if value_must_match && expected != value => Some(format!(
                "Value '{}' for '{}' does not match dictionary value '{}'",
                value, key, expected
            )),
            Some(_) => None,
        }
    }
}
