//! Aggregated failure report for a blocked deployment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::plan::DeployedApplication;
use crate::validator::ValidationError;

/// Every placeholder violation for one deployment, ready to show to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub application: String,
    pub version: String,
    pub environment: String,
    pub errors: Vec<ValidationError>,
}

impl FailureReport {
    /// Build a report for `target`; there is no report without errors.
    pub fn new(target: &DeployedApplication, errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }

        Some(Self {
            application: target.name.clone(),
            version: target.version.clone(),
            environment: target.environment.name.clone(),
            errors,
        })
    }

    /// Header line naming the blocked deployment.
    pub fn header(&self) -> String {
        format!(
            "Cannot deploy '{}' (version {}) to '{}' due to the following errors:",
            self.application, self.version, self.environment
        )
    }

    /// Header followed by one ` - ` line per violation.
    pub fn message(&self) -> String {
        let mut message = self.header();
        for error in &self.errors {
            message.push_str("\n - ");
            message.push_str(&error.to_string());
        }
        message
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
