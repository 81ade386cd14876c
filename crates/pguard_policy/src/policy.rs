//! Placeholder restriction policy.
//!
//! The policy is read from two environment properties. A property enables its
//! rule only when it holds a literal `true`; a missing property, `false`, or any
//! other value leaves the rule off.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Environment property restricting placeholder keys to dictionary keys.
pub const LIMIT_PLACEHOLDERS_PROPERTY: &str = "limitPlaceholdersToDictionaries";

/// Environment property requiring placeholder values to equal dictionary values.
pub const LIMIT_PLACEHOLDER_VALUES_PROPERTY: &str = "limitPlaceholderValuesToDictionaries";

/// Environment properties, as loaded from a deployment plan.
pub type Properties = BTreeMap<String, Value>;

/// Which placeholder restrictions are active for a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Every placeholder key must exist in the consolidated dictionary
    #[serde(default)]
    pub limit_placeholders: bool,
    /// Every placeholder value must equal the dictionary value for its key
    #[serde(default)]
    pub limit_placeholder_values: bool,
}

impl ValidationPolicy {
    pub fn new(limit_placeholders: bool, limit_placeholder_values: bool) -> Self {
        Self {
            limit_placeholders,
            limit_placeholder_values,
        }
    }

    /// Read the policy from environment properties.
    pub fn from_properties(properties: &Properties) -> Self {
        Self {
            limit_placeholders: property_is_true(properties, LIMIT_PLACEHOLDERS_PROPERTY),
            limit_placeholder_values: property_is_true(
                properties,
                LIMIT_PLACEHOLDER_VALUES_PROPERTY,
            ),
        }
    }

    /// Whether any restriction is active.
    pub fn is_enabled(&self) -> bool {
        self.limit_placeholders || self.limit_placeholder_values
    }

    /// Combine with another policy; a rule is active if either enables it.
    pub fn union(self, other: ValidationPolicy) -> Self {
        Self {
            limit_placeholders: self.limit_placeholders || other.limit_placeholders,
            limit_placeholder_values: self.limit_placeholder_values
                || other.limit_placeholder_values,
        }
    }
}

fn property_is_true(properties: &Properties, name: &str) -> bool {
    match properties.get(name) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text == "true",
        _ => false,
    }
}
