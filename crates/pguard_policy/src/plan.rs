//! Deployment plan model.
//!
//! A plan describes one deployment: the application and version being deployed,
//! the target environment with its dictionaries and properties, and the deltas
//! that will be applied. Plans are loaded from YAML, JSON or TOML.

use std::collections::BTreeMap;
use std::path::Path;

use pguard_dictionary::{Dictionary, FileFormat, ResolverOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GateError, GateResult};
use crate::policy::{Properties, ValidationPolicy};
use crate::validator::Artifact;

/// A deployment target environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    /// Dictionaries in priority order; earlier ones override later ones
    #[serde(default)]
    pub dictionaries: Vec<Dictionary>,
    #[serde(default)]
    pub properties: Properties,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionaries.push(dictionary);
        self
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Placeholder policy configured on this environment.
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy::from_properties(&self.properties)
    }
}

/// The application version being deployed and where it goes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployedApplication {
    pub name: String,
    pub version: String,
    pub environment: Environment,
}

/// What a delta does to its deployed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Modify,
    Destroy,
    Noop,
}

/// An item deployed to a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployed {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Present only for artifacts derived with placeholder substitution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholders: Option<BTreeMap<String, String>>,
}

impl Deployed {
    /// The artifact view of this item, if it carries placeholders.
    pub fn as_artifact(&self) -> Option<Artifact> {
        self.placeholders.as_ref().map(|placeholders| Artifact {
            name: self.name.clone(),
            placeholders: placeholders.clone(),
        })
    }
}

/// One change in the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub operation: Operation,
    #[serde(default)]
    pub deployed: Option<Deployed>,
}

impl Delta {
    pub fn new(operation: Operation, deployed: Deployed) -> Self {
        Self {
            operation,
            deployed: Some(deployed),
        }
    }
}

/// Everything needed to check one deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub application: DeployedApplication,
    #[serde(default)]
    pub deltas: Vec<Delta>,
    #[serde(default)]
    pub resolver: ResolverOptions,
}

impl DeploymentPlan {
    pub fn new(application: DeployedApplication) -> Self {
        Self {
            application,
            ..Default::default()
        }
    }

    pub fn with_delta(mut self, delta: Delta) -> Self {
        self.deltas.push(delta);
        self
    }

    /// Artifacts with placeholders that will exist after the deployment.
    pub fn artifacts_with_placeholders(&self) -> Vec<Artifact> {
        self.deltas
            .iter()
            .filter(|delta| delta.operation != Operation::Destroy)
            .filter_map(|delta| delta.deployed.as_ref())
            .filter_map(Deployed::as_artifact)
            .collect()
    }

    /// Load a plan from a YAML, JSON or TOML file.
    pub fn from_file(path: &Path) -> GateResult<Self> {
        let format = FileFormat::from_path(path)
            .ok_or_else(|| GateError::UnsupportedFormat(path.to_path_buf()))?;
        let content = std::fs::read_to_string(path)?;

        let plan: Self = match format {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };
        debug!("Loaded deployment plan from {:?}", path);

        Self::validated(plan)
    }

    /// Parse a plan from a YAML string.
    pub fn from_yaml(yaml: &str) -> GateResult<Self> {
        let plan = serde_yaml::from_str(yaml)?;
        Self::validated(plan)
    }

    fn validated(plan: Self) -> GateResult<Self> {
        if plan.application.name.is_empty() {
            return Err(GateError::InvalidPlan("application name is empty".to_string()));
        }
        if plan.application.environment.name.is_empty() {
            return Err(GateError::InvalidPlan("environment name is empty".to_string()));
        }
        if plan.resolver.max_passes == Some(0) {
            return Err(GateError::InvalidPlan(
                "resolver.max_passes must be at least 1".to_string(),
            ));
        }
        Ok(plan)
    }
}
