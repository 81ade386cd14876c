//! Placeholder gate for deployment plans.
//!
//! The gate blocks a deployment when artifacts declare placeholders that the
//! target environment's dictionaries do not allow.

use pguard_dictionary::{DictionaryResolver, ResolverOptions};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{GateError, GateResult};
use crate::plan::DeploymentPlan;
use crate::policy::ValidationPolicy;
use crate::report::FailureReport;
use crate::validator::PlaceholderValidator;

/// Gate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Rules enforced regardless of environment properties
    #[serde(default)]
    pub forced_policy: ValidationPolicy,
    /// Resolver options used instead of the plan's own
    #[serde(default)]
    pub resolver: Option<ResolverOptions>,
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce these rules in addition to the environment's own.
    pub fn with_forced_policy(mut self, policy: ValidationPolicy) -> Self {
        self.forced_policy = policy;
        self
    }

    /// Override the plan's resolver options.
    pub fn with_resolver_options(mut self, options: ResolverOptions) -> Self {
        self.resolver = Some(options);
        self
    }
}

/// Why a plan passed the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GatePass {
    /// No surviving artifact declares placeholders.
    NoArtifacts,
    /// Neither restriction is enabled for the environment.
    PolicyDisabled,
    /// Every placeholder satisfied the policy.
    Validated {
        artifacts: usize,
        placeholders: usize,
        dictionary_entries: usize,
    },
}

/// Checks deployment plans against their environment's placeholder policy.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderGate {
    config: GateConfig,
}

impl PlaceholderGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Check `plan`, returning every violation at once on failure.
    pub fn check(&self, plan: &DeploymentPlan) -> GateResult<GatePass> {
        let target = &plan.application;

        let artifacts = plan.artifacts_with_placeholders();
        if artifacts.is_empty() {
            info!("No artifacts with placeholders in {}", target.name);
            return Ok(GatePass::NoArtifacts);
        }

        let policy = target.environment.policy().union(self.config.forced_policy);
        if !policy.is_enabled() {
            info!(
                "Placeholder restrictions disabled for environment {}",
                target.environment.name
            );
            return Ok(GatePass::PolicyDisabled);
        }

        let options = self.config.resolver.unwrap_or(plan.resolver);
        let dictionary = DictionaryResolver::with_options(options)
            .resolve(&target.environment.dictionaries)?;

        let errors = PlaceholderValidator::validate(&artifacts, &dictionary, &policy);
        let placeholders = artifacts.iter().map(|a| a.placeholders.len()).sum();

        match FailureReport::new(target, errors) {
            Some(report) => {
                error!(
                    "{} placeholder violations blocking {} {}",
                    report.errors.len(),
                    target.name,
                    target.version
                );
                Err(GateError::ValidationFailed(report))
            }
            None => {
                info!(
                    "{} placeholders across {} artifacts comply with {}",
                    placeholders,
                    artifacts.len(),
                    target.environment.name
                );
                Ok(GatePass::Validated {
                    artifacts: artifacts.len(),
                    placeholders,
                    dictionary_entries: dictionary.len(),
                })
            }
        }
    }
}

/// Check `plan` with the default gate configuration.
pub fn validate_placeholders(plan: &DeploymentPlan) -> GateResult<GatePass> {
    PlaceholderGate::default().check(plan)
}
