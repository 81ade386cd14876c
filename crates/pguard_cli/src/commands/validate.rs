//! Validate command - Check a deployment plan's placeholders.
//!
//! Loads the plan, consolidates the target environment's dictionaries and
//! reports every placeholder that violates the environment's policy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use tracing::info;

use pguard_dictionary::ResolverOptions;
use pguard_policy::{
    DeploymentPlan, GateConfig, GateError, GatePass, PlaceholderGate, ValidationPolicy,
};

use super::{parse_max_passes, OutputFormat};

#[derive(Args)]
pub struct ValidateArgs {
    /// Deployment plan to check
    #[arg(short, long, env = "PGUARD_PLAN")]
    plan: PathBuf,

    /// Require placeholder keys to exist in a dictionary, whatever the environment says
    #[arg(long)]
    limit_placeholders: bool,

    /// Require placeholder values to match dictionary values, whatever the environment says
    #[arg(long)]
    limit_placeholder_values: bool,

    /// Maximum number of resolution passes
    #[arg(long, env = "PGUARD_MAX_PASSES", value_parser = parse_max_passes)]
    max_passes: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating placeholders of plan {:?}", args.plan);

    let plan = DeploymentPlan::from_file(&args.plan)
        .with_context(|| format!("Failed to load deployment plan {:?}", args.plan))?;

    let mut config = GateConfig::new().with_forced_policy(ValidationPolicy::new(
        args.limit_placeholders,
        args.limit_placeholder_values,
    ));
    if let Some(max_passes) = args.max_passes {
        config = config.with_resolver_options(ResolverOptions::default().with_max_passes(max_passes));
    }

    let gate = PlaceholderGate::new(config);
    match gate.check(&plan) {
        Ok(pass) => {
            print_pass(&plan, &pass, args.format)?;
            Ok(())
        }
        Err(GateError::ValidationFailed(report)) => {
            if args.format != OutputFormat::Text {
                let body = json!({ "passed": false, "report": &report });
                print_structured(&body, args.format)?;
            }
            Err(GateError::ValidationFailed(report).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_pass(plan: &DeploymentPlan, pass: &GatePass, format: OutputFormat) -> Result<()> {
    if format != OutputFormat::Text {
        let body = json!({ "passed": true, "result": pass });
        return print_structured(&body, format);
    }

    let target = &plan.application;
    match pass {
        GatePass::NoArtifacts => {
            println!("✅ No artifacts with placeholders in '{}'", target.name);
        }
        GatePass::PolicyDisabled => {
            println!(
                "✅ Placeholder restrictions are not enabled for '{}'",
                target.environment.name
            );
        }
        GatePass::Validated {
            artifacts,
            placeholders,
            dictionary_entries,
        } => {
            println!(
                "✅ '{}' (version {}) may be deployed to '{}'",
                target.name, target.version, target.environment.name
            );
            println!("   Artifacts:     {}", artifacts);
            println!("   Placeholders:  {}", placeholders);
            println!("   Dictionary:    {} entries", dictionary_entries);
        }
    }
    Ok(())
}

fn print_structured(body: &serde_json::Value, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(body).context("Failed to serialize result")?,
        _ => serde_json::to_string_pretty(body).context("Failed to serialize result")?,
    };
    println!("{}", rendered);
    Ok(())
}
