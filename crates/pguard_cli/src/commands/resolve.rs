//! Resolve command - Print the consolidated dictionary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use tracing::info;

use pguard_dictionary::{ConsolidatedDictionary, Dictionary, DictionaryResolver, ResolverOptions};
use pguard_policy::DeploymentPlan;

use super::{parse_max_passes, OutputFormat};

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["plan", "dictionaries"])))]
pub struct ResolveArgs {
    /// Deployment plan whose environment dictionaries are consolidated
    #[arg(short, long)]
    plan: Option<PathBuf>,

    /// Dictionary file; repeat for more layers, highest priority first
    #[arg(short, long = "dictionary", value_name = "FILE")]
    dictionaries: Vec<PathBuf>,

    /// Maximum number of resolution passes
    #[arg(long, env = "PGUARD_MAX_PASSES", value_parser = parse_max_passes)]
    max_passes: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub fn execute(args: ResolveArgs) -> Result<()> {
    let (layers, mut options) = match &args.plan {
        Some(path) => {
            info!("Resolving dictionaries of plan {:?}", path);
            let plan = DeploymentPlan::from_file(path)
                .with_context(|| format!("Failed to load deployment plan {:?}", path))?;
            (plan.application.environment.dictionaries, plan.resolver)
        }
        None => {
            let layers = args
                .dictionaries
                .iter()
                .map(|path| {
                    Dictionary::from_file(path)
                        .with_context(|| format!("Failed to load dictionary {:?}", path))
                })
                .collect::<Result<Vec<_>>>()?;
            (layers, ResolverOptions::default())
        }
    };

    if let Some(max_passes) = args.max_passes {
        options = options.with_max_passes(max_passes);
    }

    let dictionary = DictionaryResolver::with_options(options).resolve(&layers)?;
    println!("{}", render(&dictionary, args.format)?);

    Ok(())
}

/// Render the dictionary in the requested format.
fn render(dictionary: &ConsolidatedDictionary, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Text => dictionary
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(dictionary)
            .context("Failed to serialize dictionary")?,
        OutputFormat::Yaml => {
            serde_yaml::to_string(dictionary).context("Failed to serialize dictionary")?
        }
    };
    Ok(rendered)
}
