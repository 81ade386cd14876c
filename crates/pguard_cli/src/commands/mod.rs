//! CLI command definitions.
//!
//! This module defines the command structure for the pguard CLI.

use clap::{Parser, Subcommand, ValueEnum};

pub mod resolve;
pub mod validate;

/// pguard - restrict deployment placeholders to environment dictionaries
#[derive(Parser)]
#[command(name = "pguard")]
#[command(version, about = "pguard - restrict deployment placeholders to environment dictionaries")]
#[command(long_about = r#"
pguard consolidates an environment's dictionaries into one resolved mapping and
checks the placeholders declared by deployed artifacts against it.

COMMANDS:
  resolve   → Print the consolidated dictionary of a plan or of dictionary files
  validate  → Check a deployment plan against its environment's placeholder policy

ENVIRONMENT PROPERTIES:
  limitPlaceholdersToDictionaries       → placeholder keys must exist in a dictionary
  limitPlaceholderValuesToDictionaries  → placeholder values must equal dictionary values

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid input
  3 - Validation failure
  4 - Dictionary resolution error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the consolidated, fully resolved dictionary
    Resolve(resolve::ResolveArgs),

    /// Validate artifact placeholders of a deployment plan
    Validate(validate::ValidateArgs),
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Command output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Parse a pass ceiling, which must be at least one.
pub(crate) fn parse_max_passes(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
