//! pguard CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid input
//! - 3: Validation failure
//! - 4: Dictionary resolution error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pguard_dictionary::DictionaryError;
use pguard_policy::GateError;

mod commands;

use commands::{Cli, Commands, LogFormat};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_INPUT: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const RESOLUTION_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}

/// Install the tracing subscriber; `RUST_LOG` takes precedence over the flags.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pguard={},warn", level)));

    let registry = tracing_subscriber::registry().with(filter);
    let log_result = match cli.log_format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(gate_error) = cause.downcast_ref::<GateError>() {
            return match gate_error {
                GateError::ValidationFailed(_) => ExitCodes::VALIDATION_FAILURE,
                GateError::Resolution(_) => ExitCodes::RESOLUTION_ERROR,
                _ => ExitCodes::INVALID_INPUT,
            };
        }
        if let Some(dictionary_error) = cause.downcast_ref::<DictionaryError>() {
            return if dictionary_error.is_resolution_error() {
                ExitCodes::RESOLUTION_ERROR
            } else {
                ExitCodes::INVALID_INPUT
            };
        }
    }
    ExitCodes::GENERAL_ERROR
}
