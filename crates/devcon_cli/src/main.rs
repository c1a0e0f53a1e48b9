//! devcon CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Container engine failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devcon_core::DevconError;
use devcon_runner::RunnerError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_CONFIG: u8 = 2;
    pub const ENGINE_FAILURE: u8 = 3;
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "devcon=debug"
    } else if quiet {
        "devcon=warn"
    } else {
        "devcon=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},warn", default_level)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Build(args) => commands::build::execute(args, &cli.engine).await,
        Commands::Run(args) => commands::run::execute(args, &cli.engine).await,
        Commands::Push(args) => commands::push::execute(args, &cli.engine).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<DevconError>() {
        return match err {
            DevconError::DockerfileNotConfigured(_)
            | DevconError::MountParse(_)
            | DevconError::Config(_) => ExitCodes::INVALID_CONFIG,
            DevconError::BuildxNotInstalled(_)
            | DevconError::ProcessFailed { .. }
            | DevconError::Runner(_) => ExitCodes::ENGINE_FAILURE,
            DevconError::Io(_) => ExitCodes::GENERAL_ERROR,
        };
    }

    if e.downcast_ref::<RunnerError>().is_some() {
        return ExitCodes::ENGINE_FAILURE;
    }

    ExitCodes::GENERAL_ERROR
}
