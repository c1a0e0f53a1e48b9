//! CLI command definitions.
//!
//! Each subcommand maps to one container engine operation.

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use devcon_core::DevContainerCli;
use devcon_runner::{CliRunner, CliRunnerOptions, ContainerEngine};

pub mod build;
pub mod push;
pub mod run;

/// devcon - build and run development containers
#[derive(Parser)]
#[command(name = "devcon")]
#[command(version, about = "devcon - build, run and push dev containers")]
#[command(long_about = r#"
devcon builds and runs development containers described by
.devcontainer/devcontainer.json, driving the docker (or podman) CLI.

WORKFLOWS:
  build  → Build <image>:latest from the configured Dockerfile
  run    → Run a command in <image>:latest with the checkout mounted
  push   → Push <image>:latest

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Container engine failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options controlling how the container engine is invoked.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Container engine to use (auto-detected when omitted)
    #[arg(long, global = true, env = "DEVCON_ENGINE")]
    pub engine: Option<ContainerEngine>,

    /// Log engine commands without executing them
    #[arg(long, global = true, env = "DEVCON_DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,

    /// Timestamped log lines for CI systems
    #[arg(long, global = true, env = "CI", value_parser = FalseyValueParser::new())]
    pub ci: bool,

    /// Kill the engine process after this many seconds (0 = never)
    #[arg(long, global = true, env = "DEVCON_TIMEOUT", default_value_t = 0)]
    pub timeout: u64,
}

impl EngineArgs {
    /// Resolve the engine and build the orchestrator.
    pub fn connect(&self) -> Result<DevContainerCli<CliRunner>> {
        let mut options = CliRunnerOptions::new().ci_mode(self.ci).timeout(self.timeout);
        if self.dry_run {
            options = options.dry_run();
        }
        if let Some(engine) = self.engine {
            options = options.prefer(engine);
        }

        let engine: ContainerEngine = CliRunner::detect_engine(&options)?;
        info!("Using container engine: {}", engine);

        Ok(DevContainerCli::new(CliRunner::new(options), engine))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the dev container image
    Build(build::BuildArgs),

    /// Run a command in the dev container
    Run(run::RunArgs),

    /// Push the dev container image
    Push(push::PushArgs),
}
