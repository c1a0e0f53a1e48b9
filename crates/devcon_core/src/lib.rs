//! # devcon_core
//!
//! Builds, runs and pushes dev containers described by
//! `.devcontainer/devcontainer.json`, driving the container engine CLI.
//!
//! ## Operations
//!
//! - **build**: `buildx build` of the configured Dockerfile, tagged
//!   `<image>:latest`, with registry cache import and inline cache export
//! - **run**: `run` with the checkout bind-mounted as the workspace, the
//!   config's mounts and run arguments, then the caller's command
//! - **push**: `push <image>:latest`
//!
//! ## Example
//!
//! ```rust,no_run
//! use devcon_core::{DevContainerCli, RunOptions};
//! use devcon_runner::{CliRunner, CliRunnerOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = CliRunnerOptions::default();
//!     let engine = CliRunner::detect_engine(&options)?;
//!     let cli = DevContainerCli::new(CliRunner::new(options), engine);
//!
//!     cli.build_image("ghcr.io/acme/dev", ".", "").await?;
//!     cli.run_container("ghcr.io/acme/dev", ".", "", &RunOptions::new("make test"))
//!         .await?;
//!     cli.push_image("ghcr.io/acme/dev").await?;
//!     Ok(())
//! }
//! ```

pub mod args;
pub mod error;
pub mod mount;
pub mod orchestrator;

pub use args::{image_ref, push_args, BuildInvocation, RunInvocation, CHOWN_PREFIX, IMAGE_TAG};
pub use error::{DevconError, DevconResult, Operation};
pub use mount::{parse_mount, MountParseError, MountSpec};
pub use orchestrator::{DevContainerCli, RunOptions};
