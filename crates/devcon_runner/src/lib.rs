//! # devcon_runner
//!
//! Process execution layer for devcon.
//!
//! Every container engine invocation goes through the [`ProcessRunner`]
//! trait: a command name plus an ordered argument list in, an exit code out.
//!
//! # Features
//!
//! - **Engine Detection**: Docker first, Podman as fallback
//! - **Dry-Run Mode**: Log commands without execution
//! - **CI Integration**: Timestamped log lines compatible with GitHub Actions
//! - **Mock Runner**: For testing without actual containers
//!
//! # Example
//!
//! ```rust,no_run
//! use devcon_runner::{CliRunner, CliRunnerOptions, ProcessRunner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = CliRunnerOptions::default();
//!     let engine = CliRunner::detect_engine(&options)?;
//!     let runner = CliRunner::new(options);
//!
//!     let result = runner.exec(engine.command(), &["version".to_string()]).await?;
//!     println!("Exit code: {}", result.exit_code);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod mock;
pub mod runner;

pub use cli::{CliRunner, CliRunnerOptions, ContainerEngine, LogLine, LogStream};
pub use error::{RunnerError, RunnerResult};
pub use mock::{CapturedCall, MockRunner};
pub use runner::{ExecutionResult, ProcessRunner};
