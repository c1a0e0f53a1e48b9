//! CLI-based process runner supporting Docker and Podman.
//!
//! This module spawns the container engine's command-line tool, forwards its
//! output to the console line by line and reports the exit code back to the
//! caller.

use std::process::{Command, Stdio};
use std::str::FromStr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, error, info, warn};

use crate::error::{RunnerError, RunnerResult};
use crate::runner::{ExecutionResult, ProcessRunner};

/// Container engine type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerEngine {
    Docker,
    Podman,
}

impl ContainerEngine {
    /// Get the CLI command name.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Podman => "podman",
        }
    }
}

impl std::fmt::Display for ContainerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command())
    }
}

impl FromStr for ContainerEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "podman" => Ok(Self::Podman),
            other => Err(format!(
                "unknown container engine '{}' (expected docker or podman)",
                other
            )),
        }
    }
}

/// A single line of process output.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub timestamp: chrono::DateTime<Utc>,
    pub stream: LogStream,
    pub message: String,
}

impl LogLine {
    fn now(stream: LogStream, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            stream,
            message,
        }
    }

    /// Render the line for a CI log (GitHub Actions compatible).
    pub fn ci_format(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.stream,
            self.message
        )
    }
}

/// Log stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl std::fmt::Display for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::Stderr => write!(f, "stderr"),
        }
    }
}

/// CLI runner options.
#[derive(Debug, Clone)]
pub struct CliRunnerOptions {
    /// Preferred engine (if not set, auto-detect)
    pub preferred_engine: Option<ContainerEngine>,
    /// Dry-run mode (log commands without executing)
    pub dry_run: bool,
    /// CI mode (timestamped log lines)
    pub ci_mode: bool,
    /// Timeout in seconds (0 = no timeout)
    pub timeout_seconds: u64,
}

impl Default for CliRunnerOptions {
    fn default() -> Self {
        Self {
            preferred_engine: None,
            dry_run: false,
            ci_mode: std::env::var("CI").is_ok(),
            timeout_seconds: 0,
        }
    }
}

impl CliRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn ci_mode(mut self, enabled: bool) -> Self {
        self.ci_mode = enabled;
        self
    }

    pub fn prefer(mut self, engine: ContainerEngine) -> Self {
        self.preferred_engine = Some(engine);
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// CLI-based process runner.
pub struct CliRunner {
    options: CliRunnerOptions,
}

impl CliRunner {
    pub fn new(options: CliRunnerOptions) -> Self {
        Self { options }
    }

    /// Detect an available container engine.
    ///
    /// The preferred engine wins when it responds to `version`; otherwise
    /// Docker is tried before Podman.
    pub fn detect_engine(options: &CliRunnerOptions) -> RunnerResult<ContainerEngine> {
        if let Some(preferred) = options.preferred_engine {
            if options.dry_run || Self::is_engine_available(preferred) {
                return Ok(preferred);
            }
            warn!(
                "Preferred engine {} not available, trying alternatives",
                preferred
            );
        }

        if Self::is_engine_available(ContainerEngine::Docker) {
            return Ok(ContainerEngine::Docker);
        }

        if Self::is_engine_available(ContainerEngine::Podman) {
            return Ok(ContainerEngine::Podman);
        }

        if options.dry_run {
            return Ok(ContainerEngine::Docker);
        }

        Err(RunnerError::EngineNotAvailable(
            "Neither Docker nor Podman is available".to_string(),
        ))
    }

    fn is_engine_available(engine: ContainerEngine) -> bool {
        Command::new(engine.command())
            .arg("version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Check if dry-run mode is enabled.
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Format a command line for logging.
    pub fn format_command(command: &str, args: &[String]) -> String {
        let mut cmd = command.to_string();
        for arg in args {
            if arg.contains(' ') || arg.contains('=') {
                cmd.push_str(&format!(" '{}'", arg));
            } else {
                cmd.push_str(&format!(" {}", arg));
            }
        }
        cmd
    }
}

async fn forward_lines<R>(reader: R, stream: LogStream, ci_mode: bool)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(message)) => {
                let line = LogLine::now(stream, message);
                if ci_mode {
                    println!("{}", line.ci_format());
                } else {
                    match stream {
                        LogStream::Stdout => println!("{}", line.message),
                        LogStream::Stderr => eprintln!("{}", line.message),
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped reading {}: {}", stream, e);
                break;
            }
        }
    }
}

#[async_trait]
impl ProcessRunner for CliRunner {
    async fn exec(&self, command: &str, args: &[String]) -> RunnerResult<ExecutionResult> {
        let cmd_str = Self::format_command(command, args);

        if self.options.dry_run {
            info!("[DRY-RUN] Would execute: {}", cmd_str);
            return Ok(ExecutionResult::new(0, 0));
        }

        debug!("Executing: {}", cmd_str);
        let started = Instant::now();

        let mut child = tokio::process::Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::SpawnFailed {
                command: command.to_string(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunnerError::ExecutionFailed("stdout was not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunnerError::ExecutionFailed("stderr was not captured".into()))?;

        let ci_mode = self.options.ci_mode;
        let stdout_task = tokio::spawn(forward_lines(stdout, LogStream::Stdout, ci_mode));
        let stderr_task = tokio::spawn(forward_lines(stderr, LogStream::Stderr, ci_mode));

        let status = if self.options.timeout_seconds > 0 {
            let limit = Duration::from_secs(self.options.timeout_seconds);
            match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(RunnerError::Timeout(self.options.timeout_seconds));
                }
            }
        } else {
            child.wait().await?
        };

        let _ = stdout_task.await;
        let _ = stderr_task.await;

        let exit_code = status.code().unwrap_or(-1);
        let duration_ms = started.elapsed().as_millis() as u64;

        if exit_code == 0 {
            info!("{} completed successfully in {}ms", command, duration_ms);
        } else {
            error!(
                "{} failed with exit code {} after {}ms",
                command, exit_code, duration_ms
            );
        }

        Ok(ExecutionResult::new(exit_code, duration_ms))
    }
}
