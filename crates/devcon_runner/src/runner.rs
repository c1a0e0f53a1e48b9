//! Process runner trait and types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RunnerResult;

/// Outcome of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit code (-1 when the process was terminated by a signal)
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn new(exit_code: i32, duration_ms: u64) -> Self {
        Self {
            exit_code,
            duration_ms,
        }
    }

    /// Check if execution was successful (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The single channel to the container engine.
///
/// Implementations run `command` with `args` and resolve once the process
/// has terminated.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn exec(&self, command: &str, args: &[String]) -> RunnerResult<ExecutionResult>;
}

#[async_trait]
impl<R: ProcessRunner + ?Sized> ProcessRunner for Box<R> {
    async fn exec(&self, command: &str, args: &[String]) -> RunnerResult<ExecutionResult> {
        (**self).exec(command, args).await
    }
}

#[async_trait]
impl<R: ProcessRunner + ?Sized> ProcessRunner for std::sync::Arc<R> {
    async fn exec(&self, command: &str, args: &[String]) -> RunnerResult<ExecutionResult> {
        (**self).exec(command, args).await
    }
}
