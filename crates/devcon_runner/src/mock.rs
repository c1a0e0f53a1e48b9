//! Mock process runner for testing.
//!
//! Captures every invocation and replays predefined exit codes so that
//! argument assembly can be verified without a container engine installed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{RunnerError, RunnerResult};
use crate::runner::{ExecutionResult, ProcessRunner};

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub command: String,
    pub args: Vec<String>,
}

impl CapturedCall {
    /// Position of the first argument equal to `arg`.
    pub fn position(&self, arg: &str) -> Option<usize> {
        self.args.iter().position(|a| a == arg)
    }

    /// Value following the first occurrence of `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.position(flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Mock process runner.
#[derive(Clone, Default)]
pub struct MockRunner {
    /// Exit codes returned in sequence (cycled; empty means always 0).
    exit_codes: Arc<RwLock<Vec<i32>>>,
    /// Index of next exit code to return.
    index: Arc<AtomicUsize>,
    /// Captured calls for verification.
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    /// Simulated spawn failure.
    simulate_failure: Arc<RwLock<Option<String>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exit code for the next `exec` call.
    pub fn add_exit_code(self, code: i32) -> Self {
        self.exit_codes.write().push(code);
        self
    }

    /// Set a failure to simulate (the process "cannot be spawned").
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<CapturedCall> {
        self.captured_calls.read().last().cloned()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    fn next_exit_code(&self) -> i32 {
        let codes = self.exit_codes.read();
        if codes.is_empty() {
            return 0;
        }
        let index = self.index.fetch_add(1, Ordering::SeqCst);
        codes[index % codes.len()]
    }
}

#[async_trait]
impl ProcessRunner for MockRunner {
    async fn exec(&self, command: &str, args: &[String]) -> RunnerResult<ExecutionResult> {
        self.captured_calls.write().push(CapturedCall {
            command: command.to_string(),
            args: args.to_vec(),
        });

        if let Some(msg) = self.simulate_failure.read().clone() {
            return Err(RunnerError::ExecutionFailed(msg));
        }

        Ok(ExecutionResult::new(self.next_exit_code(), 0))
    }
}
