//! Error types for the runner module.

use thiserror::Error;

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors that can occur while driving an external process.
///
/// A process that starts and exits non-zero is *not* an error at this
/// layer; the exit code is reported through [`crate::ExecutionResult`].
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Container engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("Failed to spawn {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Process timeout after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
