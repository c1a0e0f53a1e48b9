//! Error types for dev container orchestration.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::mount::MountParseError;

/// Result type alias for orchestration operations.
pub type DevconResult<T> = Result<T, DevconError>;

/// Engine operation that produced an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Build,
    Run,
    Push,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Run => write!(f, "run"),
            Self::Push => write!(f, "push"),
        }
    }
}

/// Errors that can occur while building, running or pushing a dev container.
#[derive(Error, Debug)]
pub enum DevconError {
    #[error(
        "No Dockerfile configured in {0}: only Dockerfile-based dev containers are currently supported"
    )]
    DockerfileNotConfigured(PathBuf),

    #[error("{0} buildx is not available; install the buildx plugin to build dev containers")]
    BuildxNotInstalled(devcon_runner::ContainerEngine),

    #[error("{operation} failed with exit code {exit_code}")]
    ProcessFailed { operation: Operation, exit_code: i32 },

    #[error("Invalid mount: {0}")]
    MountParse(#[from] MountParseError),

    #[error("Config error: {0}")]
    Config(#[from] devcon_config::ConfigError),

    #[error("Runner error: {0}")]
    Runner(#[from] devcon_runner::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DevconError {
    /// Exit code of the failed engine process, if that is what failed.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ProcessFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failed_message_names_exit_code() {
        let err = DevconError::ProcessFailed {
            operation: Operation::Push,
            exit_code: 125,
        };
        assert_eq!(err.to_string(), "push failed with exit code 125");
        assert_eq!(err.exit_code(), Some(125));
    }

    #[test]
    fn test_buildx_message_names_engine() {
        let err = DevconError::BuildxNotInstalled(devcon_runner::ContainerEngine::Podman);
        assert!(err.to_string().starts_with("podman buildx"));
    }

    #[test]
    fn test_mount_error_carries_key() {
        let err: DevconError = MountParseError::UnhandledOption("bogus".to_string()).into();
        assert!(err.to_string().contains("bogus"));
        assert_eq!(err.exit_code(), None);
    }
}
