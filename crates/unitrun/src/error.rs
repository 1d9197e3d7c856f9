//! Runner errors

use thiserror::Error;

/// Errors surfaced by the driver surface
#[derive(Error, Debug)]
pub enum RunError {
    #[error("No test suite named '{0}'")]
    SuiteNotFound(String),

    /// The process-wide registry is already executing a run on this or
    /// another thread. Runs are not reentrant.
    #[error("A test run is already in progress")]
    RunInProgress,

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] unitrun_config::ConfigError),
}

/// Result type for runner operations
pub type RunResult<T> = Result<T, RunError>;
