//! Error types for crossbuild-runner.

use std::path::PathBuf;

use thiserror::Error;

/// Error surface for orchestration, cleaning, and external invocations.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] crossbuild_core::ConfigError),

    #[error("sync error: {0}")]
    Sync(#[from] crossbuild_sync::SyncError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The external process could not be started or communicated with.
    /// Distinct from a process that runs and reports failure.
    #[error("failed to run `{command}`: {source}")]
    Process {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("job worker panicked or was cancelled: {0}")]
    Join(String),

    #[error("hook registration error: {0}")]
    Hook(&'static str),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RunnerError {
    RunnerError::Io {
        path: path.into(),
        source,
    }
}
