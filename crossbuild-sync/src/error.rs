//! Error types for crossbuild-sync.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a synchronization pass.
///
/// Recoverable per-file problems (an unreadable source file, an unresolved
/// namespace) are not errors; they are recorded on the
/// [`crate::mirror::SyncReport`] and the pass continues.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context. Raised for unwritable
    /// destinations and other non-recoverable filesystem failures.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
