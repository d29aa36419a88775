//! Content-idempotent atomic writer.
//!
//! ## Write protocol
//!
//! 1. SHA-256 hash the transformed content.
//! 2. If the destination exists and its content hashes identically, skip.
//! 3. Write to a `.crossbuild.tmp` sibling.
//! 4. Rename to the final path (atomic on POSIX).
//!
//! Idempotence is content-based, never mtime-based, so clock skew cannot
//! cause spurious rewrites and repeated sync passes are cheap no-ops.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// Outcome of an individual mirror write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Destination was missing or its content differed.
    Written,
    /// Destination already holds identical content; nothing touched.
    Unchanged,
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Write `content` to `path` only if the destination is missing or differs.
///
/// An unwritable destination is fatal ([`SyncError::Io`]); callers abort
/// the current synchronization pass.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteOutcome, SyncError> {
    if path.exists() {
        // An unreadable destination falls through to the write, which will
        // surface the real error if the location is genuinely unusable.
        if let Ok(existing) = std::fs::read_to_string(path) {
            if sha256_hex(&existing) == sha256_hex(content) {
                tracing::debug!("unchanged: {}", path.display());
                return Ok(WriteOutcome::Unchanged);
            }
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp = PathBuf::from(format!("{}.crossbuild.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::debug!("wrote: {}", path.display());
    Ok(WriteOutcome::Written)
}
