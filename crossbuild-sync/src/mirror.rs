//! The crossover mirror — sync entrypoint and pass report.
//!
//! One [`sync`] call is one complete synchronization pass: resolve every
//! requested namespace, enumerate its on-disk files fresh (nothing is
//! cached across passes), apply the sentinel rewrite rules, and write
//! content-idempotently into the destination tree. Callable repeatedly;
//! when nothing changed the pass performs zero filesystem writes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crossbuild_core::NamespaceName;

use crate::error::{io_err, SyncError};
use crate::resolver::{self, NamespaceSource};
use crate::rewrite;
use crate::writer::{write_if_changed, WriteOutcome};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A single file backing an origin-runtime namespace, discovered fresh on
/// every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceFile {
    /// Absolute (or root-relative) path of the origin file.
    pub source_path: PathBuf,
    /// Path relative to the namespace's search root; mirrors to
    /// `<dest_root>/<relative_path>`.
    pub relative_path: PathBuf,
    /// Marked by the in-file macro sentinel; never mirrored.
    pub macro_only: bool,
    pub last_modified: DateTime<Utc>,
}

/// A recoverable per-file problem; the file is skipped, the pass continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncIssue {
    pub path: PathBuf,
    pub detail: String,
}

/// Outcome of one synchronization pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub written: usize,
    pub unchanged: usize,
    pub skipped_macro: usize,
    pub copied_once: usize,
    /// Every discovered namespace file, mirrored or not.
    pub files: Vec<NamespaceFile>,
    /// Namespaces that matched no search root.
    pub unresolved: Vec<NamespaceName>,
    /// Recoverable per-file problems (unreadable sources).
    pub issues: Vec<SyncIssue>,
}

impl SyncReport {
    /// True when the pass completed without skipped files or unresolved
    /// namespaces.
    pub fn clean(&self) -> bool {
        self.unresolved.is_empty() && self.issues.is_empty()
    }
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

/// Run one synchronization pass for `namespaces` into `dest_root`.
///
/// Idempotent: repeated calls with unchanged sources write nothing. An
/// unwritable destination aborts the pass with [`SyncError::Io`].
pub fn sync(
    dest_root: &Path,
    namespaces: &[NamespaceName],
    search_roots: &[PathBuf],
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    for namespace in namespaces {
        match resolver::resolve(namespace, search_roots) {
            None => {
                tracing::warn!("crossover namespace '{namespace}' not found on any search root");
                report.unresolved.push(namespace.clone());
            }
            Some(NamespaceSource::Dir { root, dir }) => {
                for file in resolver::walk(&dir)? {
                    mirror_file(dest_root, &root, &file, &mut report)?;
                }
            }
            Some(NamespaceSource::File { root, file }) => {
                mirror_file(dest_root, &root, &file, &mut report)?;
            }
        }
    }

    Ok(report)
}

/// Process one discovered origin file: sentinel rules, then an idempotent
/// write of the rewritten content.
fn mirror_file(
    dest_root: &Path,
    root: &Path,
    source: &Path,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    let Ok(relative) = source.strip_prefix(root) else {
        // Resolution always yields paths under their root; a mismatch means
        // the tree mutated mid-pass. Skip rather than mirror to a bad path.
        report.issues.push(SyncIssue {
            path: source.to_path_buf(),
            detail: "source escaped its search root".to_owned(),
        });
        return Ok(());
    };

    let (content, last_modified) = match read_source(source) {
        Ok(pair) => pair,
        Err(detail) => {
            tracing::warn!("skipping unreadable source {}: {detail}", source.display());
            report.issues.push(SyncIssue {
                path: source.to_path_buf(),
                detail,
            });
            return Ok(());
        }
    };

    let macro_only = rewrite::is_macro_only(&content);
    report.files.push(NamespaceFile {
        source_path: source.to_path_buf(),
        relative_path: relative.to_path_buf(),
        macro_only,
        last_modified,
    });

    let dest = dest_root.join(relative);
    if macro_only {
        report.skipped_macro += 1;
        remove_stale(&dest)?;
        return Ok(());
    }

    match write_if_changed(&dest, &rewrite::strip_removals(&content))? {
        WriteOutcome::Written => report.written += 1,
        WriteOutcome::Unchanged => report.unchanged += 1,
    }
    Ok(())
}

fn read_source(path: &Path) -> Result<(String, DateTime<Utc>), String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    Ok((content, modified))
}

/// A file that gained the macro sentinel must also disappear from the
/// mirror; sync guarantees macro-only files are never present after a pass.
fn remove_stale(dest: &Path) -> Result<(), SyncError> {
    match std::fs::remove_file(dest) {
        Ok(()) => {
            tracing::info!("removed stale mirror copy: {}", dest.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err(dest, e)),
    }
}

// ---------------------------------------------------------------------------
// copy_pinned
// ---------------------------------------------------------------------------

/// Copy explicitly enumerated files into the mirror, once.
///
/// This is the archive-origin path: such sources cannot be recursively
/// discovered, so they are copied verbatim (no sentinel rewriting) at the
/// start of compilation and never re-checked. A pinned file whose
/// destination already exists is left alone, even if the source changed —
/// a documented limitation, not an oversight.
pub fn copy_pinned(dest_root: &Path, files: &[PathBuf]) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    for file in files {
        let relative: PathBuf = if file.is_absolute() {
            match file.file_name() {
                Some(name) => PathBuf::from(name),
                None => {
                    report.issues.push(SyncIssue {
                        path: file.clone(),
                        detail: "pinned file has no file name".to_owned(),
                    });
                    continue;
                }
            }
        } else {
            file.clone()
        };

        let dest = dest_root.join(&relative);
        if dest.exists() {
            report.unchanged += 1;
            continue;
        }

        // Byte-for-byte copy: archive members need not be UTF-8 text.
        let content = match std::fs::read(file) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("skipping unreadable pinned file {}: {e}", file.display());
                report.issues.push(SyncIssue {
                    path: file.clone(),
                    detail: e.to_string(),
                });
                continue;
            }
        };

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::write(&dest, &content).map_err(|e| io_err(&dest, e))?;
        report.copied_once += 1;
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn ns(name: &str) -> Vec<NamespaceName> {
        vec![NamespaceName::from(name)]
    }

    #[test]
    fn unresolved_namespace_reported_not_fatal() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let report = sync(
            dst.path(),
            &ns("missing.ns"),
            &[src.path().to_path_buf()],
        )
        .unwrap();
        assert_eq!(report.unresolved, vec![NamespaceName::from("missing.ns")]);
        assert!(!report.clean());
    }

    #[test]
    fn macro_file_gaining_sentinel_is_removed_from_mirror() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let dir = src.path().join("shared");
        fs::create_dir_all(&dir).unwrap();
        let origin = dir.join("macros.clj");
        fs::write(&origin, "(ns shared.macros)").unwrap();

        let roots = vec![src.path().to_path_buf()];
        sync(dst.path(), &ns("shared"), &roots).unwrap();
        let mirrored = dst.path().join("shared/macros.clj");
        assert!(mirrored.exists());

        fs::write(&origin, "(ns shared.macros) ;*crossbuild-macro-file*;").unwrap();
        let report = sync(dst.path(), &ns("shared"), &roots).unwrap();
        assert_eq!(report.skipped_macro, 1);
        assert!(!mirrored.exists(), "stale mirror copy must be removed");
    }

    #[test]
    fn pinned_files_copy_once_and_are_not_refreshed() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let pinned = src.path().join("vendored.clj");
        fs::write(&pinned, "v1").unwrap();

        let files = vec![pinned.clone()];
        let first = copy_pinned(dst.path(), &files).unwrap();
        assert_eq!(first.copied_once, 1);
        let dest = dst.path().join("vendored.clj");
        assert_eq!(fs::read_to_string(&dest).unwrap(), "v1");

        fs::write(&pinned, "v2").unwrap();
        let second = copy_pinned(dst.path(), &files).unwrap();
        assert_eq!(second.copied_once, 0);
        assert_eq!(second.unchanged, 1);
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "v1",
            "pinned copies are never re-scanned"
        );
    }

    #[test]
    fn pinned_files_need_not_be_utf8() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let pinned = src.path().join("blob.bin");
        let bytes = [0xff, 0xfe, 0x00, 0x42];
        fs::write(&pinned, bytes).unwrap();

        let report = copy_pinned(dst.path(), &[pinned]).unwrap();
        assert_eq!(report.copied_once, 1);
        assert!(report.issues.is_empty());
        assert_eq!(fs::read(dst.path().join("blob.bin")).unwrap(), bytes);
    }

    #[test]
    fn discovered_files_carry_flags_and_relative_paths() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let dir = src.path().join("shared/util");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.clj"), "(ns shared.util.a)").unwrap();
        fs::write(dir.join("b.clj"), ";*crossbuild-macro-file*;").unwrap();

        let report = sync(
            dst.path(),
            &ns("shared.util"),
            &[src.path().to_path_buf()],
        )
        .unwrap();
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].relative_path, PathBuf::from("shared/util/a.clj"));
        assert!(!report.files[0].macro_only);
        assert!(report.files[1].macro_only);
    }
}
