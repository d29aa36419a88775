//! Namespace-to-source resolution against the module search path.
//!
//! Mirrors standard module-path semantics: the first search root containing
//! a matching directory wins; failing that, the first root containing a
//! matching single `.clj` file wins. Archive-style sources cannot be
//! discovered here — callers enumerate those explicitly and copy them once
//! (see [`crate::mirror::copy_pinned`]).

use std::path::{Path, PathBuf};

use crossbuild_core::NamespaceName;

use crate::error::{io_err, SyncError};

/// Extension of origin-runtime source files.
pub const SOURCE_EXTENSION: &str = "clj";

/// An on-disk source resolved for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceSource {
    /// A directory realizing the namespace; discovered recursively.
    Dir { root: PathBuf, dir: PathBuf },
    /// A single file realizing the namespace.
    File { root: PathBuf, file: PathBuf },
}

/// Resolve a namespace against the search roots, first match wins.
pub fn resolve(namespace: &NamespaceName, search_roots: &[PathBuf]) -> Option<NamespaceSource> {
    let relative = namespace.relative_path();
    for root in search_roots {
        let dir = root.join(&relative);
        if dir.is_dir() {
            return Some(NamespaceSource::Dir {
                root: root.clone(),
                dir,
            });
        }
        let file = root.join(relative.with_extension(SOURCE_EXTENSION));
        if file.is_file() {
            return Some(NamespaceSource::File {
                root: root.clone(),
                file,
            });
        }
    }
    None
}

/// Recursively enumerate every file under `dir`, sorted for determinism.
pub fn walk(dir: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let mut files = Vec::new();
    walk_into(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_into(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SyncError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            walk_into(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
