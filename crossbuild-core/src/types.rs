//! Domain types for the crossbuild configuration model.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. The canonical model is produced once per invocation by
//! [`crate::normalize::normalize`] and is immutable afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed origin-runtime namespace identifier, e.g. `foo.bar-baz`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespaceName(pub String);

impl NamespaceName {
    /// Path of this namespace relative to a source root.
    ///
    /// Follows the origin runtime's munging rules: `.` becomes a path
    /// separator and `-` becomes `_`, so `foo.bar-baz` maps to `foo/bar_baz`.
    pub fn relative_path(&self) -> PathBuf {
        self.0.replace('.', "/").replace('-', "_").into()
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for NamespaceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NamespaceName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Build jobs
// ---------------------------------------------------------------------------

/// One independent compilation job producing one output artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildJob {
    /// Zero-based position in the configured build list.
    pub index: usize,
    /// Directory of target-runtime source exclusive to this job.
    pub source_path: PathBuf,
    /// Opaque options forwarded verbatim to the external compiler.
    /// The normalizer guarantees a unique `output-dir` entry.
    pub compiler: Mapping,
    /// Whether this job's source tree is bundled into the host artifact.
    pub jar: bool,
}

impl BuildJob {
    /// The resolved `output-dir` compiler option.
    ///
    /// Guaranteed present and a string after normalization; `None` only for
    /// hand-rolled jobs that bypassed the normalizer.
    pub fn output_dir(&self) -> Option<&str> {
        self.compiler.get("output-dir").and_then(|v| v.as_str())
    }

    /// The `output-to` compiler option, if set.
    pub fn output_to(&self) -> Option<&str> {
        self.compiler.get("output-to").and_then(|v| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// Global options
// ---------------------------------------------------------------------------

/// Process-wide configuration for a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalOptions {
    /// Destination root for mirrored namespace files.
    pub crossover_path: PathBuf,
    /// Origin-runtime namespaces to mirror into the crossover tree.
    pub crossovers: Vec<NamespaceName>,
    /// Ordered roots searched when resolving crossover namespaces.
    pub search_paths: Vec<PathBuf>,
    /// Explicitly enumerated files copied into the mirror exactly once.
    pub pinned_files: Vec<PathBuf>,
    /// Port the external REPL listener binds to.
    pub repl_listen_port: u16,
    /// Named external REPL launch commands.
    pub repl_launch_commands: BTreeMap<String, Vec<String>>,
    /// Named external test invocations.
    pub test_commands: BTreeMap<String, Vec<String>>,
    /// Argv of the external cross-compiler.
    pub compiler_command: Vec<String>,
    /// Ordered build jobs.
    pub builds: Vec<BuildJob>,
}

impl GlobalOptions {
    /// Look up a named test command.
    pub fn test_command(&self, name: &str) -> Result<&[String], ConfigError> {
        self.test_commands
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::UnknownCommand {
                kind: "test",
                name: name.to_owned(),
            })
    }

    /// Look up a named REPL launch command.
    pub fn repl_launch_command(&self, name: &str) -> Result<&[String], ConfigError> {
        self.repl_launch_commands
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::UnknownCommand {
                kind: "repl-launch",
                name: name.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
