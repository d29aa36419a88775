//! Error types for crossbuild-core.

use thiserror::Error;

/// All errors that can arise while normalizing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The raw input is not valid YAML.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The input matches none of the three recognized shapes
    /// (single build map, sequence of build maps, map with `builds`).
    #[error(
        "unrecognized configuration shape; expected a build map, \
         a sequence of build maps, or a map containing `builds`"
    )]
    Shape,

    /// Two or more builds resolved to the same `output-dir`.
    #[error("builds {jobs:?} share the same output-dir {value:?}")]
    DuplicateOutputDir { value: String, jobs: Vec<usize> },

    /// A named test or REPL-launch command that is not configured.
    #[error("unknown {kind} command '{name}'")]
    UnknownCommand { kind: &'static str, name: String },

    /// A recognized shape whose fields do not deserialize into the
    /// canonical model (wrong type, missing key after defaulting, ...).
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
