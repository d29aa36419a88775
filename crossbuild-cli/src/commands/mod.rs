//! Subcommand implementations.

pub mod build;
pub mod clean;
pub mod repl;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crossbuild_core::{normalize, ConfigDefaults, GlobalOptions};

/// Load and normalize the configuration file.
///
/// Deprecation warnings for legacy shapes are printed to stderr in yellow,
/// echoing the equivalent canonical form.
pub fn load_options(config: &Path) -> Result<GlobalOptions> {
    let raw = std::fs::read_to_string(config)
        .with_context(|| format!("cannot read configuration at {}", config.display()))?;
    let normalized = normalize(&raw, &ConfigDefaults::standard())
        .with_context(|| format!("invalid configuration at {}", config.display()))?;

    for warning in &normalized.warnings {
        eprintln!("{}", warning.to_string().yellow());
    }
    Ok(normalized.options)
}
