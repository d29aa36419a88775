//! `crossbuild once` and `crossbuild auto`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crossbuild_runner::{run_once, run_watch, CommandCompiler, ExitStatus, WATCH_INTERVAL};

use super::load_options;

pub fn once(config: &Path) -> Result<ExitStatus> {
    let options = load_options(config)?;
    let compiler = Arc::new(CommandCompiler::new(&options.compiler_command));
    Ok(run_once(&options, compiler)?)
}

pub fn auto(config: &Path, interval_ms: Option<u64>) -> Result<ExitStatus> {
    let options = load_options(config)?;
    let compiler = Arc::new(CommandCompiler::new(&options.compiler_command));
    let interval = interval_ms.map(Duration::from_millis).unwrap_or(WATCH_INTERVAL);
    run_watch(&options, compiler, interval)?;
    // Watch mode runs until externally terminated; reaching here is a
    // normal shutdown, not an aggregate build status.
    Ok(ExitStatus::Success)
}
