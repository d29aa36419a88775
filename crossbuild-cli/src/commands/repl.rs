//! `crossbuild repl-listen`, `repl-launch`, `repl-rhino`.

use std::path::Path;

use anyhow::Result;

use crossbuild_runner::{repl, ExitStatus};

use super::load_options;

pub fn listen(config: &Path) -> Result<ExitStatus> {
    let options = load_options(config)?;
    Ok(repl::repl_listen(&options)?)
}

pub fn launch(config: &Path, name: &str, args: &[String]) -> Result<ExitStatus> {
    let options = load_options(config)?;
    Ok(repl::repl_launch(&options, name, args)?)
}

pub fn rhino() -> Result<ExitStatus> {
    Ok(repl::repl_rhino()?)
}
