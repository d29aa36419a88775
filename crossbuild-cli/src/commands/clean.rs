//! `crossbuild clean`.

use std::path::Path;

use anyhow::Result;

use crossbuild_runner::{clean, ExitStatus};

use super::load_options;

pub fn run(config: &Path) -> Result<ExitStatus> {
    let options = load_options(config)?;
    clean::clean(&options)?;
    println!("✓ removed crossover mirror and generated output");
    Ok(ExitStatus::Success)
}
