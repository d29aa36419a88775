//! Crossbuild — dual-runtime build synchronizer CLI.
//!
//! # Usage
//!
//! ```text
//! crossbuild once [--config <path>]
//! crossbuild auto [--interval-ms <ms>]
//! crossbuild clean
//! crossbuild test [name]
//! crossbuild repl-listen
//! crossbuild repl-launch <name> [args...]
//! crossbuild repl-rhino
//! ```

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "crossbuild",
    version,
    about = "Mirror shared namespaces and drive target-runtime build jobs",
    long_about = None,
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "crossbuild.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build every configured job once.
    Once,

    /// Rebuild continuously, re-syncing crossovers on a fixed cadence.
    Auto {
        /// Polling cadence in milliseconds (default: one second).
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Remove the crossover mirror and all generated build output.
    Clean,

    /// Run configured test commands (all of them, or one by name).
    Test { name: Option<String> },

    /// Start the external REPL listener on the configured port.
    ReplListen,

    /// Run a named REPL launch command with extra arguments appended.
    ReplLaunch {
        name: String,
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Start a Rhino-backed REPL.
    ReplRhino,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    crossbuild_runner::init_tracing();

    let status = match cli.command {
        Commands::Once => commands::build::once(&cli.config)?,
        Commands::Auto { interval_ms } => commands::build::auto(&cli.config, interval_ms)?,
        Commands::Clean => commands::clean::run(&cli.config)?,
        Commands::Test { name } => commands::test::run(&cli.config, name.as_deref())?,
        Commands::ReplListen => commands::repl::listen(&cli.config)?,
        Commands::ReplLaunch { name, args } => commands::repl::launch(&cli.config, &name, &args)?,
        Commands::ReplRhino => commands::repl::rhino()?,
    };
    Ok(status.into())
}
