//! REPL glue — thin launchers for the external REPL collaborators.
//!
//! The REPL bridges themselves are external programs; crossbuild only
//! assembles their argv from configuration and waits for them to exit.

use crossbuild_core::GlobalOptions;

use crate::aggregate::{aggregate_flags, ExitStatus};
use crate::error::RunnerError;
use crate::process;

/// Program implementing the target-runtime REPL bridges.
pub const REPL_PROGRAM: &str = "cljs-repl";

/// Start the REPL listener on the configured port and wait for it.
pub fn repl_listen(options: &GlobalOptions) -> Result<ExitStatus, RunnerError> {
    tracing::info!("starting REPL listener on port {}", options.repl_listen_port);
    let argv = vec![
        REPL_PROGRAM.to_owned(),
        "--listen".to_owned(),
        options.repl_listen_port.to_string(),
    ];
    Ok(aggregate_flags([process::run_argv(&argv)?]))
}

/// Start a Rhino-backed REPL and wait for it.
pub fn repl_rhino() -> Result<ExitStatus, RunnerError> {
    let argv = vec![REPL_PROGRAM.to_owned(), "--rhino".to_owned()];
    Ok(aggregate_flags([process::run_argv(&argv)?]))
}

/// Run the named launch command with any extra arguments appended.
///
/// An unknown name is a fatal configuration error.
pub fn repl_launch(
    options: &GlobalOptions,
    name: &str,
    extra_args: &[String],
) -> Result<ExitStatus, RunnerError> {
    let mut argv = options.repl_launch_command(name)?.to_vec();
    argv.extend_from_slice(extra_args);
    tracing::info!("launching REPL command '{name}'");
    Ok(aggregate_flags([process::run_argv(&argv)?]))
}
