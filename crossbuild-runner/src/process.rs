//! Spawning external collaborator processes.

use std::io;
use std::process::Command;

use crate::error::RunnerError;

/// Run an argv to completion, returning whether it exited successfully.
///
/// A process that cannot be spawned is [`RunnerError::Process`]; a process
/// that runs and exits nonzero is a normal `Ok(false)`.
pub fn run_argv(argv: &[String]) -> Result<bool, RunnerError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(RunnerError::Process {
            command: "<empty>".to_owned(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
        });
    };

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| RunnerError::Process {
            command: argv.join(" "),
            source: e,
        })?;
    Ok(status.success())
}
