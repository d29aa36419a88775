//! The external-compiler seam.
//!
//! The cross-compiler is an external collaborator; the orchestrator only
//! depends on the [`Compiler`] trait. [`CommandCompiler`] is the stock
//! implementation: one process invocation per job, with the job described
//! as a JSON payload in the final argument.

use std::path::Path;
use std::process::Command;

use serde::Serialize;
use serde_json::json;

use crossbuild_core::BuildJob;

use crate::error::RunnerError;

/// Outcome of one job's compile invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    pub job_index: usize,
    pub success: bool,
    pub detail: String,
}

/// One compile invocation per build job.
///
/// Implementations must be callable concurrently from multiple worker
/// threads; jobs share no mutable compiler state.
pub trait Compiler: Send + Sync {
    fn compile(&self, job: &BuildJob, crossover_path: &Path) -> Result<JobResult, RunnerError>;
}

/// Stock compiler: spawns the configured `compiler-command` argv, appending
/// a JSON job payload (source path, crossover path, opaque compiler map).
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    command: Vec<String>,
}

impl CommandCompiler {
    pub fn new(command: &[String]) -> Self {
        Self {
            command: command.to_vec(),
        }
    }
}

impl Compiler for CommandCompiler {
    fn compile(&self, job: &BuildJob, crossover_path: &Path) -> Result<JobResult, RunnerError> {
        let payload = serde_json::to_string(&json!({
            "source-path": &job.source_path,
            "crossover-path": crossover_path,
            "compiler": &job.compiler,
        }))?;

        let Some((program, args)) = self.command.split_first() else {
            return Err(RunnerError::Process {
                command: "<empty>".to_owned(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "empty compiler-command",
                ),
            });
        };

        let status = Command::new(program)
            .args(args)
            .arg(&payload)
            .status()
            .map_err(|e| RunnerError::Process {
                command: self.command.join(" "),
                source: e,
            })?;

        Ok(JobResult {
            job_index: job.index,
            success: status.success(),
            detail: match status.code() {
                Some(code) => format!("compiler exited with status {code}"),
                None => "compiler terminated by signal".to_owned(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_yaml::Mapping;

    use super::*;

    fn job() -> BuildJob {
        let mut compiler = Mapping::new();
        compiler.insert("output-dir".into(), "target/out-0".into());
        BuildJob {
            index: 0,
            source_path: PathBuf::from("src-cljs"),
            compiler,
            jar: false,
        }
    }

    #[test]
    #[cfg(unix)]
    fn zero_exit_is_success() {
        let compiler = CommandCompiler::new(&["true".to_owned()]);
        let result = compiler.compile(&job(), Path::new("crossovers")).unwrap();
        assert!(result.success);
        assert_eq!(result.job_index, 0);
    }

    #[test]
    #[cfg(unix)]
    fn nonzero_exit_is_a_recorded_failure_not_an_error() {
        let compiler = CommandCompiler::new(&["false".to_owned()]);
        let result = compiler.compile(&job(), Path::new("crossovers")).unwrap();
        assert!(!result.success);
        assert!(result.detail.contains("status 1"));
    }

    #[test]
    fn unspawnable_compiler_is_a_process_error() {
        let compiler = CommandCompiler::new(&["crossbuild-no-such-compiler".to_owned()]);
        let err = compiler.compile(&job(), Path::new("crossovers")).unwrap_err();
        assert!(matches!(err, RunnerError::Process { .. }));
    }

    #[test]
    fn empty_command_is_a_process_error() {
        let compiler = CommandCompiler::new(&[]);
        let err = compiler.compile(&job(), Path::new("crossovers")).unwrap_err();
        assert!(matches!(err, RunnerError::Process { .. }));
    }
}
