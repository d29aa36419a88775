//! Crossbuild runner library — build orchestration and its surroundings.
//!
//! - [`orchestrator`] — one-shot and watch build passes
//! - [`compiler`] — the external-compiler seam
//! - [`aggregate`] — the all-succeed result policy
//! - [`clean`], [`testrun`], [`repl`] — the remaining command-surface glue
//! - [`hooks`] — host-build-tool extension points

pub mod aggregate;
pub mod clean;
pub mod compiler;
pub mod error;
pub mod hooks;
pub mod orchestrator;
pub mod process;
pub mod repl;
pub mod testrun;

pub use aggregate::{aggregate, aggregate_flags, ExitStatus};
pub use compiler::{CommandCompiler, Compiler, JobResult};
pub use error::RunnerError;
pub use hooks::{ExtensionPoint, HookRegistry};
pub use orchestrator::{init_tracing, run_once, run_watch, WATCH_INTERVAL};
