//! Job result aggregation — the all-succeed policy.

use std::process::ExitCode;

use crate::compiler::JobResult;

/// Combined status of a multi-job operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn success(self) -> bool {
        matches!(self, ExitStatus::Success)
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::SUCCESS,
            ExitStatus::Failure => ExitCode::FAILURE,
        }
    }
}

/// Success iff every job result succeeded. No result is ever silently
/// dropped: callers report individual results before aggregating.
pub fn aggregate(results: &[JobResult]) -> ExitStatus {
    aggregate_flags(results.iter().map(|r| r.success))
}

/// The same all-succeed policy over bare success flags; used for cleanup
/// and test-run outcomes.
pub fn aggregate_flags(flags: impl IntoIterator<Item = bool>) -> ExitStatus {
    if flags.into_iter().all(|ok| ok) {
        ExitStatus::Success
    } else {
        ExitStatus::Failure
    }
}
