//! Build orchestration — one-shot and watch modes.
//!
//! A pass is always: synchronizer to completion first, then every job's
//! compile dispatched concurrently (one blocking worker per job), then a
//! join. No job observes a partially-written crossover mirror and no job
//! observes another job's state; output directories are job-exclusive by
//! the normalizer's uniqueness invariant.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbuild_core::GlobalOptions;
use crossbuild_sync::{mirror, SyncReport};

use crate::aggregate::{aggregate, ExitStatus};
use crate::compiler::{Compiler, JobResult};
use crate::error::{io_err, RunnerError};

/// Fixed cadence of the watch loop.
pub const WATCH_INTERVAL: Duration = Duration::from_secs(1);

/// Initialize tracing output for orchestrator runs.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

// ---------------------------------------------------------------------------
// One-shot mode
// ---------------------------------------------------------------------------

/// Run one build pass over all jobs and block until they complete.
pub fn run_once(
    options: &GlobalOptions,
    compiler: Arc<dyn Compiler>,
) -> Result<ExitStatus, RunnerError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run_once_async(options, compiler))
}

/// One-shot pass: pinned copy + sync, then all jobs in parallel, then the
/// aggregate. Blocks until every job worker completes or one raises a
/// fatal process-level error.
pub async fn run_once_async(
    options: &GlobalOptions,
    compiler: Arc<dyn Compiler>,
) -> Result<ExitStatus, RunnerError> {
    copy_pinned_pass(options).await?;
    sync_pass(options).await?;
    let results = dispatch_jobs(options, &compiler).await?;
    report_results(&results);
    Ok(aggregate(&results))
}

// ---------------------------------------------------------------------------
// Watch mode
// ---------------------------------------------------------------------------

/// Run the watch loop until the process is told to stop.
pub fn run_watch(
    options: &GlobalOptions,
    compiler: Arc<dyn Compiler>,
    interval: Duration,
) -> Result<(), RunnerError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run_watch_async(options, compiler, interval))
}

/// Watch mode: an initial full pass, then {sync; dispatch all jobs} on the
/// fixed cadence. A failed job is logged and does not halt its siblings or
/// the loop; termination is cooperative at iteration boundaries.
pub async fn run_watch_async(
    options: &GlobalOptions,
    compiler: Arc<dyn Compiler>,
    interval: Duration,
) -> Result<(), RunnerError> {
    copy_pinned_pass(options).await?;
    if let Err(err) = iteration(options, &compiler).await {
        tracing::error!(error = %err, "initial watch pass failed");
    }

    // A single pinned listener for the whole loop: a ctrl-c delivered while
    // an iteration is running must still be observed at the next boundary,
    // so the future has to outlive individual select turns.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                match signal {
                    Ok(()) => {
                        tracing::info!("received ctrl-c, leaving watch mode");
                        return Ok(());
                    }
                    Err(err) => return Err(io_err("ctrl-c handler", err)),
                }
            }
            _ = tokio::time::sleep(interval) => {
                if let Err(err) = iteration(options, &compiler).await {
                    tracing::error!(error = %err, "watch iteration failed");
                }
            }
        }
    }
}

async fn iteration(
    options: &GlobalOptions,
    compiler: &Arc<dyn Compiler>,
) -> Result<(), RunnerError> {
    let report = sync_pass(options).await?;
    let results = dispatch_jobs(options, compiler).await?;
    report_results(&results);
    if report.written > 0 {
        tracing::info!(
            written = report.written,
            "watch iteration picked up source changes"
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pass phases
// ---------------------------------------------------------------------------

/// Copy explicitly enumerated (archive-origin) files, once per invocation.
async fn copy_pinned_pass(options: &GlobalOptions) -> Result<(), RunnerError> {
    if options.pinned_files.is_empty() {
        return Ok(());
    }
    let dest = options.crossover_path.clone();
    let files = options.pinned_files.clone();
    let report = tokio::task::spawn_blocking(move || mirror::copy_pinned(&dest, &files))
        .await
        .map_err(|e| RunnerError::Join(e.to_string()))??;
    tracing::info!(copied = report.copied_once, "pinned files copied");
    Ok(())
}

/// One complete synchronizer pass, run to completion before any compile.
async fn sync_pass(options: &GlobalOptions) -> Result<SyncReport, RunnerError> {
    let dest = options.crossover_path.clone();
    let namespaces = options.crossovers.clone();
    let roots = options.search_paths.clone();
    let report = tokio::task::spawn_blocking(move || mirror::sync(&dest, &namespaces, &roots))
        .await
        .map_err(|e| RunnerError::Join(e.to_string()))??;

    for issue in &report.issues {
        tracing::warn!("sync skipped {}: {}", issue.path.display(), issue.detail);
    }
    tracing::debug!(
        written = report.written,
        unchanged = report.unchanged,
        skipped_macro = report.skipped_macro,
        "crossover sync pass complete"
    );
    Ok(report)
}

/// Dispatch every job's compile concurrently and join them all.
///
/// A job whose compiler process cannot be started surfaces as a fatal
/// [`RunnerError`]; a compiler that runs and reports failure is a normal
/// per-job result.
async fn dispatch_jobs(
    options: &GlobalOptions,
    compiler: &Arc<dyn Compiler>,
) -> Result<Vec<JobResult>, RunnerError> {
    let mut handles = Vec::with_capacity(options.builds.len());
    for job in &options.builds {
        let job = job.clone();
        let compiler = Arc::clone(compiler);
        let crossover: PathBuf = options.crossover_path.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            compiler.compile(&job, &crossover)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle
            .await
            .map_err(|e| RunnerError::Join(e.to_string()))??;
        results.push(result);
    }
    Ok(results)
}

fn report_results(results: &[JobResult]) {
    for result in results {
        if result.success {
            tracing::info!(job = result.job_index, "build succeeded");
        } else {
            tracing::error!(job = result.job_index, detail = %result.detail, "build failed");
        }
    }
}
