//! Orchestrator for a complete build batch
//!
//! Prepares and runs every [`BuildJob`], either one after another or spread
//! across a fixed-size rayon pool. In multi-build mode each worker claims one
//! job at a time and finishes it (setup, then every script in order) before
//! claiming the next; the call returns once the queue is drained.

use log::{error, info};
use rayon::prelude::*;

use super::run::{self, ScriptRunner};
use super::{setup, BuildJob, BuildReport, JobOutcome};
use crate::config::BuildConfig;
use crate::defaults::CHANNEL_BUILD_ENV;
use crate::error::{Error, Result};

/// How jobs are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Jobs run strictly in discovery order on the calling thread.
    Sequential,
    /// Jobs are distributed over at most `max_workers` concurrent workers.
    MultiBuild { max_workers: usize },
}

impl RunMode {
    /// Multi-build mode bounded by the configured worker count.
    pub fn multi_build(config: &BuildConfig) -> Self {
        RunMode::MultiBuild {
            max_workers: config.max_workers,
        }
    }

    /// Environment handed to every script spawned in this mode.
    fn script_env(&self) -> Vec<(String, String)> {
        match self {
            RunMode::Sequential => Vec::new(),
            RunMode::MultiBuild { .. } => {
                vec![(CHANNEL_BUILD_ENV.to_string(), "true".to_string())]
            }
        }
    }
}

/// Build every job and report per-job outcomes in job order.
pub fn execute_build(
    jobs: &[BuildJob],
    config: &BuildConfig,
    runner: &dyn ScriptRunner,
    mode: RunMode,
) -> Result<BuildReport> {
    execute_build_with_progress(jobs, config, runner, mode, &|_: &JobOutcome| {})
}

/// Like [`execute_build`], calling `on_job_done` as each job finishes.
///
/// Script failures and setup I/O failures are recorded in the report.
/// Discovery-class errors found while preparing a job (such as a wildcard
/// rule in a category's ignore file) abort the batch.
pub fn execute_build_with_progress(
    jobs: &[BuildJob],
    config: &BuildConfig,
    runner: &dyn ScriptRunner,
    mode: RunMode,
    on_job_done: &(dyn Fn(&JobOutcome) + Sync),
) -> Result<BuildReport> {
    let env = mode.script_env();
    let build = |job: &BuildJob| -> Result<JobOutcome> {
        let outcome = build_job(job, config, runner, &env)?;
        on_job_done(&outcome);
        Ok(outcome)
    };

    let outcomes = match mode {
        RunMode::Sequential => jobs.iter().map(build).collect::<Result<Vec<_>>>()?,
        RunMode::MultiBuild { max_workers } => {
            info!(
                "Building {} categories with up to {} workers",
                jobs.len(),
                max_workers
            );
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(max_workers.max(1))
                .thread_name(|i| format!("nbcollection-worker-{i}"))
                .build()
                .map_err(|e| Error::WorkerPool {
                    message: e.to_string(),
                })?;

            pool.install(|| {
                jobs.par_iter()
                    .with_max_len(1)
                    .map(build)
                    .collect::<Result<Vec<_>>>()
            })?
        }
    };

    Ok(BuildReport { jobs: outcomes })
}

fn build_job(
    job: &BuildJob,
    config: &BuildConfig,
    runner: &dyn ScriptRunner,
    env: &[(String, String)],
) -> Result<JobOutcome> {
    info!("Preparing Category[{}]", job.label());

    if let Err(e) = setup::execute(job, config) {
        if e.is_discovery_error() {
            return Err(e);
        }
        error!("Unable to prepare {}: {}", job.label(), e);
        let mut outcome = JobOutcome::for_job(job);
        outcome.setup_error = Some(e.to_string());
        return Ok(outcome);
    }

    Ok(run::execute(job, runner, env))
}
