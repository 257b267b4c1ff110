//! Phase 3: Run
//!
//! Executes a prepared job's build scripts strictly in notebook order. Later
//! notebooks may rely on files earlier ones left in the shared build
//! directory, so scripts of one job never run concurrently.
//!
//! A failing script does not stop the job: the failure is logged, recorded
//! in the [`JobOutcome`] and the next script runs.

use std::path::Path;
use std::process::Command;

use log::{error, info};

use super::{BuildJob, JobOutcome};
use crate::error::{BuildError, Error, Result};

/// Extra environment passed to every spawned script.
pub type ScriptEnv = [(String, String)];

/// Executes one generated build script.
///
/// Non-zero exits must be reported as [`Error::Build`]. The orchestrator only
/// depends on this trait, so tests can substitute a recording runner.
pub trait ScriptRunner: Send + Sync {
    fn run(&self, script: &Path, env: &ScriptEnv) -> Result<()>;
}

/// Runs scripts with `bash <script>` and waits for them to exit.
#[derive(Debug, Clone, Default)]
pub struct BashRunner;

impl ScriptRunner for BashRunner {
    fn run(&self, script: &Path, env: &ScriptEnv) -> Result<()> {
        let status = Command::new("bash")
            .arg(script)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Build(BuildError {
                script: script.to_path_buf(),
                code: status.code(),
            }))
        }
    }
}

/// Run every script of `job` in order, collecting failures.
pub fn execute(job: &BuildJob, runner: &dyn ScriptRunner, env: &ScriptEnv) -> JobOutcome {
    let mut outcome = JobOutcome::for_job(job);

    for script in &job.scripts {
        info!("Building Category[{}] {}", job.label(), script.display());
        match runner.run(script, env) {
            Ok(()) => outcome.succeeded.push(script.clone()),
            Err(Error::Build(failure)) => {
                error!("Unable to build {}: {}", script.display(), failure);
                outcome.failures.push(failure);
            }
            Err(e) => {
                error!("Unable to build {}: {}", script.display(), e);
                outcome.failures.push(BuildError {
                    script: script.clone(),
                    code: None,
                });
            }
        }
    }

    outcome
}
