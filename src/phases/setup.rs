//! Phase 2: Setup
//!
//! Prepares a job's build directory: recreates the category's build and
//! artifact directories, writes the environment setup script, copies the
//! category's source files in and writes one build script per notebook.

use log::info;

use super::BuildJob;
use crate::category::recreate_dir;
use crate::config::BuildConfig;
use crate::error::Result;

/// Clear and recreate the artifact root.
///
/// Called exactly once by the build entry point before any job starts. Every
/// category's artifact directory is created below this root afterwards and
/// is owned by that category alone.
pub fn prepare_artifact_root(config: &BuildConfig) -> Result<()> {
    info!(
        "Resetting artifact root {}",
        config.artifact_root.display()
    );
    recreate_dir(&config.artifact_root)
}

/// Prepare everything `job.scripts` needs to run.
pub fn execute(job: &BuildJob, config: &BuildConfig) -> Result<()> {
    let category = &job.category;
    category.setup_build_env(config)?;
    category.inject_extra_files()?;

    for notebook in &category.notebooks {
        notebook.create_build_script(
            [job.collection.as_str(), category.name.as_str()],
            &category.build_dir,
            &category.artifact_dir,
            config.execution_timeout,
        )?;
    }

    Ok(())
}
