//! The phases of a notebook collection build.
//!
//! ## Overview
//!
//! 1. Discovery - Walk collection roots and group notebooks into categories
//! 2. Setup - Recreate each category's build/artifact directories and write scripts
//! 3. Run - Execute each category's notebook scripts in order
//! 4. Site - Collect rendered artifacts into a static site with an index page
//! 5. CI config - Emit one CI job per discovered category
//!
//! The [`orchestrator`] ties setup and run together, sequentially or across a
//! bounded worker pool. Site assembly and CI generation are separate passes
//! that only re-run discovery, which never modifies the filesystem.

use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::error::BuildError;

// Phase modules
pub mod ci_config;
pub mod discovery;
pub mod orchestrator;
pub mod run;
pub mod setup;
pub mod site;

/// A named root directory and the categories discovered under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    /// The root path as supplied by the caller.
    pub root: PathBuf,
    pub categories: Vec<Category>,
}

/// One category's notebooks plus the build scripts that render them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
    /// Name of the owning collection.
    pub collection: String,
    /// Root path of the owning collection.
    pub collection_root: PathBuf,
    pub category: Category,
    /// One script per notebook, in notebook order.
    pub scripts: Vec<PathBuf>,
}

impl BuildJob {
    pub fn new(collection: &Collection, category: Category) -> Self {
        let scripts = category
            .notebooks
            .iter()
            .map(|nb| nb.build_script_path(&category.build_dir))
            .collect();

        Self {
            collection: collection.name.clone(),
            collection_root: collection.root.clone(),
            category,
            scripts,
        }
    }

    /// `collection/category`, used in log lines and reports.
    pub fn label(&self) -> String {
        format!("{}/{}", self.collection, self.category.name)
    }
}

/// Result of building one job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutcome {
    pub collection: String,
    pub category: String,
    /// Scripts that exited successfully.
    pub succeeded: Vec<PathBuf>,
    /// Scripts that exited non-zero.
    pub failures: Vec<BuildError>,
    /// Set when the job could not be prepared, in which case no script ran.
    pub setup_error: Option<String>,
}

impl JobOutcome {
    pub fn for_job(job: &BuildJob) -> Self {
        Self {
            collection: job.collection.clone(),
            category: job.category.name.clone(),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.setup_error.is_none()
    }
}

/// Outcome of a whole build batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub jobs: Vec<JobOutcome>,
}

impl BuildReport {
    pub fn succeeded_scripts(&self) -> usize {
        self.jobs.iter().map(|j| j.succeeded.len()).sum()
    }

    pub fn failed_scripts(&self) -> impl Iterator<Item = &BuildError> {
        self.jobs.iter().flat_map(|j| j.failures.iter())
    }

    pub fn failed_jobs(&self) -> impl Iterator<Item = &JobOutcome> {
        self.jobs.iter().filter(|j| !j.is_success())
    }

    pub fn has_failures(&self) -> bool {
        self.jobs.iter().any(|j| !j.is_success())
    }

    /// Whether `script` is recorded as a failure anywhere in the report.
    pub fn failed(&self, script: &Path) -> bool {
        self.failed_scripts().any(|f| f.script == script)
    }
}
