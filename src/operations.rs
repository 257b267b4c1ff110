//! # Operation Registry
//!
//! Named entry points into the library. Each [`Operation`] runs discovery
//! for the configured collections and then one pass over the resulting jobs.
//!
//! The registry is built once with every default operation; callers look
//! operations up by name:
//!
//! | Name          | Pass                                             |
//! |---------------|--------------------------------------------------|
//! | `build`       | setup and run every job sequentially             |
//! | `multi-build` | setup and run jobs across a bounded worker pool  |
//! | `website`     | assemble the static site from built artifacts   |
//! | `ci-config`   | write a CI config with one job per category      |
//! | `list`        | discovery only                                   |

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;

use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::phases::orchestrator::{self, RunMode};
use crate::phases::run::{BashRunner, ScriptRunner};
use crate::phases::site::{self, SiteReport};
use crate::phases::{ci_config, discovery, setup, BuildJob, BuildReport, JobOutcome};

/// Called once for every finished job of a build.
pub type ProgressHook = Arc<dyn Fn(&JobOutcome) + Send + Sync>;

/// What an operation produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    Build(BuildReport),
    Site(SiteReport),
    CiConfig { path: PathBuf, jobs: usize },
    Jobs(Vec<BuildJob>),
}

/// A named pass over the configured collections.
pub trait Operation: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(&self, config: &BuildConfig) -> Result<Outcome>;
}

struct BuildOperation {
    name: &'static str,
    parallel: bool,
    runner: Arc<dyn ScriptRunner>,
    progress: Option<ProgressHook>,
}

impl Operation for BuildOperation {
    fn name(&self) -> &'static str {
        self.name
    }

    fn execute(&self, config: &BuildConfig) -> Result<Outcome> {
        let config = &config.resolve_roots()?;
        config.validate()?;
        let jobs = discovery::find_build_jobs(config)?;
        setup::prepare_artifact_root(config)?;

        let mode = if self.parallel {
            RunMode::multi_build(config)
        } else {
            RunMode::Sequential
        };
        let report = orchestrator::execute_build_with_progress(
            &jobs,
            config,
            self.runner.as_ref(),
            mode,
            &|outcome: &JobOutcome| {
                if let Some(hook) = &self.progress {
                    hook(outcome);
                }
            },
        )?;
        Ok(Outcome::Build(report))
    }
}

struct WebsiteOperation;

impl Operation for WebsiteOperation {
    fn name(&self) -> &'static str {
        "website"
    }

    fn execute(&self, config: &BuildConfig) -> Result<Outcome> {
        let config = &config.resolve_roots()?;
        let jobs = discovery::find_build_jobs(config)?;
        Ok(Outcome::Site(site::execute(&jobs, config)?))
    }
}

struct CiConfigOperation;

impl Operation for CiConfigOperation {
    fn name(&self) -> &'static str {
        "ci-config"
    }

    fn execute(&self, config: &BuildConfig) -> Result<Outcome> {
        let jobs = discovery::find_build_jobs(config)?;
        let path = ci_config::execute(&jobs, config)?;
        Ok(Outcome::CiConfig {
            path,
            jobs: jobs.len(),
        })
    }
}

struct ListOperation;

impl Operation for ListOperation {
    fn name(&self) -> &'static str {
        "list"
    }

    fn execute(&self, config: &BuildConfig) -> Result<Outcome> {
        Ok(Outcome::Jobs(discovery::find_build_jobs(config)?))
    }
}

/// Operations by name.
pub struct OperationRegistry {
    operations: BTreeMap<&'static str, Box<dyn Operation>>,
}

impl OperationRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            operations: BTreeMap::new(),
        }
    }

    /// Every default operation, running scripts with `bash`.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(BashRunner), None)
    }

    /// Every default operation, running scripts with `runner` and reporting
    /// finished build jobs to `progress`.
    pub fn new(runner: Arc<dyn ScriptRunner>, progress: Option<ProgressHook>) -> Self {
        let mut registry = Self::empty();
        for (name, parallel) in [("build", false), ("multi-build", true)] {
            registry.register(Box::new(BuildOperation {
                name,
                parallel,
                runner: Arc::clone(&runner),
                progress: progress.clone(),
            }));
        }
        registry.register(Box::new(WebsiteOperation));
        registry.register(Box::new(CiConfigOperation));
        registry.register(Box::new(ListOperation));
        registry
    }

    /// Add `operation`, replacing any operation of the same name.
    pub fn register(&mut self, operation: Box<dyn Operation>) {
        debug!("Registering operation '{}'", operation.name());
        self.operations.insert(operation.name(), operation);
    }

    pub fn get(&self, name: &str) -> Result<&dyn Operation> {
        self.operations
            .get(name)
            .map(|op| op.as_ref())
            .ok_or_else(|| Error::UnknownOperation {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operations.keys().copied()
    }

    /// Look up `name` and run it against `config`.
    pub fn execute(&self, name: &str, config: &BuildConfig) -> Result<Outcome> {
        self.get(name)?.execute(config)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
