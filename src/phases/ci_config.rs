//! Phase 5: CI config
//!
//! Emits a CircleCI 2.1 configuration with one job per discovered category.
//! Each job checks the repository out and runs `nbcollection build` for its
//! own category, so categories build in parallel on separate CI machines.

use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use super::BuildJob;
use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::shell::{quote, quote_path};

/// Name of the single executor every job runs on.
pub const EXECUTOR_NAME: &str = "notebook-builder";

/// Name of the workflow listing every job.
pub const WORKFLOW_NAME: &str = "build-notebooks";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CiConfig {
    pub version: String,
    pub executors: BTreeMap<String, Executor>,
    pub jobs: BTreeMap<String, CiJob>,
    pub workflows: Workflows,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Executor {
    pub docker: Vec<DockerImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DockerImage {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CiJob {
    pub executor: String,
    pub steps: Vec<Step>,
}

/// A job step, either a bare built-in step name or a `run` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Step {
    Builtin(String),
    Run { run: RunStep },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStep {
    pub name: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workflows {
    pub version: u32,
    #[serde(flatten)]
    pub workflows: BTreeMap<String, Workflow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workflow {
    pub jobs: Vec<String>,
}

/// Build the CI document for `jobs`, with collection paths written relative
/// to the current directory.
pub fn generate(jobs: &[BuildJob], config: &BuildConfig) -> CiConfig {
    let cwd = env::current_dir().unwrap_or_default();
    generate_in(jobs, config, &cwd)
}

/// Build the CI document for `jobs` as run from the checkout at `base`.
///
/// Job names are `<collection>-<category>` reduced to `[A-Za-z0-9_-]`. Names
/// that collide after reduction get a numeric suffix. Collection roots under
/// `base` are written relative to it.
pub fn generate_in(jobs: &[BuildJob], config: &BuildConfig, base: &Path) -> CiConfig {
    let mut ci_jobs = BTreeMap::new();
    let mut order = Vec::with_capacity(jobs.len());
    let mut taken = HashSet::new();

    for job in jobs {
        let stem = job_name(&job.collection, &job.category.name);
        let mut name = stem.clone();
        let mut n = 2;
        while !taken.insert(name.clone()) {
            name = format!("{stem}-{n}");
            n += 1;
        }

        let command = format!(
            "nbcollection build --collection {} --category {}",
            quote_path(&checkout_path(&job.collection_root, base)),
            quote(&job.category.name)
        );
        ci_jobs.insert(
            name.clone(),
            CiJob {
                executor: EXECUTOR_NAME.to_string(),
                steps: vec![
                    Step::Builtin("checkout".to_string()),
                    Step::Run {
                        run: RunStep {
                            name: format!("Build {}", job.label()),
                            command,
                        },
                    },
                ],
            },
        );
        order.push(name);
    }

    let executors = BTreeMap::from([(
        EXECUTOR_NAME.to_string(),
        Executor {
            docker: vec![DockerImage {
                image: config.ci_image.clone(),
            }],
        },
    )]);

    CiConfig {
        version: "2.1".to_string(),
        executors,
        jobs: ci_jobs,
        workflows: Workflows {
            version: 2,
            workflows: BTreeMap::from([(WORKFLOW_NAME.to_string(), Workflow { jobs: order })]),
        },
    }
}

/// Serialize a CI document to YAML.
pub fn render(ci: &CiConfig) -> Result<String> {
    Ok(serde_yaml::to_string(ci)?)
}

/// Generate, render and write the CI config to `config.ci_output`.
pub fn execute(jobs: &[BuildJob], config: &BuildConfig) -> Result<PathBuf> {
    let document = render(&generate(jobs, config))?;
    let output = config.ci_output.clone();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create '{}': {}", parent.display(), e),
        })?;
    }
    fs::write(&output, document)?;
    info!("Wrote CI config for {} job(s) to {}", jobs.len(), output.display());

    Ok(output)
}

/// `root` relative to `base` when it lies under it.
///
/// Relative roots are kept as given. Absolute roots outside `base` are kept
/// too, with a warning: they will not exist on the CI machine.
fn checkout_path(root: &Path, base: &Path) -> PathBuf {
    if root.is_relative() {
        return root.to_path_buf();
    }

    let relative = root.strip_prefix(base).map(Path::to_path_buf).or_else(|_| -> std::io::Result<PathBuf> {
        let root = fs::canonicalize(root)?;
        let base = fs::canonicalize(base)?;
        root.strip_prefix(&base)
            .map(Path::to_path_buf)
            .map_err(std::io::Error::other)
    });

    match relative {
        Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rel) => rel,
        Err(_) => {
            warn!(
                "Collection {} is outside {}, the CI job uses the absolute path",
                root.display(),
                base.display()
            );
            root.to_path_buf()
        }
    }
}

/// `<collection>-<category>` with every other character replaced by `_`.
pub fn job_name(collection: &str, category: &str) -> String {
    format!("{collection}-{category}")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
