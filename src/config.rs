//! # Build Configuration
//!
//! This module defines [`BuildConfig`], the single value every phase reads its
//! settings from. It replaces process-wide globals: the build and artifact
//! roots, the worker bound and the site location are all passed explicitly
//! into the orchestrator.
//!
//! ## Sources
//!
//! Settings are layered, later layers winning:
//!
//! 1.  Built-in defaults from [`crate::defaults`].
//! 2.  An optional `.nbcollection.yaml` file, parsed with `serde_yaml`.
//! 3.  Command-line flags and their `NBCOLLECTION_*` environment variables,
//!     applied by the CLI on top of the loaded value.
//!
//! ## Example
//!
//! ```yaml
//! collections: [jdat_notebooks]
//! max_workers: 4
//! python: python3.11
//! build_root: /tmp/nb-build
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// Settings shared by discovery, build, site assembly and CI generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Collection root directories to discover categories in.
    pub collections: Vec<PathBuf>,
    /// Restricts builds to these category names. Empty means all.
    pub categories: Vec<String>,
    /// Parent of every per-category build directory.
    pub build_root: PathBuf,
    /// Parent of every per-category artifact directory.
    pub artifact_root: PathBuf,
    /// Output directory of the assembled website.
    pub site_root: PathBuf,
    /// Worker bound for multi-build mode.
    pub max_workers: usize,
    /// Interpreter used to create each category's isolated environment.
    pub python: String,
    /// Notebook execution timeout passed to the converter, in seconds.
    pub execution_timeout: u64,
    /// Metadata extraction helper copied into each build directory.
    pub metadata_helper: PathBuf,
    /// Custom index template. The built-in template is used when unset.
    pub index_template: Option<PathBuf>,
    /// Destination of the generated CI pipeline document.
    pub ci_output: PathBuf,
    /// Docker image for generated CI jobs.
    pub ci_image: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            collections: Vec::new(),
            categories: Vec::new(),
            build_root: defaults::default_build_root(),
            artifact_root: defaults::default_artifact_root(),
            site_root: defaults::default_site_root(),
            max_workers: defaults::DEFAULT_MAX_WORKERS,
            python: defaults::DEFAULT_PYTHON.to_string(),
            execution_timeout: defaults::DEFAULT_EXECUTION_TIMEOUT,
            metadata_helper: PathBuf::from(defaults::DEFAULT_METADATA_HELPER),
            index_template: None,
            ci_output: PathBuf::from(defaults::DEFAULT_CI_OUTPUT),
            ci_image: defaults::DEFAULT_CI_IMAGE.to_string(),
        }
    }
}

impl BuildConfig {
    /// Check the invariants the orchestrator relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::Config {
                message: "max_workers must be at least 1".to_string(),
                hint: Some(format!(
                    "the default bound is {}",
                    defaults::DEFAULT_MAX_WORKERS
                )),
            });
        }
        if self.build_root == self.artifact_root {
            return Err(Error::Config {
                message: format!(
                    "build_root and artifact_root must differ (both are {})",
                    self.build_root.display()
                ),
                hint: None,
            });
        }
        if self.python.trim().is_empty() {
            return Err(Error::Config {
                message: "python interpreter must not be empty".to_string(),
                hint: None,
            });
        }
        Ok(())
    }

    /// A copy with the build, artifact and site roots made absolute against
    /// the current directory.
    ///
    /// Generated scripts `cd` into a build directory before using any of these
    /// paths, so a relative root would resolve against the wrong directory.
    pub fn resolve_roots(&self) -> Result<BuildConfig> {
        let cwd = env::current_dir().map_err(|e| Error::Filesystem {
            message: format!("Cannot determine the current directory: {e}"),
        })?;
        Ok(self.resolve_roots_in(&cwd))
    }

    /// [`BuildConfig::resolve_roots`] against an explicit `base` directory.
    pub fn resolve_roots_in(&self, base: &Path) -> BuildConfig {
        BuildConfig {
            build_root: absolute_in(base, &self.build_root),
            artifact_root: absolute_in(base, &self.artifact_root),
            site_root: absolute_in(base, &self.site_root),
            ..self.clone()
        }
    }

    /// Whether a category passes the configured category filter.
    pub fn includes_category(&self, name: &str) -> bool {
        self.categories.is_empty() || self.categories.iter().any(|c| c == name)
    }
}

fn absolute_in(base: &Path, path: &Path) -> PathBuf {
    // `join` keeps absolute paths; collecting components drops `.` segments.
    base.join(path).components().collect()
}

/// Parse a YAML configuration document.
pub fn parse(yaml_content: &str) -> Result<BuildConfig> {
    if yaml_content.trim().is_empty() {
        return Ok(BuildConfig::default());
    }
    let config: BuildConfig = serde_yaml::from_str(yaml_content).map_err(|e| Error::Config {
        message: e.to_string(),
        hint: Some("see the keys of BuildConfig, unknown keys are rejected".to_string()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Read and parse a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Load the configuration file if it exists, otherwise use defaults.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let path = path.as_ref();
    if path.is_file() {
        log::debug!("Loading configuration from {}", path.display());
        from_file(path)
    } else {
        Ok(BuildConfig::default())
    }
}
