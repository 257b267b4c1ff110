//! Default values for nbcollection configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Name of the optional configuration file looked up in the current directory.
pub const DEFAULT_CONFIG_FILENAME: &str = ".nbcollection.yaml";

/// Dependency manifest every category directory must contain.
pub const REQUIREMENTS_FILENAME: &str = "requirements.txt";

/// Ignore file consulted for collection roots and category sources.
pub const IGNORE_FILENAME: &str = ".gitignore";

/// Extension of the notebook files discovered inside a category.
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Upper bound on concurrently building categories in multi-build mode.
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Seconds a single notebook may execute before the converter aborts it.
pub const DEFAULT_EXECUTION_TIMEOUT: u64 = 600;

/// Interpreter handed to `virtualenv -p`.
pub const DEFAULT_PYTHON: &str = "python3";

/// Metadata helper copied into every build directory.
pub const DEFAULT_METADATA_HELPER: &str = ".circleci/extract_metadata_from_notebook.py";

/// Where `ci-config` writes the pipeline document.
pub const DEFAULT_CI_OUTPUT: &str = ".circleci/config.yml";

/// Docker image used by generated CI jobs.
pub const DEFAULT_CI_IMAGE: &str = "cimg/python:3.11";

/// Environment variable set for scripts spawned by multi-build workers.
pub const CHANNEL_BUILD_ENV: &str = "NBCOLLECTION_CHANNEL_BUILD";

/// Returns the default root for per-category build directories.
pub fn default_build_root() -> PathBuf {
    std::env::temp_dir().join("nbcollection-ci-build-base-dir")
}

/// Returns the default root for rendered notebook artifacts.
pub fn default_artifact_root() -> PathBuf {
    std::env::temp_dir().join("artifacts")
}

/// Returns the default output directory for the assembled website.
pub fn default_site_root() -> PathBuf {
    PathBuf::from("site")
}
