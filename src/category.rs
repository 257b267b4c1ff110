//! # Category Lifecycle
//!
//! A category is one directory of notebooks sharing a `requirements.txt` and a
//! single isolated build environment. The category owns two directories
//! outside the source tree:
//!
//! - **`build_dir`**: a working copy of the source directory plus the
//!   generated setup and per-notebook build scripts.
//! - **`artifact_dir`**: rendered HTML and extracted metadata.
//!
//! Both are wiped and recreated by [`Category::setup_build_env`] so that a
//! rebuild never sees files left over from an earlier pass.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::BuildConfig;
use crate::defaults::IGNORE_FILENAME;
use crate::error::{Error, Result};
use crate::ignore::IgnoreRuleSet;
use crate::notebook::{Notebook, ENV_READY_MARKER, METADATA_HELPER_NAME, SETUP_SCRIPT_NAME};
use crate::shell::{quote, quote_path};

/// A directory of notebooks that build together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    /// Notebooks sorted by filename.
    pub notebooks: Vec<Notebook>,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub artifact_dir: PathBuf,
}

impl Category {
    /// Create a category whose build and artifact directories derive from
    /// its name.
    pub fn new(
        name: impl Into<String>,
        notebooks: Vec<Notebook>,
        source_dir: PathBuf,
        build_root: &Path,
        artifact_root: &Path,
    ) -> Self {
        let name = name.into();
        Self {
            build_dir: build_root.join(&name),
            artifact_dir: artifact_root.join(&name),
            name,
            notebooks,
            source_dir,
        }
    }

    /// Render the environment setup script for this category.
    pub fn render_setup_script(&self, python: &str) -> String {
        format!(
            r#"#!/usr/bin/env bash
set -e
cd {build_dir}
virtualenv -p {python} env
source env/bin/activate
pip install -U pip setuptools
if [ -f "pre-install.sh" ]; then
    bash pre-install.sh
fi
if [ -f "pre-requirements.txt" ]; then
    pip install -U -r pre-requirements.txt
fi
pip install -U -r requirements.txt
if [ -f "environment.sh" ]; then
    source environment.sh
fi
pip install jupyter
mkdir -p {artifact_dir}
touch {marker}
"#,
            build_dir = quote_path(&self.build_dir),
            python = quote(python),
            artifact_dir = quote_path(&self.artifact_dir),
            marker = ENV_READY_MARKER,
        )
    }

    /// Recreate the build and artifact directories and write the setup script.
    ///
    /// Also copies the metadata helper into the build directory. A missing
    /// helper is only a warning: the notebook scripts will then fail on their
    /// own and be reported as build failures.
    pub fn setup_build_env(&self, config: &BuildConfig) -> Result<()> {
        recreate_dir(&self.build_dir)?;
        recreate_dir(&self.artifact_dir)?;

        let setup_script = self.build_dir.join(SETUP_SCRIPT_NAME);
        crate::notebook::write_executable(&setup_script, &self.render_setup_script(&config.python))?;

        if config.metadata_helper.is_file() {
            fs::copy(
                &config.metadata_helper,
                self.build_dir.join(METADATA_HELPER_NAME),
            )?;
        } else {
            warn!(
                "Metadata helper {} not found, category {} will not extract metadata",
                config.metadata_helper.display(),
                self.name
            );
        }

        Ok(())
    }

    /// Copy the source directory into the build directory.
    ///
    /// Top-level entries excluded by the category's `.gitignore` (and the
    /// implicit virtual environment names) are skipped. Directories are copied
    /// recursively.
    pub fn inject_extra_files(&self) -> Result<()> {
        let rules = IgnoreRuleSet::load(&self.source_dir.join(IGNORE_FILENAME))?;

        let mut entries: Vec<_> = fs::read_dir(&self.source_dir)?
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let source = entry.path();
            if rules.is_excluded(&name, &source)? {
                debug!("Skipping ignored entry {}", source.display());
                continue;
            }

            let target = self.build_dir.join(&name);
            if source.is_dir() {
                copy_dir_recursive(&source, &target)?;
            } else {
                fs::copy(&source, &target)?;
            }
        }

        Ok(())
    }
}

/// Delete `path` if present, then create it empty.
pub fn recreate_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| Error::Filesystem {
            message: format!("Failed to remove directory '{}': {}", path.display(), e),
        })?;
    }
    fs::create_dir_all(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", path.display(), e),
    })?;
    Ok(())
}

fn copy_dir_recursive(source: &Path, target: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to walk '{}': {}", source.display(), e),
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::Filesystem {
                message: format!("Unexpected path '{}': {}", entry.path().display(), e),
            })?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}
