//! Shared test utilities for the CLI E2E tests.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_category("nbs", "spectra", &["a.ipynb"]);
//! fixture.command().arg("ls").arg("-c").arg(fixture.collection("nbs")).assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::TestFixture;
}

/// A temporary directory holding notebook collections.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a category with the given notebooks and an empty
    /// `requirements.txt`. `category` may contain slashes to nest it.
    pub fn with_category(self, collection: &str, category: &str, notebooks: &[&str]) -> Self {
        let dir = self.temp_dir.child(collection).child(category);
        for notebook in notebooks {
            dir.child(notebook)
                .write_str(r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#)
                .expect("Failed to write notebook");
        }
        dir.child("requirements.txt")
            .write_str("")
            .expect("Failed to write requirements");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a `.nbcollection.yaml` in the fixture root.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.with_file(".nbcollection.yaml", content)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a collection root.
    pub fn collection(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A command running in this fixture's directory with logging reduced to
    /// warnings and colors off.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nbcollection");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("NBCOLLECTION_CONFIG")
            .arg("--color")
            .arg("never")
            .arg("--log-level")
            .arg("warn");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
