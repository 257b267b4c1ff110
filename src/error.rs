//! # Error Handling
//!
//! This module defines the centralized error type for the `nbcollection`
//! library. It uses the `thiserror` library to build a single `Error` enum
//! covering every anticipated failure mode, each with a descriptive message.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum for all library failures. Variants fall into
//!   three groups:
//!   - *Discovery errors* (`MissingRequirements`, `UnsupportedIgnoreRule`,
//!     `DuplicateCategory`): malformed input structure. These are fatal and
//!     abort discovery immediately.
//!   - *Build errors* (`Build`): a generated script exited non-zero. The
//!     orchestrator records these per script and keeps going.
//!   - *Infrastructure errors* (`Io`, `Filesystem`, `Json`, `Yaml`, `Glob`,
//!     `Regex`, `Template`, `Config`, `UnknownOperation`, `WorkerPool`).
//!
//! - **`BuildError`**: The payload of a failed build step. It carries the
//!   script that failed and its exit code, and is also stored in
//!   [`crate::phases::JobOutcome`] so failures can be reported after a batch.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use std::path::PathBuf;

use thiserror::Error;

/// A non-zero exit from a spawned build step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} {}", script.display(), describe_exit(*code))]
pub struct BuildError {
    /// The script that was executed.
    pub script: PathBuf,
    /// Process exit code, `None` when the process reported none (killed by a
    /// signal, or never started).
    pub code: Option<i32>,
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "did not report an exit code".to_string(),
    }
}

/// Main error type for nbcollection operations
#[derive(Error, Debug)]
pub enum Error {
    /// A directory holds notebooks but no dependency manifest.
    #[error("Category missing requirements file: {}", path.display())]
    MissingRequirements { path: PathBuf },

    /// An ignore file contains a pattern rule, which is not supported.
    #[error("Unsupported ignore rule '{rule}' in {}: wildcard patterns are not supported", path.display())]
    UnsupportedIgnoreRule { rule: String, path: PathBuf },

    /// Two categories would share the same build and artifact directories.
    #[error("Duplicate category '{name}': {} and {}", first.display(), second.display())]
    DuplicateCategory {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A build step exited with a non-zero status.
    #[error("Build step failed: {0}")]
    Build(#[from] BuildError),

    /// An error occurred while preparing build or site directories.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// The configuration file or command-line overrides are invalid.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An error occurred while rendering the site index template.
    ///
    /// May include the name of the problematic variable when applicable.
    #[error("Template processing error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The template variable that caused the error, if applicable
        variable: Option<String>,
    },

    /// No handler is registered under the requested operation name.
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// The worker pool for multi-build mode could not be created.
    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Whether this error describes malformed input found during discovery.
    pub fn is_discovery_error(&self) -> bool {
        matches!(
            self,
            Error::MissingRequirements { .. }
                | Error::UnsupportedIgnoreRule { .. }
                | Error::DuplicateCategory { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
