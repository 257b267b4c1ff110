//! # nbcollection
//!
//! Builds collections of Jupyter notebooks into HTML pages, one isolated
//! build environment per category, and assembles the results into a static
//! site. The `nbcollection` command-line tool is a thin wrapper around this
//! library.
//!
//! ## Quick Example
//!
//! ```no_run
//! use nbcollection::config::BuildConfig;
//! use nbcollection::operations::{OperationRegistry, Outcome};
//!
//! let config = BuildConfig {
//!     collections: vec!["jdat_notebooks".into()],
//!     ..BuildConfig::default()
//! };
//!
//! let registry = OperationRegistry::with_defaults();
//! if let Outcome::Jobs(jobs) = registry.execute("list", &config).unwrap() {
//!     for job in jobs {
//!         println!("{} ({} notebooks)", job.label(), job.category.notebooks.len());
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! - **Collection**: a root directory holding notebooks.
//! - **Category**: a directory that directly contains notebooks and a
//!   `requirements.txt`. It gets its own build and artifact directories and
//!   its own Python environment.
//! - **Build job**: a category plus one generated shell script per notebook.
//!   Scripts of a job run in notebook order; jobs are independent.
//!
//! ## Execution Flow
//!
//! 1.  **Discovery** (`phases::discovery`): walk each collection root,
//!     honoring its `.gitignore`, and group notebooks into categories.
//! 2.  **Setup** (`phases::setup`): recreate the category's directories, copy
//!     its files in and write the build scripts.
//! 3.  **Run** (`phases::run`): execute each script with `bash`.
//! 4.  **Site** (`phases::site`): copy rendered pages and write an index.
//! 5.  **CI config** (`phases::ci_config`): one CI job per category.
//!
//! The `operations` registry exposes these passes by name.

pub mod category;
pub mod config;
pub mod defaults;
pub mod error;
pub mod ignore;
pub mod notebook;
pub mod operations;
pub mod output;
pub mod phases;
pub mod shell;
pub mod template;
