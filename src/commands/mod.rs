//! # CLI Command Implementations
//!
//! One module per `nbcollection` subcommand. Each defines an `Args` struct
//! derived with `clap` and an `execute` function that applies the arguments
//! on top of the loaded [`nbcollection::config::BuildConfig`] and runs the
//! matching library operation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use nbcollection::config::BuildConfig;

pub mod build;
pub mod ci_config;
pub mod completions;
pub mod ls;
pub mod site;

/// Collection selection shared by every command that runs discovery.
#[derive(Args, Debug, Default)]
pub struct CollectionArgs {
    /// Collection root directory; repeat the flag or separate with commas
    #[arg(short = 'c', long = "collection", value_name = "PATH", value_delimiter = ',')]
    pub collections: Vec<PathBuf>,

    /// Only include these categories; repeat the flag or separate with commas
    #[arg(long = "category", value_name = "NAME", value_delimiter = ',')]
    pub categories: Vec<String>,
}

impl CollectionArgs {
    /// Override the configured collections and categories when given.
    pub fn apply(self, config: &mut BuildConfig) -> Result<()> {
        if !self.collections.is_empty() {
            config.collections = self.collections;
        }
        if !self.categories.is_empty() {
            config.categories = self.categories;
        }
        if config.collections.is_empty() {
            anyhow::bail!("No collections given; pass --collection <PATH> or set `collections` in the config file");
        }
        Ok(())
    }
}
