//! Site command implementation
//!
//! Collects the HTML pages and metadata produced by a previous `build` into
//! the site directory and renders its index page.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use nbcollection::config::BuildConfig;
use nbcollection::operations::{OperationRegistry, Outcome};
use nbcollection::output::{format_site_summary, OutputConfig};

use super::CollectionArgs;

/// Assemble built notebooks into a static site
#[derive(Args, Debug)]
pub struct SiteArgs {
    #[command(flatten)]
    pub collection: CollectionArgs,

    /// Root of the per-category artifact directories written by `build`
    #[arg(long, value_name = "DIR", env = "NBCOLLECTION_ARTIFACT_DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Directory the site is written to
    #[arg(long, value_name = "DIR", env = "NBCOLLECTION_SITE_DIR")]
    pub site_dir: Option<PathBuf>,

    /// Custom index page template
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,
}

/// Execute the site command
pub fn execute(args: SiteArgs, mut config: BuildConfig, output: &OutputConfig) -> Result<()> {
    args.collection.apply(&mut config)?;
    if let Some(artifact_dir) = args.artifact_dir {
        config.artifact_root = artifact_dir;
    }
    if let Some(site_dir) = args.site_dir {
        config.site_root = site_dir;
    }
    if args.template.is_some() {
        config.index_template = args.template;
    }

    match OperationRegistry::with_defaults().execute("website", &config)? {
        Outcome::Site(report) => {
            print!("{}", format_site_summary(output, &report));
            Ok(())
        }
        other => anyhow::bail!("Unexpected outcome from 'website': {:?}", other),
    }
}
