//! CI config command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use nbcollection::config::BuildConfig;
use nbcollection::operations::{OperationRegistry, Outcome};
use nbcollection::output::{emoji, OutputConfig};

use super::CollectionArgs;

/// Write a CI config with one job per category
#[derive(Args, Debug)]
pub struct CiConfigArgs {
    #[command(flatten)]
    pub collection: CollectionArgs,

    /// File the CI config is written to
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Docker image the CI jobs run in
    #[arg(long, value_name = "IMAGE", env = "NBCOLLECTION_CI_IMAGE")]
    pub image: Option<String>,
}

/// Execute the ci-config command
pub fn execute(args: CiConfigArgs, mut config: BuildConfig, output: &OutputConfig) -> Result<()> {
    args.collection.apply(&mut config)?;
    if let Some(path) = args.output {
        config.ci_output = path;
    }
    if let Some(image) = args.image {
        config.ci_image = image;
    }

    match OperationRegistry::with_defaults().execute("ci-config", &config)? {
        Outcome::CiConfig { path, jobs } => {
            println!(
                "{} Wrote {} job(s) to {}",
                emoji(output, "⚙️", "[CI]"),
                jobs,
                path.display()
            );
            Ok(())
        }
        other => anyhow::bail!("Unexpected outcome from 'ci-config': {:?}", other),
    }
}
