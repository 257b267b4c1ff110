//! Build command implementation
//!
//! Discovers the categories of every selected collection, resets the
//! artifact root, prepares each category's build directory and runs its
//! notebook scripts. With `--multi-build` categories are spread over a
//! bounded worker pool.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use nbcollection::config::BuildConfig;
use nbcollection::operations::{OperationRegistry, Outcome, ProgressHook};
use nbcollection::output::{emoji, format_build_summary, OutputConfig};
use nbcollection::phases::run::BashRunner;
use nbcollection::phases::JobOutcome;

use super::CollectionArgs;

/// Build every notebook of the selected collections
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub collection: CollectionArgs,

    /// Build categories in parallel, each in its own worker
    #[arg(long)]
    pub multi_build: bool,

    /// Upper bound on concurrently building categories
    #[arg(long, value_name = "N", env = "NBCOLLECTION_MAX_WORKERS")]
    pub max_workers: Option<usize>,

    /// Root of the per-category build directories
    #[arg(long, value_name = "DIR", env = "NBCOLLECTION_BUILD_DIR")]
    pub build_dir: Option<PathBuf>,

    /// Root of the per-category artifact directories; cleared before the build
    #[arg(long, value_name = "DIR", env = "NBCOLLECTION_ARTIFACT_DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Python interpreter used for each category's environment
    #[arg(long, value_name = "BIN", env = "NBCOLLECTION_PYTHON")]
    pub python: Option<String>,

    /// Exit successfully even when some notebooks failed to build
    #[arg(long)]
    pub allow_failures: bool,

    /// Suppress the progress spinner and summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl BuildArgs {
    fn apply(self, config: &mut BuildConfig) -> Result<(bool, bool, bool)> {
        self.collection.apply(config)?;
        if let Some(max_workers) = self.max_workers {
            config.max_workers = max_workers;
        }
        if let Some(build_dir) = self.build_dir {
            config.build_root = build_dir;
        }
        if let Some(artifact_dir) = self.artifact_dir {
            config.artifact_root = artifact_dir;
        }
        if let Some(python) = self.python {
            config.python = python;
        }
        Ok((self.multi_build, self.allow_failures, self.quiet))
    }
}

/// Execute the build command
pub fn execute(args: BuildArgs, mut config: BuildConfig, output: &OutputConfig) -> Result<()> {
    let (multi_build, allow_failures, quiet) = args.apply(&mut config)?;
    let start_time = Instant::now();

    if !quiet {
        println!("{} nbcollection build", emoji(output, "📓", "[BUILD]"));
        println!();
    }

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} [{pos}] {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };

    let bar = progress.clone();
    let hook: ProgressHook = Arc::new(move |outcome: &JobOutcome| {
        bar.inc(1);
        let status = if outcome.is_success() { "built" } else { "failed" };
        bar.set_message(format!("{} {}/{}", status, outcome.collection, outcome.category));
    });

    let registry = OperationRegistry::new(Arc::new(BashRunner), Some(hook));
    let operation = if multi_build { "multi-build" } else { "build" };
    let result = registry.execute(operation, &config);
    progress.finish_and_clear();

    let report = match result? {
        Outcome::Build(report) => report,
        other => anyhow::bail!("Unexpected outcome from '{}': {:?}", operation, other),
    };

    if !quiet {
        print!("{}", format_build_summary(output, &report));
        println!(
            "   finished in {:.2}s, artifacts in {}",
            start_time.elapsed().as_secs_f64(),
            config.artifact_root.display()
        );
    }

    if report.has_failures() && !allow_failures {
        anyhow::bail!(
            "{} categories failed to build; pass --allow-failures to ignore",
            report.failed_jobs().count()
        );
    }

    Ok(())
}
