//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;

use nbcollection::config;
use nbcollection::defaults::DEFAULT_CONFIG_FILENAME;
use nbcollection::output::OutputConfig;

use crate::commands;

/// nbcollection - Build collections of Jupyter notebooks into a static site
#[derive(Parser, Debug)]
#[command(name = "nbcollection")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Configuration file, read when present
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_FILENAME,
        env = "NBCOLLECTION_CONFIG"
    )]
    config: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build every notebook of the selected collections
    Build(commands::build::BuildArgs),
    /// Assemble built notebooks into a static site
    Site(commands::site::SiteArgs),
    /// Write a CI config with one job per category
    CiConfig(commands::ci_config::CiConfigArgs),
    /// List the categories and notebooks that would be built
    Ls(commands::ls::LsArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        let command = match self.command {
            Commands::Completions(args) => return commands::completions::execute(args),
            command => command,
        };

        let build_config = config::load_or_default(&self.config)
            .with_context(|| format!("Failed to load config from {}", self.config.display()))?;

        match command {
            Commands::Build(args) => commands::build::execute(args, build_config, &output),
            Commands::Site(args) => commands::site::execute(args, build_config, &output),
            Commands::CiConfig(args) => commands::ci_config::execute(args, build_config, &output),
            Commands::Ls(args) => commands::ls::execute(args, build_config, &output),
            Commands::Completions(_) => Ok(()),
        }
    }
}

/// Route `log` records to stderr with timestamps.
fn init_logging(level: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .format_target(true)
        .try_init();
}
