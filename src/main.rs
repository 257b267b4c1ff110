//! # nbcollection CLI
//!
//! Binary entry point for the `nbcollection` command-line tool. It parses
//! arguments with `clap` and hands off to the selected command; the build
//! logic itself lives in the library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
