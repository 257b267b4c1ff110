//! # Output Configuration
//!
//! Controls how command results are printed: whether colors and emoji are
//! used, and the summary text for build, site and CI reports.
//!
//! Color follows the `--color=never|always|auto` flag. In auto mode the usual
//! environment conventions apply (`NO_COLOR`, `CLICOLOR=0`,
//! `CLICOLOR_FORCE=1`, `TERM=dumb`) before falling back to TTY detection.

use std::env;
use std::fmt::Write as _;

use console::style;

use crate::phases::site::SiteReport;
use crate::phases::BuildReport;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag value (`always`, `never` or `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors, even when empty.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// `emoji_str` when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

fn failed_label(config: &OutputConfig, text: &str) -> String {
    if config.use_color {
        style(text).red().bold().to_string()
    } else {
        text.to_string()
    }
}

/// Multi-line summary of a build batch.
///
/// The first line counts categories and scripts; every failing category
/// follows with its setup error or its failed scripts.
pub fn format_build_summary(config: &OutputConfig, report: &BuildReport) -> String {
    let failed_scripts = report.failed_scripts().count();
    let mut out = String::new();

    if report.has_failures() {
        let _ = writeln!(
            out,
            "{} Built {} categories: {} script(s) succeeded, {}",
            emoji(config, "❌", "[FAIL]"),
            report.jobs.len(),
            report.succeeded_scripts(),
            failed_label(config, &format!("{failed_scripts} failed")),
        );
    } else {
        let _ = writeln!(
            out,
            "{} Built {} categories: {} script(s) succeeded",
            emoji(config, "✅", "[OK]"),
            report.jobs.len(),
            report.succeeded_scripts(),
        );
    }

    for job in report.failed_jobs() {
        let _ = writeln!(out, "   {}/{}", job.collection, job.category);
        if let Some(setup_error) = &job.setup_error {
            let _ = writeln!(out, "     setup failed: {setup_error}");
        }
        for failure in &job.failures {
            let _ = writeln!(out, "     {failure}");
        }
    }

    out
}

/// One-paragraph summary of a site assembly.
pub fn format_site_summary(config: &OutputConfig, report: &SiteReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Converted {} page(s), skipped {}",
        emoji(config, "🌐", "[SITE]"),
        report.converted.len(),
        report.skipped.len()
    );
    for skipped in &report.skipped {
        let _ = writeln!(out, "   skipped {}", skipped.display());
    }
    match &report.index {
        Some(index) => {
            let _ = writeln!(out, "   index: {}", index.display());
        }
        None => {
            let _ = writeln!(out, "   index not written");
        }
    }
    out
}
