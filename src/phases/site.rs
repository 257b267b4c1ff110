//! Phase 4: Site
//!
//! Collects the HTML and metadata artifacts of every notebook into
//! `site_root/<collection>/<category>/` and renders an index page linking to
//! each of them.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use super::BuildJob;
use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::template::{load_template, render_index, IndexEntry};

/// Metadata extracted from a notebook by the build scripts.
#[derive(Debug, Clone, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Result of assembling the site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteReport {
    /// Pages copied into the site, in job and notebook order.
    pub converted: Vec<IndexEntry>,
    /// Notebooks whose artifacts were missing or unreadable.
    pub skipped: Vec<PathBuf>,
    /// The index file, when one was written.
    pub index: Option<PathBuf>,
}

/// Assemble the website for `jobs` under `config.site_root`.
///
/// When no page could be converted the index is left untouched.
pub fn execute(jobs: &[BuildJob], config: &BuildConfig) -> Result<SiteReport> {
    let mut report = SiteReport::default();

    for job in jobs {
        let category = &job.category;
        let page_dir = config.site_root.join(&job.collection).join(&category.name);

        for notebook in &category.notebooks {
            let paths =
                notebook.artifact_paths(&category.artifact_dir, &job.collection, &category.name);

            let metadata = match read_metadata(&paths.metadata) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Skipping {}: {}", notebook.filepath.display(), e);
                    report.skipped.push(notebook.filepath.clone());
                    continue;
                }
            };
            if !paths.html.is_file() {
                warn!(
                    "Skipping {}: missing rendered page {}",
                    notebook.filepath.display(),
                    paths.html.display()
                );
                report.skipped.push(notebook.filepath.clone());
                continue;
            }

            fs::create_dir_all(&page_dir)?;
            fs::copy(&paths.html, page_dir.join(format!("{}.html", notebook.name)))?;
            fs::copy(
                &paths.metadata,
                page_dir.join(format!("{}.metadata.json", notebook.name)),
            )?;

            let title = metadata.title.unwrap_or_else(|| notebook.name.clone());
            report.converted.push(IndexEntry {
                output_path: format!("{}/{}/{}.html", job.collection, category.name, notebook.name),
                name: title.clone(),
                title,
            });
        }
    }

    if report.converted.is_empty() {
        warn!("No pages were converted; leaving the site index untouched");
        return Ok(report);
    }

    let template = load_template(config.index_template.as_deref())?;
    let index = render_index(&template, &report.converted)?;
    fs::create_dir_all(&config.site_root)?;
    let index_path = config.site_root.join("index.html");
    fs::write(&index_path, index)?;
    info!(
        "Wrote {} with {} page(s)",
        index_path.display(),
        report.converted.len()
    );
    report.index = Some(index_path);

    Ok(report)
}

fn read_metadata(path: &Path) -> Result<NotebookMetadata> {
    let content = fs::read_to_string(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to read metadata '{}': {}", path.display(), e),
    })?;
    Ok(serde_json::from_str(&content)?)
}
