//! # Ls Command Implementation
//!
//! Lists the categories and notebooks discovery finds in the selected
//! collections, as plain text, a tree or JSON. This command is read-only:
//! nothing is created or deleted.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};
use serde::Serialize;

use nbcollection::config::BuildConfig;
use nbcollection::operations::{OperationRegistry, Outcome};
use nbcollection::output::OutputConfig;
use nbcollection::phases::BuildJob;

use super::CollectionArgs;

/// List the categories and notebooks that would be built
#[derive(Args, Debug)]
pub struct LsArgs {
    #[command(flatten)]
    pub collection: CollectionArgs,

    /// Show collections, categories and notebooks as a tree
    #[arg(long, conflicts_with = "json")]
    pub tree: bool,

    /// Print the discovered jobs as JSON
    #[arg(long)]
    pub json: bool,
}

/// One discovered category in `--json` output.
#[derive(Debug, Serialize)]
struct JobListing {
    collection: String,
    category: String,
    source_dir: PathBuf,
    notebooks: Vec<String>,
}

impl From<&BuildJob> for JobListing {
    fn from(job: &BuildJob) -> Self {
        Self {
            collection: job.collection.clone(),
            category: job.category.name.clone(),
            source_dir: job.category.source_dir.clone(),
            notebooks: job
                .category
                .notebooks
                .iter()
                .map(|nb| nb.filename.clone())
                .collect(),
        }
    }
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs, mut config: BuildConfig, _output: &OutputConfig) -> Result<()> {
    args.collection.apply(&mut config)?;

    let jobs = match OperationRegistry::with_defaults().execute("list", &config)? {
        Outcome::Jobs(jobs) => jobs,
        other => anyhow::bail!("Unexpected outcome from 'list': {:?}", other),
    };

    if args.json {
        let listing: Vec<JobListing> = jobs.iter().map(JobListing::from).collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if args.tree {
        print_tree(&build_tree(&jobs))
            .map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;
        return Ok(());
    }

    if jobs.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    for job in &jobs {
        println!("{}", job.label());
        for notebook in &job.category.notebooks {
            println!("  {}", notebook.filename);
        }
    }

    let notebooks: usize = jobs.iter().map(|j| j.category.notebooks.len()).sum();
    println!();
    println!("{} category(ies), {} notebook(s)", jobs.len(), notebooks);

    Ok(())
}

/// Group jobs under their collection, keeping discovery order.
fn build_tree(jobs: &[BuildJob]) -> TreeNode {
    let mut collections: Vec<TreeNode> = Vec::new();

    for job in jobs {
        let category = TreeNode {
            label: job.category.name.clone(),
            children: job
                .category
                .notebooks
                .iter()
                .map(|nb| TreeNode {
                    label: nb.filename.clone(),
                    children: vec![],
                })
                .collect(),
        };

        match collections.iter_mut().find(|c| c.label == job.collection) {
            Some(collection) => collection.children.push(category),
            None => collections.push(TreeNode {
                label: job.collection.clone(),
                children: vec![category],
            }),
        }
    }

    TreeNode {
        label: "collections".to_string(),
        children: collections,
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone, Debug)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
