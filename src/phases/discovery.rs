//! Phase 1: Discovery
//!
//! Maps a directory tree onto collections, categories and build jobs.
//!
//! ## Process
//!
//! 1.  **Ignore rules**: The collection root's `.gitignore` is loaded once and
//!     used for the whole tree.
//!
//! 2.  **Breadth-first walk**: Starting at the root, every immediate
//!     subdirectory of the current level is examined before anything deeper.
//!     Excluded and hidden directories are never enqueued, so their contents
//!     are never visited.
//!
//! 3.  **Classification**: A subdirectory with `*.ipynb` files directly inside
//!     it becomes a category (and is not descended into). One without notebooks
//!     is a pass-through container and is enqueued for the next level.
//!
//! 4.  **Validation**: A category must contain `requirements.txt`, and category
//!     names must be unique across a discovery pass because they determine
//!     the build and artifact directories.
//!
//! Discovery only reads the filesystem. Recreating build directories is the
//! job of [`crate::phases::setup`].

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::{BuildJob, Collection};
use crate::category::Category;
use crate::config::BuildConfig;
use crate::defaults::{IGNORE_FILENAME, NOTEBOOK_EXTENSION, REQUIREMENTS_FILENAME};
use crate::error::{Error, Result};
use crate::ignore::IgnoreRuleSet;
use crate::notebook::Notebook;

/// Discover every collection named in `config.collections`.
pub fn find_collections(config: &BuildConfig) -> Result<Vec<Collection>> {
    config
        .collections
        .iter()
        .map(|root| -> Result<Collection> {
            let categories = build_categories(root, config)?;
            Ok(Collection {
                name: collection_name(root),
                root: root.clone(),
                categories,
            })
        })
        .collect()
}

/// Discover collections and turn every category into a [`BuildJob`].
///
/// The category filter in `config` is applied after the duplicate check, so
/// a filtered build still refuses a tree with clashing category names.
pub fn find_build_jobs(config: &BuildConfig) -> Result<Vec<BuildJob>> {
    let collections = find_collections(config)?;
    ensure_unique_categories(&collections)?;

    let jobs = collections
        .iter()
        .flat_map(|collection| {
            collection
                .categories
                .iter()
                .filter(|category| config.includes_category(&category.name))
                .map(move |category| BuildJob::new(collection, category.clone()))
        })
        .collect();

    Ok(jobs)
}

/// Walk one collection root and return its categories in walk order.
pub fn build_categories(root: &Path, config: &BuildConfig) -> Result<Vec<Category>> {
    if !root.is_dir() {
        return Err(Error::Filesystem {
            message: format!("Collection root '{}' is not a directory", root.display()),
        });
    }

    let rules = IgnoreRuleSet::load(&root.join(IGNORE_FILENAME))?;
    let mut categories = Vec::new();
    let mut pending = VecDeque::from([root.to_path_buf()]);

    while let Some(dir) = pending.pop_front() {
        for (name, dirpath) in subdirectories(&dir)? {
            if name.starts_with('.') || rules.is_excluded(&name, &dirpath)? {
                debug!("Pruning {}", dirpath.display());
                continue;
            }

            let notebooks = find_notebooks(&dirpath)?;
            if notebooks.is_empty() {
                pending.push_back(dirpath);
                continue;
            }

            let requirements = dirpath.join(REQUIREMENTS_FILENAME);
            if !requirements.is_file() {
                return Err(Error::MissingRequirements { path: requirements });
            }

            debug!(
                "Found category {} with {} notebook(s)",
                name,
                notebooks.len()
            );
            categories.push(Category::new(
                name,
                notebooks,
                dirpath,
                &config.build_root,
                &config.artifact_root,
            ));
        }
    }

    Ok(categories)
}

/// Notebooks directly inside `dir`, sorted by filename with positions assigned.
pub fn find_notebooks(dir: &Path) -> Result<Vec<Notebook>> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        NOTEBOOK_EXTENSION
    );

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| Error::Io(e.into_error()))?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(position, path)| Notebook::new(path, position))
        .collect())
}

/// Name of a collection: the last component of its root path.
pub fn collection_name(root: &Path) -> String {
    if let Some(name) = root.file_name() {
        return name.to_string_lossy().into_owned();
    }
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn ensure_unique_categories(collections: &[Collection]) -> Result<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for category in collections.iter().flat_map(|c| c.categories.iter()) {
        if let Some(first) = seen.insert(&category.name, &category.source_dir) {
            return Err(Error::DuplicateCategory {
                name: category.name.clone(),
                first: first.to_path_buf(),
                second: category.source_dir.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    fn config_for(temp: &TempDir, roots: &[&str]) -> BuildConfig {
        BuildConfig {
            collections: roots.iter().map(|r| temp.path().join(r)).collect(),
            build_root: temp.path().join("_build"),
            artifact_root: temp.path().join("_artifacts"),
            ..BuildConfig::default()
        }
    }

    #[test]
    fn test_single_category_with_sorted_positions() {
        let temp = TempDir::new().unwrap();
        let demo = temp.path().join("jdat_notebooks/demo");
        touch(&demo.join("z.ipynb"));
        touch(&demo.join("a.ipynb"));
        touch(&demo.join("requirements.txt"));

        let collections = find_collections(&config_for(&temp, &["jdat_notebooks"])).unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "jdat_notebooks");
        assert_eq!(collections[0].categories.len(), 1);

        let category = &collections[0].categories[0];
        assert_eq!(category.name, "demo");
        let order: Vec<(&str, usize)> = category
            .notebooks
            .iter()
            .map(|n| (n.filename.as_str(), n.position))
            .collect();
        assert_eq!(order, vec![("a.ipynb", 0), ("z.ipynb", 1)]);
    }

    #[test]
    fn test_missing_requirements_fails_fast() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("c/demo/a.ipynb"));

        let err = find_collections(&config_for(&temp, &["c"])).unwrap_err();
        match err {
            Error::MissingRequirements { path } => {
                assert_eq!(path, temp.path().join("c/demo/requirements.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_container_directories_are_descended() {
        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("c/outer/inner");
        touch(&inner.join("nb.ipynb"));
        touch(&inner.join("requirements.txt"));

        let categories = build_categories(&temp.path().join("c"), &config_for(&temp, &[])).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "inner");
        assert_eq!(categories[0].source_dir, inner);
    }

    #[test]
    fn test_category_subdirectories_are_not_visited() {
        let temp = TempDir::new().unwrap();
        let outer = temp.path().join("c/outer");
        touch(&outer.join("top.ipynb"));
        touch(&outer.join("requirements.txt"));
        // No requirements here: visiting it would fail.
        touch(&outer.join("nested/deep.ipynb"));

        let categories = build_categories(&temp.path().join("c"), &config_for(&temp, &[])).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "outer");
        assert_eq!(categories[0].notebooks.len(), 1);
    }

    #[test]
    fn test_ignored_directories_are_pruned() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("c");
        touch(&root.join("skipme/a.ipynb"));
        touch(&root.join("venv/lib/a.ipynb"));
        touch(&root.join("keep/a.ipynb"));
        touch(&root.join("keep/requirements.txt"));
        fs::write(root.join(".gitignore"), "skipme\n").unwrap();

        let categories = build_categories(&root, &config_for(&temp, &[])).unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["keep"]);
    }

    #[test]
    fn test_root_rules_apply_at_every_depth() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("c");
        touch(&root.join("group/scratch/a.ipynb"));
        touch(&root.join("group/real/a.ipynb"));
        touch(&root.join("group/real/requirements.txt"));
        fs::write(root.join(".gitignore"), "scratch\n").unwrap();

        let categories = build_categories(&root, &config_for(&temp, &[])).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "real");
    }

    #[test]
    fn test_hidden_directories_are_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("c");
        touch(&root.join(".ipynb_checkpoints/a-checkpoint.ipynb"));

        assert!(build_categories(&root, &config_for(&temp, &[]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_siblings_come_before_deeper_levels() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("c");
        for dir in ["a/deep", "b"] {
            touch(&root.join(dir).join("n.ipynb"));
            touch(&root.join(dir).join("requirements.txt"));
        }

        let categories = build_categories(&root, &config_for(&temp, &[])).unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "deep"]);
    }

    #[test]
    fn test_wildcard_in_root_ignore_fails() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("c");
        fs::create_dir_all(root.join("x")).unwrap();
        fs::write(root.join(".gitignore"), "*.pyc\n").unwrap();

        let err = build_categories(&root, &config_for(&temp, &[])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedIgnoreRule { .. }));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(build_categories(&temp.path().join("nope"), &config_for(&temp, &[])).is_err());
    }

    #[test]
    fn test_duplicate_category_names_rejected() {
        let temp = TempDir::new().unwrap();
        for dir in ["c/one/demo", "c/two/demo"] {
            touch(&temp.path().join(dir).join("n.ipynb"));
            touch(&temp.path().join(dir).join("requirements.txt"));
        }

        let err = find_build_jobs(&config_for(&temp, &["c"])).unwrap_err();
        assert!(matches!(err, Error::DuplicateCategory { ref name, .. } if name == "demo"));
    }

    #[test]
    fn test_find_build_jobs_applies_category_filter() {
        let temp = TempDir::new().unwrap();
        for dir in ["c/alpha", "c/beta"] {
            touch(&temp.path().join(dir).join("n.ipynb"));
            touch(&temp.path().join(dir).join("requirements.txt"));
        }
        let mut config = config_for(&temp, &["c"]);
        config.categories = vec!["beta".to_string()];

        let jobs = find_build_jobs(&config).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].category.name, "beta");
        assert_eq!(jobs[0].collection, "c");
        assert_eq!(
            jobs[0].scripts,
            vec![temp.path().join("_build/beta/n.ipynb-builder.sh")]
        );
    }

    #[test]
    fn test_discovery_does_not_touch_build_dirs() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("c/demo/n.ipynb"));
        touch(&temp.path().join("c/demo/requirements.txt"));
        let stale = temp.path().join("_artifacts/demo/old.html");
        touch(&stale);

        find_build_jobs(&config_for(&temp, &["c"])).unwrap();
        assert!(stale.exists());
    }

    #[test]
    fn test_collection_name_uses_last_component() {
        assert_eq!(collection_name(Path::new("work/jdat_notebooks")), "jdat_notebooks");
        assert_eq!(collection_name(Path::new("jdat_notebooks/")), "jdat_notebooks");
    }
}
