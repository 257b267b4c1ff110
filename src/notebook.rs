//! Notebook descriptors and their generated build scripts

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::shell::{quote, quote_path};

/// File name of the per-category environment setup script.
pub const SETUP_SCRIPT_NAME: &str = "setup-build-env.sh";

/// Marker the setup script leaves behind once the environment is ready.
pub const ENV_READY_MARKER: &str = ".env-ready";

/// File name of the metadata helper inside a build directory.
pub const METADATA_HELPER_NAME: &str = "extract_metadata_from_notebook.py";

/// One notebook discovered inside a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    /// Filename without the `.ipynb` extension.
    pub name: String,
    /// Filename including the extension.
    pub filename: String,
    /// Path of the notebook in the source tree.
    pub filepath: PathBuf,
    /// Rank within the category by filename order, starting at 0.
    pub position: usize,
}

/// Where a notebook's rendered outputs land.
///
/// Both the build scripts and the website assembler compute these paths, so
/// they depend on nothing but the artifact directory and the three names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub output_dir: PathBuf,
    pub metadata: PathBuf,
    pub html: PathBuf,
}

impl ArtifactPaths {
    pub fn new(artifact_dir: &Path, collection: &str, category: &str, filename: &str) -> Self {
        let output_dir = artifact_dir.join(collection).join(category);
        Self {
            metadata: output_dir.join(format!("{filename}.metadata.json")),
            html: output_dir.join(format!("{filename}.html")),
            output_dir,
        }
    }
}

impl Notebook {
    pub fn new(filepath: PathBuf, position: usize) -> Self {
        let filename = filepath
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match filename.rsplit_once('.') {
            Some((stem, _)) => stem.to_string(),
            None => filename.clone(),
        };

        Self {
            name,
            filename,
            filepath,
            position,
        }
    }

    /// Path of this notebook's build script inside `build_dir`.
    pub fn build_script_path(&self, build_dir: &Path) -> PathBuf {
        build_dir.join(format!("{}-builder.sh", self.filename))
    }

    /// Artifact locations for this notebook within a collection/category.
    pub fn artifact_paths(&self, artifact_dir: &Path, collection: &str, category: &str) -> ArtifactPaths {
        ArtifactPaths::new(artifact_dir, collection, category, &self.filename)
    }

    /// Render the build script text.
    ///
    /// `categories` is the `[collection, category]` pair used for output
    /// pathing. `build_dir` and `artifact_dir` should be absolute: the script
    /// changes into `build_dir` before touching any artifact path.
    pub fn render_build_script(
        &self,
        categories: [&str; 2],
        build_dir: &Path,
        artifact_dir: &Path,
        execution_timeout: u64,
    ) -> String {
        let [collection, category] = categories;
        let paths = self.artifact_paths(artifact_dir, collection, category);

        format!(
            r#"#!/usr/bin/env bash
set -e
cd {build_dir}
if [ ! -f "{marker}" ]; then
    bash {setup}
fi
source env/bin/activate
if [ -f "environment.sh" ]; then
    source environment.sh
fi

mkdir -p {output_dir}
python {helper} --input {filename} --output {metadata}
jupyter nbconvert --to html --execute {filename} --output {html} --ExecutePreprocessor.timeout={timeout}
"#,
            build_dir = quote_path(build_dir),
            marker = ENV_READY_MARKER,
            setup = SETUP_SCRIPT_NAME,
            output_dir = quote_path(&paths.output_dir),
            helper = METADATA_HELPER_NAME,
            filename = quote(&self.filename),
            metadata = quote_path(&paths.metadata),
            html = quote_path(&paths.html),
            timeout = execution_timeout,
        )
    }

    /// Write the executable build script into `build_dir` and return its path.
    pub fn create_build_script(
        &self,
        categories: [&str; 2],
        build_dir: &Path,
        artifact_dir: &Path,
        execution_timeout: u64,
    ) -> Result<PathBuf> {
        let script_path = self.build_script_path(build_dir);
        let script = self.render_build_script(categories, build_dir, artifact_dir, execution_timeout);
        write_executable(&script_path, &script)?;
        Ok(script_path)
    }
}

/// Write a shell script and mark it executable on Unix.
pub(crate) fn write_executable(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn notebook() -> Notebook {
        Notebook::new(PathBuf::from("jdat_notebooks/demo/a.ipynb"), 0)
    }

    #[test]
    fn test_new_splits_name_and_filename() {
        let nb = notebook();
        assert_eq!(nb.name, "a");
        assert_eq!(nb.filename, "a.ipynb");
        assert_eq!(nb.position, 0);
    }

    #[test]
    fn test_name_keeps_inner_dots() {
        let nb = Notebook::new(PathBuf::from("x/v1.2.ipynb"), 3);
        assert_eq!(nb.name, "v1.2");
    }

    #[test]
    fn test_artifact_paths_are_deterministic() {
        let paths = notebook().artifact_paths(Path::new("/tmp/artifacts/demo"), "jdat_notebooks", "demo");
        assert_eq!(
            paths.output_dir,
            PathBuf::from("/tmp/artifacts/demo/jdat_notebooks/demo")
        );
        assert_eq!(
            paths.metadata,
            PathBuf::from("/tmp/artifacts/demo/jdat_notebooks/demo/a.ipynb.metadata.json")
        );
        assert_eq!(
            paths.html,
            PathBuf::from("/tmp/artifacts/demo/jdat_notebooks/demo/a.ipynb.html")
        );
    }

    #[test]
    fn test_render_build_script_contents() {
        let script = notebook().render_build_script(
            ["jdat_notebooks", "demo"],
            Path::new("/b/demo"),
            Path::new("/a/demo"),
            600,
        );
        assert!(script.starts_with("#!/usr/bin/env bash\nset -e\n"));
        assert!(script.contains("cd /b/demo\n"));
        assert!(script.contains("bash setup-build-env.sh"));
        assert!(script.contains("source env/bin/activate"));
        assert!(script.contains("mkdir -p /a/demo/jdat_notebooks/demo\n"));
        assert!(script.contains(
            "--input a.ipynb --output /a/demo/jdat_notebooks/demo/a.ipynb.metadata.json"
        ));
        assert!(script.contains("--output /a/demo/jdat_notebooks/demo/a.ipynb.html"));
        assert!(script.contains("--ExecutePreprocessor.timeout=600"));
    }

    #[test]
    fn test_render_build_script_quotes_shell_characters() {
        let nb = Notebook::new(PathBuf::from("x/a$b `c`.ipynb"), 0);
        let script = nb.render_build_script(
            ["my nbs", "demo"],
            Path::new("/b/my demo"),
            Path::new("/a/demo"),
            600,
        );

        assert!(script.contains("cd '/b/my demo'\n"));
        assert!(script.contains("mkdir -p '/a/demo/my nbs/demo'\n"));
        assert!(script.contains("--input 'a$b `c`.ipynb' --output '/a/demo/my nbs/demo/a$b `c`.ipynb.metadata.json'"));
        assert!(script.contains("--execute 'a$b `c`.ipynb' --output '/a/demo/my nbs/demo/a$b `c`.ipynb.html'"));
        assert!(!script.contains("\"a$b"));
    }

    #[test]
    fn test_create_build_script_writes_executable() {
        let temp = TempDir::new().unwrap();
        let path = notebook()
            .create_build_script(["c", "demo"], temp.path(), Path::new("/a"), 30)
            .unwrap();

        assert_eq!(path, temp.path().join("a.ipynb-builder.sh"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("timeout=30"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
