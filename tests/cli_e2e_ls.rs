//! End-to-end tests for the `nbcollection ls` command.

mod common;
use common::prelude::*;

#[test]
fn test_ls_help() {
    let mut cmd = cargo_bin_cmd!("nbcollection");
    cmd.arg("ls")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "List the categories and notebooks that would be built",
        ));
}

#[test]
fn test_ls_lists_categories_in_walk_order() {
    let fixture = TestFixture::new()
        .with_category("nbs", "zeta", &["b.ipynb", "a.ipynb"])
        .with_category("nbs", "group/alpha", &["x.ipynb"]);

    fixture
        .command()
        .arg("ls")
        .arg("-c")
        .arg(fixture.collection("nbs"))
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)nbs/zeta\n  a\.ipynb\n  b\.ipynb\nnbs/alpha\n  x\.ipynb").unwrap())
        .stdout(predicate::str::contains("2 category(ies), 3 notebook(s)"));
}

#[test]
fn test_ls_comma_separated_collections_and_category_filter() {
    let fixture = TestFixture::new()
        .with_category("one", "spectra", &["a.ipynb"])
        .with_category("two", "imaging", &["b.ipynb"]);
    let collections = format!(
        "{},{}",
        fixture.collection("one").display(),
        fixture.collection("two").display()
    );

    fixture
        .command()
        .arg("ls")
        .arg("-c")
        .arg(&collections)
        .arg("--category")
        .arg("imaging")
        .assert()
        .success()
        .stdout(predicate::str::contains("two/imaging"))
        .stdout(predicate::str::contains("one/spectra").not());
}

#[test]
fn test_ls_json() {
    let fixture = TestFixture::new().with_category("nbs", "spectra", &["a.ipynb"]);

    let output = fixture
        .command()
        .arg("ls")
        .arg("-c")
        .arg(fixture.collection("nbs"))
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["collection"], "nbs");
    assert_eq!(value[0]["category"], "spectra");
    assert_eq!(value[0]["notebooks"][0], "a.ipynb");
}

#[test]
fn test_ls_tree() {
    let fixture = TestFixture::new().with_category("nbs", "spectra", &["a.ipynb"]);

    fixture
        .command()
        .arg("ls")
        .arg("-c")
        .arg(fixture.collection("nbs"))
        .arg("--tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("collections"))
        .stdout(predicate::str::contains("spectra"))
        .stdout(predicate::str::contains("a.ipynb"));
}

#[test]
fn test_ls_respects_root_gitignore() {
    let fixture = TestFixture::new()
        .with_category("nbs", "spectra", &["a.ipynb"])
        .with_category("nbs", "drafts", &["d.ipynb"])
        .with_file("nbs/.gitignore", "# scratch work\ndrafts/\n");

    fixture
        .command()
        .arg("ls")
        .arg("-c")
        .arg(fixture.collection("nbs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("nbs/spectra"))
        .stdout(predicate::str::contains("drafts").not());
}

#[test]
fn test_ls_missing_requirements_fails() {
    let fixture = TestFixture::new().with_file("nbs/spectra/a.ipynb", "{}");

    fixture
        .command()
        .arg("ls")
        .arg("-c")
        .arg(fixture.collection("nbs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing requirements file"));
}

#[test]
fn test_ls_wildcard_ignore_rule_fails() {
    let fixture = TestFixture::new()
        .with_category("nbs", "spectra", &["a.ipynb"])
        .with_file("nbs/.gitignore", "*.log\n");

    fixture
        .command()
        .arg("ls")
        .arg("-c")
        .arg(fixture.collection("nbs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("wildcard patterns are not supported"));
}

#[test]
fn test_ls_collections_from_config_file() {
    let fixture = TestFixture::new()
        .with_category("nbs", "spectra", &["a.ipynb"])
        .with_config("collections:\n  - nbs\n");

    fixture
        .command()
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("nbs/spectra"));
}

#[test]
fn test_ls_without_collections_fails() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No collections given"));
}

#[test]
fn test_ls_config_path_from_env() {
    let fixture = TestFixture::new()
        .with_category("nbs", "spectra", &["a.ipynb"])
        .with_file("conf/nb.yaml", "collections:\n  - nbs\ncategories:\n  - spectra\n");

    fixture
        .command()
        .env("NBCOLLECTION_CONFIG", fixture.path().join("conf/nb.yaml"))
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("nbs/spectra"));
}
