use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("formcanvas");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("formcanvas"));
}

#[test]
fn inspect_summarizes_a_form_document() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!(
        "formcanvas-cli-test-{}.json",
        std::process::id()
    ));

    let mut new_cmd = cargo::cargo_bin_cmd!("formcanvas");
    new_cmd
        .args(["new", "--name", "Smoke Test", "-o"])
        .arg(&path)
        .arg("--force")
        .assert()
        .success();

    let mut inspect_cmd = cargo::cargo_bin_cmd!("formcanvas");
    inspect_cmd
        .arg("inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("Smoke Test"));

    let _ = std::fs::remove_file(path);
}
