// CLI regression tests: drive the built `quova` binary end to end.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn quova() -> Command {
    let mut cmd = Command::cargo_bin("quova").unwrap();
    cmd.arg("--color").arg("never");
    cmd
}

#[test]
fn compile_prints_kotlin_to_stdout() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("main.qv");
    fs::write(&file, "class Main {}\n").unwrap();

    quova()
        .arg("compile")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("@file:JvmName(\"MainQv\")").and(contains("internal open class Main")));
}

#[test]
fn compile_reports_miette_diagnostics_on_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("bad.qv");
    fs::write(&file, "void main() {").unwrap();

    quova()
        .arg("compile")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("quova::parse"));
}

#[test]
fn compile_writes_the_output_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("main.qv");
    let target = dir.path().join("Main.kt");
    fs::write(&file, "record Point(int x, int y);\n").unwrap();

    quova()
        .arg("compile")
        .arg(&file)
        .arg("-o")
        .arg(&target)
        .assert()
        .success()
        .stderr(contains("Compiled"));
    let text = fs::read_to_string(&target).unwrap();
    assert!(text.contains("internal data class Point(val x: Int, val y: Int)"));
}

#[test]
fn config_file_disables_the_header() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("main.qv");
    let config = dir.path().join("quova.yaml");
    fs::write(&file, "class Main {}\n").unwrap();
    fs::write(&config, "jvm_name_header: false\n").unwrap();

    quova()
        .arg("--config")
        .arg(&config)
        .arg("compile")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("JvmName").not());
}

#[test]
fn bad_config_is_reported() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("main.qv");
    let config = dir.path().join("quova.yaml");
    fs::write(&file, "class Main {}\n").unwrap();
    fs::write(&config, "jvm_name_header: [\n").unwrap();

    quova()
        .arg("--config")
        .arg(&config)
        .arg("compile")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("quova::config"));
}

#[test]
fn module_writes_both_gradle_files() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("module.qvm");
    let out = dir.path().join("gradle");
    fs::write(&file, "project demo\ngroup com.example\nversion 1.0\n").unwrap();

    quova()
        .arg("module")
        .arg(&file)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    let build = fs::read_to_string(out.join("build.gradle")).unwrap();
    assert!(build.contains("id 'org.jetbrains.kotlin.jvm' version '1.4.10'"));
    assert_eq!(
        fs::read_to_string(out.join("settings.gradle")).unwrap(),
        "rootProject.name = 'demo'\n"
    );
}

#[test]
fn build_compiles_a_project_tree() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(dir.path().join("app")).unwrap();
    fs::write(dir.path().join("app/main.qv"), "void main() {}\n").unwrap();
    fs::write(dir.path().join("module.qvm"), "project demo\ngroup g\nversion 1\n").unwrap();

    quova()
        .arg("build")
        .arg(dir.path())
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(contains("Finished"));
    assert!(out.join("src/main/kotlin/app/main.kt").is_file());
    assert!(out.join("settings.gradle").is_file());
}

#[test]
fn ast_dumps_json() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("main.qv");
    fs::write(&file, "package demo;\n").unwrap();

    quova()
        .arg("ast")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("\"package\": \"demo\""));
}
