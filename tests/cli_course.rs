use predicates::prelude::*;

mod backend_stub;

use backend_stub::{BackendStub, BackendStubConfig, base_course};

#[test]
fn help_lists_the_course_command() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("lectern");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("course"));
}

#[test]
fn show_without_backend_url_fails_with_a_hint() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("lectern");
    cmd.env_remove("LECTERN_BACKEND_URL")
        .args(["course", "show", "c1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LECTERN_BACKEND_URL"));
}

#[test]
fn show_prints_the_curriculum() {
    let stub = BackendStub::spawn(BackendStubConfig {
        course: base_course(),
        ..Default::default()
    });

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("lectern");
    cmd.env("LECTERN_BACKEND_URL", &stub.base_url)
        .env_remove("LECTERN_AUTH_TOKEN")
        .args(["course", "show", "c1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust 101"))
        .stdout(predicate::str::contains("Chapter 1: Basics"))
        .stdout(predicate::str::contains("Hello (01:30) [preview]"));
}

#[test]
fn deleting_a_missing_chapter_is_a_soft_failure() {
    let stub = BackendStub::spawn(BackendStubConfig {
        course: base_course(),
        missing_chapter_ids: vec!["ch-gone".to_owned()],
        ..Default::default()
    });

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("lectern");
    cmd.env("LECTERN_BACKEND_URL", &stub.base_url)
        .env_remove("LECTERN_AUTH_TOKEN")
        .args(["course", "delete-chapter", "c1", "ch-gone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already removed"));
}
