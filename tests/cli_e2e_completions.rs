//! End-to-end tests for the `completions` command.

mod common;

use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_bash() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("token-loom"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_rejects_unknown_shell() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("completions")
        .arg("dos")
        .assert()
        .failure();
}
