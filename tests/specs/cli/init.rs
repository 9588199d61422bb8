//! `cairn init`

use crate::prelude::*;

#[test]
fn writes_config_and_migration_dir() {
    let project = Project::empty();
    project
        .cairn()
        .args(&["init"])
        .passes()
        .stdout_has("Wrote .cairnrc.json")
        .stdout_has("Migration table ready");

    let config: serde_json::Value = serde_json::from_str(&project.read(".cairnrc.json")).unwrap();
    assert_eq!(config["migrationDir"], "migrations");
    assert!(project.path().join("migrations").is_dir());
}

#[test]
fn keeps_existing_config() {
    let project = Project::empty();
    project.file(".cairnrc.json", "{\"migrationDir\": \"db/migrate\"}\n");
    project
        .cairn_no_db()
        .args(&["init", "--no-hook"])
        .passes()
        .stdout_lacks("Wrote");
    assert_eq!(
        project.read(".cairnrc.json"),
        "{\"migrationDir\": \"db/migrate\"}\n"
    );
    assert!(project.path().join("db/migrate").is_dir());
}

#[test]
fn installs_hook_but_not_over_a_foreign_one() {
    let project = Project::empty();
    project.cairn_no_db().args(&["init"]).passes();
    let hook = project.read(".git/hooks/prepare-commit-msg");
    assert!(hook.contains("prepare-commit-msg \"$@\""), "{hook}");

    project.file(".git/hooks/prepare-commit-msg", "#!/bin/sh\nexit 0\n");
    project
        .cairn_no_db()
        .args(&["init"])
        .passes()
        .stderr_has("not written by cairn");
    assert_eq!(
        project.read(".git/hooks/prepare-commit-msg"),
        "#!/bin/sh\nexit 0\n"
    );
}
