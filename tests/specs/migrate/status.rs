//! `cairn status`

use crate::prelude::*;

#[test]
fn shows_plan_before_migrating() {
    let project = Project::empty();
    project.migration("users");
    project.commit("add users\n\n[cairn up users]");

    project
        .cairn()
        .args(&["status"])
        .passes()
        .stdout_has("add users")
        .stdout_has("Last migration: (none)")
        .stdout_has("New commits: 1")
        .stdout_has("To apply:\n  up   users");
    assert!(project.applied().is_empty());

    project.cairn().args(&["migrate"]).passes();
    project
        .cairn()
        .args(&["status"])
        .passes()
        .stdout_has("Last migration: up users at ")
        .stdout_has("from ")
        .stdout_has("Database is up to date.");
}

#[test]
fn shows_reversal() {
    let project = Project::empty();
    project.migration("a");
    project.migration("b");
    let base = project.commit("a\n\n[cairn up a]");
    project.commit("b\n\n[cairn up b]");
    project.cairn().args(&["migrate"]).passes();
    project.git(&["reset", "-q", "--hard", &base]);

    project
        .cairn()
        .args(&["status"])
        .passes()
        .stdout_has("To revert (HEAD moved back):\n  down b");
}

#[test]
fn json_status() {
    let project = Project::empty();
    project.migration("users");
    let id = project.commit("users\n\n[cairn up users]");
    let out = project
        .cairn()
        .args(&["status", "-o", "json"])
        .passes()
        .stdout();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["head"]["id"], id.as_str());
    assert_eq!(json["last_task"], serde_json::Value::Null);
    assert_eq!(json["pending"][0]["name"], "users");
}
