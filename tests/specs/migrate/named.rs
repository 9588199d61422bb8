//! `cairn up` / `cairn down` run migrations outside of commit directives.

use crate::prelude::*;

#[test]
fn up_then_down_alternates() {
    let project = Project::empty();
    project.migration("users");
    project.commit("users");

    project
        .cairn()
        .args(&["up", "users"])
        .passes()
        .stdout_eq("Applied 1 migration.\n");
    project
        .cairn()
        .args(&["up", "users"])
        .fails()
        .stderr_has("cannot run up twice");
    project.cairn().args(&["down", "users"]).passes();
    assert_eq!(project.applied(), vec!["up users", "down users"]);
}

#[test]
fn needs_a_commit() {
    let project = Project::empty();
    project.migration("users");
    project
        .cairn()
        .args(&["up", "users"])
        .fails()
        .stderr_has("no commits");
}

#[test]
fn named_run_moves_the_migrate_baseline() {
    let project = Project::empty();
    project.migration("users");
    project.commit("users\n\n[cairn up users]");

    // The named run records HEAD, so migrate sees nothing new
    project
        .cairn()
        .args(&["up", "users"])
        .passes()
        .stderr_has("1 committed migration is not applied yet (up users)");
    project
        .cairn()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Database is up to date.\n");
    assert_eq!(project.applied(), vec!["up users"]);
}

#[test]
fn missing_manifest_is_not_registered() {
    let project = Project::empty();
    project.commit("nothing here");
    project
        .cairn()
        .args(&["up", "ghost"])
        .fails()
        .stderr_has("migration ghost not found");

    // No pending row was left behind
    project.migration("ghost");
    project.cairn().args(&["up", "ghost"]).passes();
}
