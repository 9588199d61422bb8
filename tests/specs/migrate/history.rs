//! `cairn migrate` follows the commit history.

use crate::prelude::*;

#[test]
fn empty_repository_is_up_to_date() {
    let project = Project::empty();
    project
        .cairn()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Database is up to date.\n");
}

#[test]
fn applies_directives_in_commit_order() {
    let project = Project::empty();
    project.migration("users");
    project.migration("orders");
    project.migration("audit");
    project.commit("schema\n\n[cairn up users orders]");
    project.commit("audit trail\n\n[cairn up audit]");

    project
        .cairn()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Applied 3 migrations.\n")
        .stderr_has("up users done");
    assert_eq!(project.applied(), vec!["up users", "up orders", "up audit"]);

    // Nothing new: nothing runs again
    project
        .cairn()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Database is up to date.\n");
    assert_eq!(project.applied().len(), 3);
}

#[test]
fn only_new_commits_run() {
    let project = Project::empty();
    project.migration("users");
    project.migration("orders");
    project.commit("users\n\n[cairn up users]");
    project.cairn().args(&["migrate"]).passes();

    project.commit("orders\n\n[cairn up orders]");
    project
        .cairn()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Applied 1 migration.\n");
    assert_eq!(project.applied(), vec!["up users", "up orders"]);
}

#[test]
fn reset_reverts_commits_head_moved_behind() {
    let project = Project::empty();
    project.migration("a");
    project.migration("b");
    project.migration("c");
    let c1 = project.commit("a\n\n[cairn up a]");
    project.commit("b\n\n[cairn up b]");
    project.commit("c\n\n[cairn up c]");
    project.cairn().args(&["migrate"]).passes();

    project.git(&["reset", "-q", "--hard", &c1]);
    project
        .cairn()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Applied 2 migrations.\n");
    assert_eq!(
        project.applied(),
        vec!["up a", "up b", "up c", "down b", "down c"]
    );

    project
        .cairn()
        .args(&["migrate"])
        .passes()
        .stdout_eq("Database is up to date.\n");
}

#[test]
fn failed_script_blocks_later_runs() {
    let project = Project::empty();
    project.file("migrations/flaky.toml", "up = \"exit 1\"\n");
    project.commit("flaky\n\n[cairn up flaky]");
    project.cairn().args(&["migrate"]).fails();

    // The failed task stays pending, so the next run waits and gives up
    project
        .cairn()
        .args(&["migrate"])
        .fails()
        .stderr_has("pending");
}

#[test]
fn json_summary() {
    let project = Project::empty();
    project.migration("users");
    project.commit("users\n\n[cairn up users]");
    let out = project
        .cairn()
        .args(&["migrate", "-o", "json"])
        .passes()
        .stdout();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["executed"][0]["name"], "users");
    assert_eq!(json["executed"][0]["direction"], "up");
}
