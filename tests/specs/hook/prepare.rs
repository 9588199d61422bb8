//! The prepare-commit-msg hook adds directives for new migrations.

use crate::prelude::*;

#[test]
fn commit_gets_directive_for_staged_migration() {
    let project = Project::empty();
    project.commit("initial");
    project.cairn_no_db().args(&["init"]).passes();

    project.migration("users");
    let id = project.commit("add users table");
    let message = project.git(&["show", "-s", "--format=%B", &id]);
    assert_eq!(message, "add users table\n\n[cairn up users]");

    // The directive drives the next migrate
    project.cairn().args(&["migrate"]).passes();
    assert_eq!(project.applied(), vec!["up users"]);
}

#[test]
fn hook_leaves_existing_directives_alone() {
    let project = Project::empty();
    project.commit("initial");
    project.migration("users");
    project.git(&["add", "-A"]);
    project.file("MSG", "add users\n\n[cairn down legacy]\n");

    project
        .cairn_no_db()
        .args(&["prepare-commit-msg", "MSG", "message"])
        .passes();
    assert_eq!(project.read("MSG"), "add users\n\n[cairn down legacy]\n");
}

#[test]
fn amend_is_skipped() {
    let project = Project::empty();
    project.commit("initial");
    project.migration("users");
    project.git(&["add", "-A"]);
    project.file("MSG", "add users\n");

    project
        .cairn_no_db()
        .args(&["prepare-commit-msg", "MSG", "commit", "HEAD"])
        .passes();
    assert_eq!(project.read("MSG"), "add users\n");
}

#[test]
fn directive_goes_above_git_comments() {
    let project = Project::empty();
    project.commit("initial");
    project.migration("orders");
    project.git(&["add", "-A"]);
    project.file("MSG", "add orders\n# Please enter the commit message\n");

    project
        .cairn_no_db()
        .args(&["prepare-commit-msg", "MSG"])
        .passes();
    assert_eq!(
        project.read("MSG"),
        "add orders\n\n[cairn up orders]\n\n# Please enter the commit message\n"
    );
}
