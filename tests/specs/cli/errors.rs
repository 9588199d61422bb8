//! Error reporting and exit codes.

use crate::prelude::*;

#[test]
fn missing_database_url_is_reported() {
    let project = Project::empty();
    project.commit("initial");
    project
        .cairn_no_db()
        .args(&["migrate"])
        .fails()
        .stderr_has("Error: ");
}

#[test]
fn unsupported_scheme_is_reported() {
    let project = Project::empty();
    project.commit("initial");
    project
        .cairn_no_db()
        .args(&["--db", "mysql://localhost/app", "migrate"])
        .fails()
        .stderr_has("mysql");
}

#[test]
fn database_url_is_read_from_the_environment() {
    let project = Project::empty();
    project.commit("initial");
    project
        .cairn_no_db()
        .env("CAIRN_DB", project.db_url())
        .args(&["migrate"])
        .passes()
        .stdout_eq("Database is up to date.\n");
}

#[test]
fn malformed_directive_names_the_commit() {
    let project = Project::empty();
    let id = project.commit("broken\n\n[cairn sideways a]");
    project
        .cairn()
        .args(&["migrate"])
        .fails()
        .stderr_has(&id)
        .stderr_has("sideways");
}

#[test]
fn failing_script_reports_migration_and_exit() {
    let project = Project::empty();
    project.file("migrations/boom.toml", "up = \"echo kaput >&2; exit 4\"\n");
    let id = project.commit("boom\n\n[cairn up boom]");
    project
        .cairn()
        .args(&["migrate"])
        .fails()
        .stderr_has(&format!("up boom (from commit {}): ", &id[..7]))
        .stderr_has("kaput");
}

#[test]
fn down_before_up_is_rejected() {
    let project = Project::empty();
    project.migration("users");
    project.commit("users");
    project
        .cairn()
        .args(&["down", "users"])
        .fails()
        .stderr_has("never run up");
    assert!(project.applied().is_empty());
}
