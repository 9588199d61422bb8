//! `cairn generate`

use crate::prelude::*;

#[test]
fn creates_named_manifest() {
    let project = Project::empty();
    project
        .cairn_no_db()
        .args(&["generate", "--name", "users"])
        .passes()
        .stdout_eq("Created migrations/users.toml\n");
    let body = project.read("migrations/users.toml");
    assert!(body.contains("users"), "{body}");

    project
        .cairn_no_db()
        .args(&["generate", "--name", "users"])
        .fails()
        .stderr_has("users.toml");
}

#[test]
fn default_name_is_a_uuid() {
    let project = Project::empty();
    let out = project
        .cairn_no_db()
        .args(&["generate"])
        .passes()
        .stdout();
    let name = out
        .trim()
        .strip_prefix("Created migrations/")
        .and_then(|s| s.strip_suffix(".toml"))
        .unwrap();
    assert_eq!(name.len(), 36, "{name}");
    assert_eq!(name.matches('-').count(), 4, "{name}");
}

#[test]
fn uses_template() {
    let project = Project::empty();
    project.file("tpl.toml", "# {name}\nup = \"true\"\n");
    project
        .cairn_no_db()
        .args(&["generate", "--name", "seed", "--template", "tpl.toml"])
        .passes();
    assert_eq!(project.read("migrations/seed.toml"), "# seed\nup = \"true\"\n");

    project
        .cairn_no_db()
        .args(&["generate", "--template", "missing.toml"])
        .fails()
        .stderr_has("missing.toml");
}
