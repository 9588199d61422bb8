// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn script_execs_the_binary() {
    let script = hook_script(Path::new("/opt/cairn/bin/cairn"));
    assert!(script.starts_with("#!/bin/sh\n"));
    assert!(script.contains(HOOK_MARKER));
    assert!(script.ends_with("exec '/opt/cairn/bin/cairn' prepare-commit-msg \"$@\"\n"));
}

#[test]
fn script_quotes_awkward_paths() {
    let script = hook_script(Path::new("/home/o'neil/cairn"));
    assert!(script.contains(r"exec '/home/o'\''neil/cairn'"));
}

#[test]
fn installs_and_replaces_own_hook() {
    let dir = tempfile::tempdir().unwrap();
    let hooks = dir.path().join("hooks");

    let first = install_hook(&hooks, Path::new("/old/cairn")).unwrap();
    let path = hooks.join(HOOK_NAME);
    assert_eq!(first, HookInstall::Written(path.clone()));

    install_hook(&hooks, Path::new("/new/cairn")).unwrap();
    let script = std::fs::read_to_string(&path).unwrap();
    assert!(script.contains("/new/cairn"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn leaves_foreign_hook_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(HOOK_NAME);
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();

    let outcome = install_hook(dir.path(), Path::new("/usr/bin/cairn")).unwrap();
    assert_eq!(outcome, HookInstall::Foreign(path.clone()));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "#!/bin/sh\nexit 0\n");
}

#[tokio::test]
async fn writes_default_config_once() {
    let repo = tempfile::tempdir().unwrap();
    let workspace = Workspace::new(repo.path().to_path_buf(), None);
    handle(InitArgs { no_hook: true }, &workspace).await.unwrap();

    let config = Config::load(repo.path()).unwrap().unwrap();
    assert_eq!(config, Config::default());
    assert!(repo.path().join("migrations").is_dir());

    std::fs::write(
        repo.path().join(CONFIG_FILE),
        r#"{"migrationDir": "db"}"#,
    )
    .unwrap();
    handle(InitArgs { no_hook: true }, &workspace).await.unwrap();
    let config = Config::load(repo.path()).unwrap().unwrap();
    assert_eq!(config.migration_dir, PathBuf::from("db"));
    assert!(repo.path().join("db").is_dir());
}
