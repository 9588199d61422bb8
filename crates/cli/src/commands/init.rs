// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cairn init`: configuration, commit hook and migration table

use anyhow::{Context, Result};
use cairn_core::{Config, CONFIG_FILE};
use std::path::{Path, PathBuf};

use super::Workspace;

/// Marks a hook file as ours, so re-running init may replace it
const HOOK_MARKER: &str = "# cairn prepare-commit-msg hook";
const HOOK_NAME: &str = "prepare-commit-msg";

#[derive(clap::Args)]
pub struct InitArgs {
    /// Skip installing the prepare-commit-msg hook
    #[arg(long)]
    pub no_hook: bool,
}

pub async fn handle(args: InitArgs, workspace: &Workspace) -> Result<()> {
    let repo = workspace.repo();
    let config = match Config::load(repo)? {
        Some(config) => config,
        None => {
            let config = Config::default();
            write_config(repo, &config)?;
            println!("Wrote {}", CONFIG_FILE);
            config
        }
    };

    let dir = repo.join(&config.migration_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    if !args.no_hook {
        let hooks = workspace.git().hooks_dir().await?;
        let exe = std::env::current_exe().context("failed to locate the cairn executable")?;
        match install_hook(&hooks, &exe)? {
            HookInstall::Written(path) => println!("Installed {}", path.display()),
            HookInstall::Foreign(path) => eprintln!(
                "warning: {} exists and was not written by cairn; leaving it alone",
                path.display()
            ),
        }
    }

    if workspace.db().is_some() {
        let store = workspace.store().await?;
        store.close().await?;
        println!("Migration table ready");
    }
    Ok(())
}

fn write_config(repo: &Path, config: &Config) -> Result<()> {
    let path = repo.join(CONFIG_FILE);
    let mut json = config.to_json()?;
    json.push('\n');
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))
}

#[derive(Debug, PartialEq)]
pub(crate) enum HookInstall {
    Written(PathBuf),
    /// A hook not written by cairn is already in place
    Foreign(PathBuf),
}

pub(crate) fn hook_script(exe: &Path) -> String {
    let exe = exe.display().to_string().replace('\'', r"'\''");
    format!(
        "#!/bin/sh\n{}\nexec '{}' prepare-commit-msg \"$@\"\n",
        HOOK_MARKER, exe
    )
}

pub(crate) fn install_hook(hooks: &Path, exe: &Path) -> Result<HookInstall> {
    let path = hooks.join(HOOK_NAME);
    match std::fs::read_to_string(&path) {
        Ok(existing) if !existing.contains(HOOK_MARKER) => {
            return Ok(HookInstall::Foreign(path));
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    }

    std::fs::create_dir_all(hooks)
        .with_context(|| format!("failed to create {}", hooks.display()))?;
    std::fs::write(&path, hook_script(exe))
        .with_context(|| format!("failed to write {}", path.display()))?;
    make_executable(&path)?;
    Ok(HookInstall::Written(path))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
