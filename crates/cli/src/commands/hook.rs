// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cairn prepare-commit-msg`: invoked by git as a hook

use anyhow::Result;
use cairn_engine::{prepare_commit_message, MessageSource, PrepareOutcome};
use std::path::PathBuf;

use super::Workspace;

#[derive(clap::Args)]
pub struct HookArgs {
    /// File holding the commit message being prepared
    pub file: PathBuf,

    /// Source of the message (message, template, merge, squash, commit)
    pub source: Option<String>,

    /// Commit being reused, for the `commit` source
    pub sha: Option<String>,
}

pub async fn handle(args: HookArgs, workspace: &Workspace) -> Result<()> {
    let source = parse_source(args.source.as_deref());
    let git = workspace.git();
    let outcome = prepare_commit_message(&git, workspace.repo(), &args.file, source).await?;
    match outcome {
        PrepareOutcome::Appended(tasks) => {
            tracing::debug!(directives = %tasks, "commit message updated")
        }
        other => tracing::debug!(outcome = ?other, "commit message left unchanged"),
    }
    Ok(())
}

/// Unrecognised sources are treated as a plain message; git may add new ones.
fn parse_source(source: Option<&str>) -> Option<MessageSource> {
    let source = source.filter(|s| !s.is_empty())?;
    match source.parse() {
        Ok(source) => Some(source),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;
