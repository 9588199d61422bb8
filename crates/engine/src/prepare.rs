// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `prepare-commit-msg` hook: add directives for newly staged migrations.

use cairn_adapters::{GitAdapter, GitError};
use cairn_core::{directive, Config, ConfigError, ParseError, Task, TaskList};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors from the commit message hook
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("commit message has an invalid directive: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Where the commit message came from, as git passes it to the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Message,
    Template,
    Merge,
    Squash,
    /// Reusing an existing commit (`--amend`, `-c`, `-C`)
    Commit,
}

impl FromStr for MessageSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageSource::Message),
            "template" => Ok(MessageSource::Template),
            "merge" => Ok(MessageSource::Merge),
            "squash" => Ok(MessageSource::Squash),
            "commit" => Ok(MessageSource::Commit),
            other => Err(format!("unknown commit message source '{}'", other)),
        }
    }
}

impl MessageSource {
    /// Merges, squashes and amends carry directives from their own commits.
    fn reuses_history(self) -> bool {
        matches!(
            self,
            MessageSource::Merge | MessageSource::Squash | MessageSource::Commit
        )
    }
}

/// What the hook did
#[derive(Debug, Clone, PartialEq)]
pub enum PrepareOutcome {
    Appended(TaskList),
    SkippedSource(MessageSource),
    AlreadyHasDirectives,
    NoNewMigrations,
}

/// Append an `up` directive for every migration newly staged under the
/// configured migration directory.
pub async fn prepare_commit_message<G: GitAdapter>(
    git: &G,
    repo: &Path,
    message_file: &Path,
    source: Option<MessageSource>,
) -> Result<PrepareOutcome, PrepareError> {
    if let Some(source) = source.filter(|s| s.reuses_history()) {
        return Ok(PrepareOutcome::SkippedSource(source));
    }

    let message = std::fs::read_to_string(message_file).map_err(|source| PrepareError::Io {
        path: message_file.to_path_buf(),
        source,
    })?;
    if !directive::parse(&message)?.tasks.is_empty() {
        return Ok(PrepareOutcome::AlreadyHasDirectives);
    }

    let config = Config::load_or_default(repo)?;
    let staged = git.staged_added_files(&config.migration_dir).await?;
    let tasks = new_migrations(&staged);
    if tasks.is_empty() {
        return Ok(PrepareOutcome::NoNewMigrations);
    }

    let updated = insert_directives(&message, &tasks.to_string());
    std::fs::write(message_file, updated).map_err(|source| PrepareError::Io {
        path: message_file.to_path_buf(),
        source,
    })?;
    tracing::info!(count = tasks.len(), "added directives to commit message");
    Ok(PrepareOutcome::Appended(tasks))
}

/// One `up` task per distinct file stem, in staging order.
fn new_migrations(staged: &[PathBuf]) -> TaskList {
    let mut seen = Vec::new();
    for path in staged {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if !seen.iter().any(|s: &String| s == stem) {
                seen.push(stem.to_string());
            }
        }
    }
    seen.into_iter().map(Task::up).collect()
}

/// Place directives after the message body and before git's comment block.
fn insert_directives(message: &str, directives: &str) -> String {
    let lines: Vec<&str> = message.lines().collect();
    let split = lines
        .iter()
        .position(|l| l.starts_with('#'))
        .unwrap_or(lines.len());
    let body = lines[..split].join("\n");
    let body = body.trim_end();

    let mut out = String::new();
    if !body.is_empty() {
        out.push_str(body);
        out.push_str("\n\n");
    }
    out.push_str(directives);
    out.push('\n');
    if split < lines.len() {
        out.push('\n');
        out.push_str(&lines[split..].join("\n"));
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "prepare_tests.rs"]
mod tests;
