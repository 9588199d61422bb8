// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where the database stands relative to the repository

use crate::RunError;
use cairn_adapters::{GitAdapter, GitError};
use cairn_core::{Commit, CommitSequence, Task, TaskList};
use cairn_storage::MigrationStore;

/// Snapshot of repository and database state, rebuilt on every query.
#[derive(Debug, Clone)]
pub struct Status {
    /// Current HEAD; `None` for a repository without commits
    pub head: Option<Commit>,
    /// Commits since the last applied task's HEAD
    pub new_commits: CommitSequence,
    /// Most recently finalized task
    pub last_task: Option<Task>,
}

impl Status {
    /// Tasks to run in order, inverted when HEAD has moved backwards.
    pub fn tasks_to_execute(&self) -> TaskList {
        self.new_commits.tasks_to_execute()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.tasks_to_execute().is_empty()
    }
}

/// Resolve the current [`Status`].
///
/// The history walk starts at the HEAD recorded with the last applied task.
/// Subjects of the commits involved are loaded for display; commits that
/// no longer exist (garbage collected) are logged and left without one.
pub async fn get_status<G, S>(git: &G, store: &S) -> Result<Status, RunError>
where
    G: GitAdapter,
    S: MigrationStore + ?Sized,
{
    let last_task = store.last_migration_task().await?;
    let since = last_task.as_ref().and_then(|t| t.head.as_ref());
    let new_commits = git.new_commits(since).await?;
    let head = git.head().await?;

    let mut to_load: Vec<&Commit> = Vec::new();
    if let Some(task) = &last_task {
        to_load.extend(task.commit.iter());
        to_load.extend(task.head.iter());
    }
    to_load.extend(head.iter());
    for commit in to_load {
        match git.load_message(commit).await {
            Ok(_) => {}
            Err(GitError::UnknownCommit(id)) => {
                tracing::warn!(commit = %id, "commit no longer exists; subject unavailable");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::debug!(
        head = head.as_ref().map(Commit::short_id),
        new_commits = new_commits.len(),
        reversed = new_commits.is_reversed,
        "resolved status"
    );
    Ok(Status {
        head,
        new_commits,
        last_task,
    })
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
