// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git history adapters

mod cli;
mod records;

pub use cli::GitCli;
pub use records::{CommitRecord, RecordReader, RECORD_MARK};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeGit, GitCall};

use async_trait::async_trait;
use cairn_core::{Commit, CommitSequence, Config, ConfigError, ParseError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from git operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error("the repository has no commits yet")]
    NoCommits,
    #[error("commit {0} does not exist in this repository (is this a shallow clone?)")]
    UnknownCommit(String),
    #[error("invalid directive in commit {commit}: {source}")]
    Parse {
        commit: String,
        #[source]
        source: ParseError,
    },
    #[error("invalid configuration in commit {commit}: {source}")]
    Config {
        commit: String,
        #[source]
        source: ConfigError,
    },
    #[error("{0}")]
    CommandFailed(String),
    #[error("git I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read access to the repository history.
#[async_trait]
pub trait GitAdapter: Clone + Send + Sync + 'static {
    /// Current HEAD, or `None` when the repository has no commits.
    async fn head(&self) -> Result<Option<Commit>, GitError>;

    /// Commits between `since` and HEAD, oldest first, with their tasks
    /// parsed.
    ///
    /// Walks forward when `since` is absent or an ancestor of HEAD. When
    /// HEAD is behind `since`, returns the commits HEAD has not reached yet,
    /// marked reversed. An empty repository yields an empty sequence.
    async fn new_commits(&self, since: Option<&Commit>) -> Result<CommitSequence, GitError>;

    /// Fetch the raw message of a commit.
    async fn read_message(&self, id: &str) -> Result<String, GitError>;

    /// The configuration file as committed in `commit`, if it has one.
    async fn config_at(&self, commit: &Commit) -> Result<Option<Config>, GitError>;

    /// Files under `dir` that are staged as newly added.
    async fn staged_added_files(&self, dir: &Path) -> Result<Vec<PathBuf>, GitError>;

    /// HEAD, failing with [`GitError::NoCommits`] for an empty repository.
    async fn require_head(&self) -> Result<Commit, GitError> {
        self.head().await?.ok_or(GitError::NoCommits)
    }

    /// Load a commit's message once; later calls reuse the stored value.
    async fn load_message(&self, commit: &Commit) -> Result<String, GitError> {
        if let Some(message) = commit.message() {
            return Ok(message.to_string());
        }
        let message = self.read_message(commit.id()).await?;
        Ok(commit.set_message(message).to_string())
    }
}

/// Build a commit from a log record, parsing its directives.
pub(crate) fn parse_commit(id: String, message: String) -> Result<Commit, GitError> {
    Commit::parse(id.clone(), message).map_err(|source| GitError::Parse { commit: id, source })
}
