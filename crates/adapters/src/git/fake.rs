// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake git adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{parse_commit, GitAdapter, GitError};
use async_trait::async_trait;
use cairn_core::{Commit, CommitSequence, Config};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded git call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Head,
    NewCommits { since: Option<String> },
    ReadMessage { id: String },
    ConfigAt { id: String },
    StagedAddedFiles { dir: PathBuf },
}

struct FakeGitState {
    /// Linear history, oldest first
    history: Vec<(String, String)>,
    head: Option<usize>,
    configs: HashMap<String, Config>,
    /// Commits whose objects are gone (garbage collected)
    forgotten: HashSet<String>,
    staged: Vec<PathBuf>,
    calls: Vec<GitCall>,
}

/// Fake git adapter over a single linear history.
///
/// Commit ids are `c1`, `c2`, ... in creation order. Moving HEAD back with
/// [`FakeGit::reset_to`] keeps later commits reachable by id, like a
/// `git reset` in a real repository.
#[derive(Clone)]
pub struct FakeGit {
    inner: Arc<Mutex<FakeGitState>>,
}

impl Default for FakeGit {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeGitState {
                history: Vec::new(),
                head: None,
                configs: HashMap::new(),
                forgotten: HashSet::new(),
                staged: Vec::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit after the current HEAD and move HEAD to it.
    ///
    /// Any commits after HEAD are discarded, as if a new branch tip
    /// replaced them.
    pub fn commit(&self, message: &str) -> String {
        let mut inner = self.inner.lock();
        let keep = inner.head.map_or(0, |h| h + 1);
        inner.history.truncate(keep);
        let id = format!("c{}", inner.history.len() + 1);
        inner.history.push((id.clone(), message.to_string()));
        inner.head = Some(inner.history.len() - 1);
        id
    }

    /// Move HEAD to an existing commit.
    pub fn reset_to(&self, id: &str) {
        let mut inner = self.inner.lock();
        if let Some(pos) = inner.history.iter().position(|(c, _)| c == id) {
            inner.head = Some(pos);
        }
    }

    /// Attach a committed configuration file to a commit.
    pub fn set_config(&self, id: &str, config: Config) {
        self.inner.lock().configs.insert(id.to_string(), config);
    }

    /// Make a commit unreadable, as if garbage collected.
    pub fn forget(&self, id: &str) {
        self.inner.lock().forgotten.insert(id.to_string());
    }

    pub fn stage(&self, path: impl Into<PathBuf>) {
        self.inner.lock().staged.push(path.into());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<GitCall> {
        self.inner.lock().calls.clone()
    }

    fn position(inner: &FakeGitState, id: &str) -> Option<usize> {
        if inner.forgotten.contains(id) {
            return None;
        }
        inner.history.iter().position(|(c, _)| c == id)
    }
}

#[async_trait]
impl GitAdapter for FakeGit {
    async fn head(&self) -> Result<Option<Commit>, GitError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::Head);
        Ok(inner.head.map(|h| Commit::new(inner.history[h].0.clone())))
    }

    async fn new_commits(&self, since: Option<&Commit>) -> Result<CommitSequence, GitError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::NewCommits {
            since: since.map(|c| c.id().to_string()),
        });
        let Some(head) = inner.head else {
            return Ok(CommitSequence::default());
        };
        let (range, reversed) = match since {
            None => (0..head + 1, false),
            Some(since) => {
                let pos = Self::position(&inner, since.id())
                    .ok_or_else(|| GitError::UnknownCommit(since.id().to_string()))?;
                if pos <= head {
                    (pos + 1..head + 1, false)
                } else {
                    (head + 1..pos + 1, true)
                }
            }
        };
        let commits = inner.history[range]
            .iter()
            .map(|(id, message)| parse_commit(id.clone(), message.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(if reversed {
            CommitSequence::reversed(commits)
        } else {
            CommitSequence::forward(commits)
        })
    }

    async fn read_message(&self, id: &str) -> Result<String, GitError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::ReadMessage { id: id.to_string() });
        let pos = Self::position(&inner, id).ok_or_else(|| GitError::UnknownCommit(id.to_string()))?;
        Ok(inner.history[pos].1.clone())
    }

    async fn config_at(&self, commit: &Commit) -> Result<Option<Config>, GitError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::ConfigAt {
            id: commit.id().to_string(),
        });
        if Self::position(&inner, commit.id()).is_none() {
            return Err(GitError::UnknownCommit(commit.id().to_string()));
        }
        Ok(inner.configs.get(commit.id()).cloned())
    }

    async fn staged_added_files(&self, dir: &Path) -> Result<Vec<PathBuf>, GitError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GitCall::StagedAddedFiles {
            dir: dir.to_path_buf(),
        });
        Ok(inner
            .staged
            .iter()
            .filter(|p| p.starts_with(dir))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
