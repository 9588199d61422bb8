// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commits and commit sequences

use crate::directive::{self, ParseError};
use crate::task::{Task, TaskList};
use std::fmt;
use std::sync::OnceLock;

/// Length of the abbreviated hash used in output.
pub const SHORT_ID_LEN: usize = 7;

/// A single revision.
///
/// The message is optional because commits read back from storage only
/// carry their hash; it is loaded on demand and memoized, so it is fetched
/// at most once per value.
#[derive(Debug, Clone)]
pub struct Commit {
    id: String,
    message: OnceLock<String>,
    tasks: Vec<Task>,
}

impl Commit {
    /// A commit known only by its hash.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: OnceLock::new(),
            tasks: Vec::new(),
        }
    }

    /// Build a commit from its message, extracting any directives in it.
    ///
    /// Every extracted task points back at this commit.
    pub fn parse(id: impl Into<String>, message: impl Into<String>) -> Result<Self, ParseError> {
        let id = id.into();
        let message = message.into();
        let parsed = directive::parse(&message)?;
        let tasks = parsed
            .tasks
            .into_iter()
            .map(|task| task.with_commit(Commit::new(id.clone())))
            .collect();
        let cell = OnceLock::new();
        let _ = cell.set(message);
        Ok(Self {
            id,
            message: cell,
            tasks,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.get().map(String::as_str)
    }

    /// Store the message unless one is already loaded; returns the stored one.
    pub fn set_message(&self, message: String) -> &str {
        self.message.get_or_init(|| message)
    }

    /// First line of the message, if loaded.
    pub fn subject(&self) -> Option<&str> {
        self.message().map(|m| m.lines().next().unwrap_or_default())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Commit {}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_id())?;
        if let Some(subject) = self.subject() {
            write!(f, " \"{}\"", subject)?;
        }
        Ok(())
    }
}

/// Commits in chronological order, oldest first.
///
/// `is_reversed` marks history that HEAD has moved behind: the commits are
/// listed in the same order as a forward walk, but their tasks must be run
/// inverted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitSequence {
    pub commits: Vec<Commit>,
    pub is_reversed: bool,
}

impl CommitSequence {
    pub fn forward(commits: Vec<Commit>) -> Self {
        Self {
            commits,
            is_reversed: false,
        }
    }

    pub fn reversed(commits: Vec<Commit>) -> Self {
        Self {
            commits,
            is_reversed: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Commit> {
        self.commits.iter()
    }

    /// Tasks to run, in commit order then directive order.
    ///
    /// For a reversed sequence each task is inverted; the commit order is
    /// kept as-is.
    pub fn tasks_to_execute(&self) -> TaskList {
        self.commits
            .iter()
            .flat_map(|commit| commit.tasks().iter())
            .map(|task| {
                if self.is_reversed {
                    task.invert()
                } else {
                    task.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "commit_tests.rs"]
mod tests;
