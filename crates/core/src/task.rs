// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration tasks: a direction bound to a named migration.

use crate::commit::Commit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which entry point of a migration to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction '{0}' (expected 'up' or 'down')")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("up") {
            Ok(Direction::Up)
        } else if s.eq_ignore_ascii_case("down") {
            Ok(Direction::Down)
        } else {
            Err(UnknownDirection(s.to_string()))
        }
    }
}

/// A named unit of database change.
///
/// Names are free-form; generated migrations use UUIDs so that branches
/// never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Migration {
    pub name: String,
}

impl Migration {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A directive bound to execution metadata.
///
/// A task is pending once storage has assigned it an id and applied once it
/// carries a completion timestamp. Tasks are values: [`Task::invert`] returns
/// a new task and never touches the original.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Option<i64>,
    pub direction: Direction,
    pub migration: Migration,
    /// Commit whose message carried the directive
    pub commit: Option<Commit>,
    /// HEAD at the time the task was finalized
    pub head: Option<Commit>,
    pub applied_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(direction: Direction, migration: Migration) -> Self {
        Self {
            id: None,
            direction,
            migration,
            commit: None,
            head: None,
            applied_at: None,
        }
    }

    pub fn up(name: impl Into<String>) -> Self {
        Self::new(Direction::Up, Migration::new(name))
    }

    pub fn down(name: impl Into<String>) -> Self {
        Self::new(Direction::Down, Migration::new(name))
    }

    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commit = Some(commit);
        self
    }

    pub fn name(&self) -> &str {
        self.migration.name()
    }

    pub fn is_pending(&self) -> bool {
        self.id.is_some() && self.applied_at.is_none()
    }

    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }

    /// Same task, opposite direction.
    pub fn invert(&self) -> Task {
        Task {
            direction: self.direction.inverted(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.direction.as_str().to_uppercase(),
            self.migration
        )
    }
}

/// Ordered collection of tasks.
///
/// `Display` renders the list in directive syntax, ready to be embedded in a
/// commit message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_vec(self) -> Vec<Task> {
        self.tasks
    }

    /// (direction, name) pairs in order, without execution metadata.
    pub fn directives(&self) -> Vec<(Direction, String)> {
        self.tasks
            .iter()
            .map(|t| (t.direction, t.migration.name.clone()))
            .collect()
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::directive::render(self))
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TaskList {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
