// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row layout shared by the SQL backends

use crate::StoreError;
use cairn_core::{Commit, Direction, Migration, Task};
use chrono::{DateTime, Utc};

/// Name of the migration table.
pub const TABLE: &str = "cairn_meta";

/// One row of `cairn_meta`, as read back from a backend.
#[derive(Debug, Clone)]
pub(crate) struct TaskRow {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub commit: Option<String>,
    pub head: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
}

impl TaskRow {
    pub fn into_task(self) -> Result<Task, StoreError> {
        let direction: Direction = self.kind.parse().map_err(|_| StoreError::CorruptRow {
            id: self.id,
            reason: format!("unknown type '{}'", self.kind),
        })?;
        Ok(Task {
            id: Some(self.id),
            direction,
            migration: Migration::new(self.name),
            commit: self.commit.map(Commit::new),
            head: self.head.map(Commit::new),
            applied_at: self.applied_at,
        })
    }
}

/// Values written when a task is finalized.
#[derive(Debug, Clone)]
pub(crate) struct Completion {
    pub id: i64,
    pub applied_at: DateTime<Utc>,
    pub head: Option<String>,
    pub commit: Option<String>,
}

impl Completion {
    pub fn of(task: &Task) -> Result<Self, StoreError> {
        let id = task.id.ok_or_else(|| StoreError::TaskNotRegistered {
            name: task.to_string(),
        })?;
        Ok(Self {
            id,
            applied_at: task.applied_at.unwrap_or_else(Utc::now),
            head: task.head.as_ref().map(|c| c.id().to_string()),
            commit: task.commit.as_ref().map(|c| c.id().to_string()),
        })
    }
}

#[cfg(test)]
#[path = "row_tests.rs"]
mod tests;
