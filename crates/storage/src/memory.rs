// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{MigrationStore, StoreError};
use async_trait::async_trait;
use cairn_core::{check_sequence, Commit, Direction, Task};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Init,
    LastMigrationTask,
    LastTaskFor { name: String },
    Begin { name: String, direction: Direction },
    Finish { id: Option<i64> },
    HasPending,
    Close,
}

#[derive(Default)]
struct MemoryState {
    rows: Vec<Task>,
    next_id: i64,
    /// Names whose registration loses a race to another process
    contested: HashSet<String>,
    closed: bool,
    calls: Vec<StoreCall>,
}

impl MemoryState {
    fn open(&self) -> Result<(), StoreError> {
        if self.closed {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn last_finalized(&self, name: Option<&str>) -> Option<Task> {
        self.rows
            .iter()
            .filter(|t| t.is_applied() && name.map_or(true, |n| t.name() == n))
            .max_by_key(|t| (t.applied_at, t.id))
            .cloned()
    }

    fn insert(&mut self, task: &Task) -> i64 {
        self.next_id += 1;
        let mut row = task.clone();
        row.id = Some(self.next_id);
        row.applied_at = None;
        row.head = None;
        self.rows.push(row);
        self.next_id
    }
}

/// In-memory migration table that records every call.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending row as if another process had started a task.
    pub fn insert_foreign_pending(&self, task: Task) -> i64 {
        self.inner.lock().insert(&task)
    }

    /// Finalize a row directly, as another process would.
    pub fn complete_row(&self, id: i64, head: Option<Commit>) {
        let mut inner = self.inner.lock();
        if let Some(row) = inner.rows.iter_mut().find(|t| t.id == Some(id)) {
            row.applied_at = Some(Utc::now());
            row.head = head;
        }
    }

    /// Add a finalized row without going through registration.
    pub fn seed(&self, task: Task) -> i64 {
        let mut inner = self.inner.lock();
        let id = inner.insert(&task);
        if let Some(row) = inner.rows.last_mut() {
            row.applied_at = Some(task.applied_at.unwrap_or_else(Utc::now));
            row.head = task.head;
        }
        id
    }

    /// Make the next registration of `name` fail with `PendingMigration`,
    /// as if another process had a row pending at that moment.
    pub fn contest(&self, name: &str) {
        self.inner.lock().contested.insert(name.to_string());
    }

    pub fn rows(&self) -> Vec<Task> {
        self.inner.lock().rows.clone()
    }

    /// Finalized rows in completion order, as `(direction, name)`
    pub fn applied(&self) -> Vec<(Direction, String)> {
        let mut rows: Vec<Task> = self
            .inner
            .lock()
            .rows
            .iter()
            .filter(|t| t.is_applied())
            .cloned()
            .collect();
        rows.sort_by_key(|t| (t.applied_at, t.id));
        rows.into_iter()
            .map(|t| (t.direction, t.migration.name))
            .collect()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl MigrationStore for MemoryStore {
    async fn init(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Init);
        inner.open()
    }

    async fn last_migration_task(&self) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::LastMigrationTask);
        inner.open()?;
        Ok(inner.last_finalized(None))
    }

    async fn last_task_for(&self, name: &str) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::LastTaskFor {
            name: name.to_string(),
        });
        inner.open()?;
        Ok(inner.last_finalized(Some(name)))
    }

    async fn begin_migration_task(&self, task: &mut Task) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Begin {
            name: task.name().to_string(),
            direction: task.direction,
        });
        inner.open()?;
        if inner.contested.remove(task.name()) || inner.rows.iter().any(Task::is_pending) {
            return Err(StoreError::PendingMigration);
        }
        check_sequence(inner.last_finalized(Some(task.name())).as_ref(), task)?;
        task.id = Some(inner.insert(task));
        Ok(())
    }

    async fn finish_migration_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Finish { id: task.id });
        inner.open()?;
        let not_registered = || StoreError::TaskNotRegistered {
            name: task.to_string(),
        };
        let id = task.id.ok_or_else(not_registered)?;
        let row = inner
            .rows
            .iter_mut()
            .find(|t| t.id == Some(id))
            .ok_or_else(not_registered)?;
        row.applied_at = Some(task.applied_at.unwrap_or_else(Utc::now));
        row.head = task.head.clone();
        if let Some(commit) = &task.commit {
            row.commit = Some(Commit::new(commit.id()));
        }
        Ok(())
    }

    async fn has_pending_migration(&self) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::HasPending);
        inner.open()?;
        Ok(inner.rows.iter().any(Task::is_pending))
    }

    async fn close(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Close);
        inner.closed = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
