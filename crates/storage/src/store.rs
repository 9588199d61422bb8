// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::StoreError;
use async_trait::async_trait;
use cairn_core::{check_sequence, Task};

/// Persistent record of which tasks ran and which one is in flight.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// Create the table if it does not exist. Safe to call concurrently.
    async fn init(&self) -> Result<(), StoreError>;

    /// Most recently finalized task, by completion time.
    async fn last_migration_task(&self) -> Result<Option<Task>, StoreError>;

    /// Most recently finalized task for one migration name.
    async fn last_task_for(&self, name: &str) -> Result<Option<Task>, StoreError>;

    /// Register `task` as pending and assign its id.
    ///
    /// The check for an existing pending row and the insert happen under one
    /// table lock. If another task is pending the insert is rolled back and
    /// [`StoreError::PendingMigration`] is returned. Sequencing is checked
    /// again under the same lock.
    async fn begin_migration_task(&self, task: &mut Task) -> Result<(), StoreError>;

    /// Record completion time, HEAD and trigger commit for a registered task.
    async fn finish_migration_task(&self, task: &Task) -> Result<(), StoreError>;

    /// Whether any registered task has no completion time.
    async fn has_pending_migration(&self) -> Result<bool, StoreError>;

    async fn close(&self) -> Result<(), StoreError>;

    /// Check that `task` may run given the last finalized task of the same
    /// name.
    async fn check_if_task_can_execute(&self, task: &Task) -> Result<(), StoreError> {
        let last = self.last_task_for(task.name()).await?;
        check_sequence(last.as_ref(), task)?;
        Ok(())
    }
}

#[async_trait]
impl<S: MigrationStore + ?Sized> MigrationStore for Box<S> {
    async fn init(&self) -> Result<(), StoreError> {
        (**self).init().await
    }

    async fn last_migration_task(&self) -> Result<Option<Task>, StoreError> {
        (**self).last_migration_task().await
    }

    async fn last_task_for(&self, name: &str) -> Result<Option<Task>, StoreError> {
        (**self).last_task_for(name).await
    }

    async fn begin_migration_task(&self, task: &mut Task) -> Result<(), StoreError> {
        (**self).begin_migration_task(task).await
    }

    async fn finish_migration_task(&self, task: &Task) -> Result<(), StoreError> {
        (**self).finish_migration_task(task).await
    }

    async fn has_pending_migration(&self) -> Result<bool, StoreError> {
        (**self).has_pending_migration().await
    }

    async fn close(&self) -> Result<(), StoreError> {
        (**self).close().await
    }

    async fn check_if_task_can_execute(&self, task: &Task) -> Result<(), StoreError> {
        (**self).check_if_task_can_execute(task).await
    }
}
