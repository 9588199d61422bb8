// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::{MigrationStore, StoreError};
use async_trait::async_trait;
use cairn_core::Task;
use tracing::Instrument;

/// Wrapper that adds tracing to any MigrationStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
    backend: &'static str,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S, backend: &'static str) -> Self {
        Self { inner, backend }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: MigrationStore> MigrationStore for TracedStore<S> {
    async fn init(&self) -> Result<(), StoreError> {
        let result = self.inner.init().await;
        match &result {
            Ok(()) => tracing::debug!(backend = self.backend, "schema ready"),
            Err(e) => tracing::error!(backend = self.backend, error = %e, "init failed"),
        }
        result
    }

    async fn last_migration_task(&self) -> Result<Option<Task>, StoreError> {
        let result = self.inner.last_migration_task().await;
        match &result {
            Ok(Some(task)) => tracing::debug!(task = %task, id = task.id, "last migration"),
            Ok(None) => tracing::debug!("no migration applied yet"),
            Err(e) => tracing::error!(error = %e, "last_migration_task failed"),
        }
        result
    }

    async fn last_task_for(&self, name: &str) -> Result<Option<Task>, StoreError> {
        let result = self.inner.last_task_for(name).await;
        if let Err(ref e) = result {
            tracing::error!(name, error = %e, "last_task_for failed");
        }
        result
    }

    async fn begin_migration_task(&self, task: &mut Task) -> Result<(), StoreError> {
        let span = tracing::info_span!(
            "store.begin",
            backend = self.backend,
            name = task.name(),
            direction = task.direction.as_str()
        );
        async {
            let start = std::time::Instant::now();
            let result = self.inner.begin_migration_task(task).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(id = task.id, elapsed_ms, "registered"),
                Err(StoreError::PendingMigration) => {
                    tracing::info!(elapsed_ms, "another task is pending")
                }
                Err(e) => tracing::error!(elapsed_ms, error = %e, "registration failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn finish_migration_task(&self, task: &Task) -> Result<(), StoreError> {
        let result = self.inner.finish_migration_task(task).await;
        tracing::info_span!("store.finish", backend = self.backend, id = task.id).in_scope(
            || match &result {
                Ok(()) => tracing::info!(task = %task, "finalized"),
                Err(e) => tracing::error!(task = %task, error = %e, "finalize failed"),
            },
        );
        result
    }

    async fn has_pending_migration(&self) -> Result<bool, StoreError> {
        let result = self.inner.has_pending_migration().await;
        match &result {
            Ok(pending) => tracing::trace!(pending, "checked pending"),
            Err(e) => tracing::error!(error = %e, "has_pending_migration failed"),
        }
        result
    }

    async fn close(&self) -> Result<(), StoreError> {
        let result = self.inner.close().await;
        if let Err(ref e) = result {
            tracing::warn!(backend = self.backend, error = %e, "close failed");
        }
        result
    }

    async fn check_if_task_can_execute(&self, task: &Task) -> Result<(), StoreError> {
        let result = self.inner.check_if_task_can_execute(task).await;
        if let Err(ref e) = result {
            tracing::warn!(task = %task, error = %e, "task cannot run");
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
