// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PostgreSQL backend.
//!
//! Registration takes `LOCK TABLE ... IN EXCLUSIVE MODE` inside its
//! transaction. Readers are not blocked; a second registrant waits for the
//! first to commit and then sees its pending row.

use crate::row::{Completion, TaskRow};
use crate::{MigrationStore, StoreError};
use async_trait::async_trait;
use cairn_core::{check_sequence, Task};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, GenericClient, NoTls, Row};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cairn_meta (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('up', 'down')),
    "commit" TEXT,
    head TEXT,
    applied_at TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS cairn_meta_name ON cairn_meta (name);
"#;

const SELECT: &str = r#"SELECT id, name, type, "commit", head, applied_at FROM cairn_meta"#;

/// Migration table in a PostgreSQL database.
pub struct PostgresStore {
    client: Mutex<Option<Client>>,
    connection: JoinHandle<()>,
}

impl PostgresStore {
    /// Connect using a libpq-style URL (`postgres://user@host/db`).
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(url, NoTls).await?;
        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgres connection closed with error");
            }
        });
        Ok(Self {
            client: Mutex::new(Some(client)),
            connection,
        })
    }
}

impl Drop for PostgresStore {
    fn drop(&mut self) {
        self.connection.abort();
    }
}

fn read_row(row: &Row) -> Result<TaskRow, StoreError> {
    Ok(TaskRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        kind: row.try_get("type")?,
        commit: row.try_get("commit")?,
        head: row.try_get("head")?,
        applied_at: row.try_get("applied_at")?,
    })
}

async fn last_finalized<C: GenericClient + Sync>(
    client: &C,
    name: Option<&str>,
) -> Result<Option<Task>, StoreError> {
    let order = "ORDER BY applied_at DESC, id DESC LIMIT 1";
    let row = match name {
        Some(name) => {
            let sql = format!("{SELECT} WHERE name = $1 AND applied_at IS NOT NULL {order}");
            client.query_opt(&sql, &[&name]).await?
        }
        None => {
            let sql = format!("{SELECT} WHERE applied_at IS NOT NULL {order}");
            client.query_opt(&sql, &[]).await?
        }
    };
    row.as_ref()
        .map(read_row)
        .transpose()?
        .map(TaskRow::into_task)
        .transpose()
}

async fn has_pending<C: GenericClient + Sync>(client: &C) -> Result<bool, StoreError> {
    let row = client
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM cairn_meta WHERE applied_at IS NULL)",
            &[],
        )
        .await?;
    Ok(row.try_get(0)?)
}

/// Concurrent `CREATE ... IF NOT EXISTS` can still collide in the catalog.
fn is_duplicate_object(err: &tokio_postgres::Error) -> bool {
    matches!(
        err.code(),
        Some(code) if *code == SqlState::UNIQUE_VIOLATION
            || *code == SqlState::DUPLICATE_OBJECT
            || *code == SqlState::DUPLICATE_TABLE
    )
}

#[async_trait]
impl MigrationStore for PostgresStore {
    async fn init(&self) -> Result<(), StoreError> {
        let guard = self.client.lock().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        match client.batch_execute(SCHEMA).await {
            Ok(()) => Ok(()),
            Err(e) if is_duplicate_object(&e) => {
                tracing::debug!(error = %e, "schema created concurrently");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn last_migration_task(&self) -> Result<Option<Task>, StoreError> {
        let guard = self.client.lock().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        last_finalized(client, None).await
    }

    async fn last_task_for(&self, name: &str) -> Result<Option<Task>, StoreError> {
        let guard = self.client.lock().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        last_finalized(client, Some(name)).await
    }

    async fn begin_migration_task(&self, task: &mut Task) -> Result<(), StoreError> {
        let mut guard = self.client.lock().await;
        let client = guard.as_mut().ok_or(StoreError::Closed)?;
        let tx = client.transaction().await?;
        tx.batch_execute("LOCK TABLE cairn_meta IN EXCLUSIVE MODE")
            .await?;
        if has_pending(&tx).await? {
            tx.rollback().await?;
            return Err(StoreError::PendingMigration);
        }
        let last = last_finalized(&tx, Some(task.name())).await?;
        check_sequence(last.as_ref(), task)?;
        let commit = task.commit.as_ref().map(|c| c.id().to_string());
        let row = tx
            .query_one(
                r#"INSERT INTO cairn_meta (name, type, "commit") VALUES ($1, $2, $3) RETURNING id"#,
                &[&task.name(), &task.direction.as_str(), &commit],
            )
            .await?;
        let id: i64 = row.try_get(0)?;
        tx.commit().await?;
        task.id = Some(id);
        Ok(())
    }

    async fn finish_migration_task(&self, task: &Task) -> Result<(), StoreError> {
        let done = Completion::of(task)?;
        let guard = self.client.lock().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let updated = client
            .execute(
                r#"UPDATE cairn_meta
                   SET applied_at = $1, head = $2, "commit" = COALESCE($3, "commit")
                   WHERE id = $4"#,
                &[&done.applied_at, &done.head, &done.commit, &done.id],
            )
            .await?;
        if updated == 0 {
            return Err(StoreError::TaskNotRegistered {
                name: task.to_string(),
            });
        }
        Ok(())
    }

    async fn has_pending_migration(&self) -> Result<bool, StoreError> {
        let guard = self.client.lock().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        has_pending(client).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        // Dropping the client ends the connection task
        self.client.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
#[path = "postgres_tests.rs"]
mod tests;
