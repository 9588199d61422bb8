// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite backend.
//!
//! Registration runs in a `BEGIN IMMEDIATE` transaction, which takes the
//! database write lock up front; competing writers block on `busy_timeout`
//! until it is released. rusqlite is synchronous, so every call is moved to
//! the blocking pool.

use crate::row::{Completion, TaskRow};
use crate::{MigrationStore, StoreError};
use async_trait::async_trait;
use cairn_core::{check_sequence, Task};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cairn_meta (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('up', 'down')),
    "commit" TEXT,
    head TEXT,
    applied_at TEXT
);
CREATE INDEX IF NOT EXISTS cairn_meta_name ON cairn_meta (name);
"#;

const SELECT: &str = r#"SELECT id, name, type, "commit", head, applied_at FROM cairn_meta"#;

/// Migration table in a SQLite database file.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Option<Connection>>>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let conn = Connection::open(&path)?;
        conn.busy_timeout(crate::env::sqlite_busy_timeout())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            let conn = guard.as_mut().ok_or(StoreError::Closed)?;
            f(conn)
        })
        .await?
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        commit: row.get(3)?,
        head: row.get(4)?,
        applied_at: row.get(5)?,
    })
}

fn last_finalized(conn: &Connection, name: Option<&str>) -> Result<Option<Task>, StoreError> {
    let order = "ORDER BY applied_at DESC, id DESC LIMIT 1";
    let row = match name {
        Some(name) => conn
            .query_row(
                &format!("{SELECT} WHERE name = ?1 AND applied_at IS NOT NULL {order}"),
                [name],
                read_row,
            )
            .optional()?,
        None => conn
            .query_row(
                &format!("{SELECT} WHERE applied_at IS NOT NULL {order}"),
                [],
                read_row,
            )
            .optional()?,
    };
    row.map(TaskRow::into_task).transpose()
}

fn has_pending(conn: &Connection) -> Result<bool, StoreError> {
    Ok(conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM cairn_meta WHERE applied_at IS NULL)",
        [],
        |row| row.get(0),
    )?)
}

#[async_trait]
impl MigrationStore for SqliteStore {
    async fn init(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| Ok(conn.execute_batch(SCHEMA)?)).await
    }

    async fn last_migration_task(&self) -> Result<Option<Task>, StoreError> {
        self.with_conn(|conn| last_finalized(conn, None)).await
    }

    async fn last_task_for(&self, name: &str) -> Result<Option<Task>, StoreError> {
        let name = name.to_string();
        self.with_conn(move |conn| last_finalized(conn, Some(&name)))
            .await
    }

    async fn begin_migration_task(&self, task: &mut Task) -> Result<(), StoreError> {
        let candidate = task.clone();
        let id = self
            .with_conn(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                if has_pending(&tx)? {
                    tx.rollback()?;
                    return Err(StoreError::PendingMigration);
                }
                let last = last_finalized(&tx, Some(candidate.name()))?;
                check_sequence(last.as_ref(), &candidate)?;
                tx.execute(
                    r#"INSERT INTO cairn_meta (name, type, "commit") VALUES (?1, ?2, ?3)"#,
                    params![
                        candidate.name(),
                        candidate.direction.as_str(),
                        candidate.commit.as_ref().map(|c| c.id()),
                    ],
                )?;
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(id)
            })
            .await?;
        task.id = Some(id);
        Ok(())
    }

    async fn finish_migration_task(&self, task: &Task) -> Result<(), StoreError> {
        let done = Completion::of(task)?;
        let name = task.to_string();
        self.with_conn(move |conn| {
            let updated = conn.execute(
                r#"UPDATE cairn_meta
                   SET applied_at = ?1, head = ?2, "commit" = COALESCE(?3, "commit")
                   WHERE id = ?4"#,
                params![done.applied_at, done.head, done.commit, done.id],
            )?;
            if updated == 0 {
                return Err(StoreError::TaskNotRegistered { name });
            }
            Ok(())
        })
        .await
    }

    async fn has_pending_migration(&self) -> Result<bool, StoreError> {
        self.with_conn(|conn| has_pending(conn)).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || match conn.lock().take() {
            Some(conn) => conn.close().map_err(|(_, e)| StoreError::Sqlite(e)),
            None => Ok(()),
        })
        .await?
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
