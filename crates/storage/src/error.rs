// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use cairn_core::SequenceError;
use thiserror::Error;

/// Errors from connecting to or querying the migration table
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no database connection string given (use --db or CAIRN_DB)")]
    MissingUrl,
    #[error("invalid connection string '{0}'")]
    InvalidUrl(String),
    #[error("unsupported database scheme '{0}' (expected sqlite or postgres)")]
    UnsupportedScheme(String),
    /// Another task is already registered and unfinished
    #[error("another migration is pending")]
    PendingMigration,
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error("task {name} is not registered")]
    TaskNotRegistered { name: String },
    #[error("corrupt row {id} in cairn_meta: {reason}")]
    CorruptRow { id: i64, reason: String },
    #[error("store is closed")]
    Closed,
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
