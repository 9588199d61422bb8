// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for planning and running migrations

use cairn_adapters::{GitError, MigrationError};
use cairn_core::{ConfigError, Direction};
use cairn_storage::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Errors that stop a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("gave up after {}s waiting for a pending migration to finish", .0.as_secs())]
    PendingTimedOut(Duration),
    /// A task failed; names the commit whose directive asked for it
    #[error("{direction} {name}{}: {source}", from_commit(.commit))]
    Task {
        direction: Direction,
        name: String,
        /// Short id of the triggering commit; `None` for named runs
        commit: Option<String>,
        #[source]
        source: Box<RunError>,
    },
}

fn from_commit(commit: &Option<String>) -> String {
    match commit {
        Some(id) => format!(" (from commit {})", id),
        None => String::new(),
    }
}

impl RunError {
    /// The underlying error, without the task that hit it.
    pub fn into_root(self) -> RunError {
        match self {
            RunError::Task { source, .. } => source.into_root(),
            other => other,
        }
    }
}
