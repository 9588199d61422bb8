// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration script loading and execution

mod manifest;

pub use manifest::{ScriptSource, MANIFEST_EXTENSION};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMigrationSource, FakeOutcome, SourceCall};

use async_trait::async_trait;
use cairn_core::{Direction, Migration};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from resolving, loading or running a migration
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration {name} not found: {} does not exist", .path.display())]
    NotFound { name: String, path: PathBuf },
    #[error("migration {name} failed to load: {reason}")]
    Load { name: String, reason: String },
    #[error("migration {name} has no {direction} entry point")]
    MissingEntryPoint { name: String, direction: Direction },
    #[error("migration {name} failed while running {direction}: {detail}")]
    ExecutionFailed {
        name: String,
        direction: Direction,
        detail: String,
    },
}

/// Resolves migration names to runnable scripts.
#[async_trait]
pub trait MigrationSource: Clone + Send + Sync + 'static {
    /// Locate and load `migration` from `dir`.
    async fn load(
        &self,
        migration: &Migration,
        dir: &Path,
    ) -> Result<Box<dyn LoadedMigration>, MigrationError>;
}

/// A loaded migration script.
#[async_trait]
pub trait LoadedMigration: Send + Sync + 'static {
    fn migration(&self) -> &Migration;

    /// Whether the script defines an entry point for `direction`
    fn supports(&self, direction: Direction) -> bool;

    /// Run the entry point for `direction` to completion
    async fn invoke(&self, direction: Direction) -> Result<(), MigrationError>;
}

/// Run a loaded migration in its own task.
///
/// A panic inside the script's future is delivered as
/// [`MigrationError::ExecutionFailed`] instead of unwinding through the
/// caller.
pub async fn run_supervised(
    loaded: Box<dyn LoadedMigration>,
    direction: Direction,
) -> Result<(), MigrationError> {
    let name = loaded.migration().name.clone();
    if !loaded.supports(direction) {
        return Err(MigrationError::MissingEntryPoint { name, direction });
    }
    let handle = tokio::spawn(async move { loaded.invoke(direction).await });
    match handle.await {
        Ok(result) => result,
        Err(join_err) => Err(MigrationError::ExecutionFailed {
            name,
            direction,
            detail: describe_join_error(join_err),
        }),
    }
}

fn describe_join_error(err: tokio::task::JoinError) -> String {
    if err.is_cancelled() {
        return "task was cancelled".to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
