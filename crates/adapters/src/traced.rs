// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::script::{LoadedMigration, MigrationError, MigrationSource};
use async_trait::async_trait;
use cairn_core::{Direction, Migration};
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any MigrationSource
#[derive(Clone)]
pub struct TracedSource<S> {
    inner: S,
}

impl<S> TracedSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: MigrationSource> MigrationSource for TracedSource<S> {
    async fn load(
        &self,
        migration: &Migration,
        dir: &Path,
    ) -> Result<Box<dyn LoadedMigration>, MigrationError> {
        async {
            let result = self.inner.load(migration, dir).await;
            match &result {
                Ok(loaded) => tracing::debug!(
                    up = loaded.supports(Direction::Up),
                    down = loaded.supports(Direction::Down),
                    "loaded"
                ),
                Err(e) => tracing::error!(error = %e, "load failed"),
            }
            result.map(|inner| Box::new(TracedLoaded { inner }) as Box<dyn LoadedMigration>)
        }
        .instrument(tracing::info_span!(
            "migration.load",
            name = migration.name.as_str(),
            dir = %dir.display()
        ))
        .await
    }
}

struct TracedLoaded {
    inner: Box<dyn LoadedMigration>,
}

#[async_trait]
impl LoadedMigration for TracedLoaded {
    fn migration(&self) -> &Migration {
        self.inner.migration()
    }

    fn supports(&self, direction: Direction) -> bool {
        self.inner.supports(direction)
    }

    async fn invoke(&self, direction: Direction) -> Result<(), MigrationError> {
        let name = self.inner.migration().name.clone();
        async {
            tracing::info!("starting");
            let start = std::time::Instant::now();
            let result = self.inner.invoke(direction).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "migration finished"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "migration failed"),
            }
            result
        }
        .instrument(tracing::info_span!(
            "migration.invoke",
            name = name.as_str(),
            direction = direction.as_str()
        ))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
