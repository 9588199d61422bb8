// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake migration source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LoadedMigration, MigrationError, MigrationSource};
use async_trait::async_trait;
use cairn_core::{Direction, Migration};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded migration source call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Load { name: String, dir: PathBuf },
    Invoke { name: String, direction: Direction },
}

/// What an entry point does when invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeOutcome {
    Succeed,
    Fail(String),
    Panic(String),
}

#[derive(Default)]
struct FakeSourceState {
    missing: HashSet<String>,
    broken: HashMap<String, String>,
    no_entry: HashSet<(String, Direction)>,
    outcomes: HashMap<(String, Direction), FakeOutcome>,
    calls: Vec<SourceCall>,
}

/// Fake migration source where every name resolves and succeeds unless
/// configured otherwise.
#[derive(Clone, Default)]
pub struct FakeMigrationSource {
    inner: Arc<Mutex<FakeSourceState>>,
}

impl FakeMigrationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `name` fail to resolve.
    pub fn set_missing(&self, name: &str) {
        self.inner.lock().missing.insert(name.to_string());
    }

    /// Make `name` resolve but fail to load.
    pub fn set_broken(&self, name: &str, reason: &str) {
        self.inner
            .lock()
            .broken
            .insert(name.to_string(), reason.to_string());
    }

    /// Remove the entry point for one direction.
    pub fn remove_entry_point(&self, name: &str, direction: Direction) {
        self.inner
            .lock()
            .no_entry
            .insert((name.to_string(), direction));
    }

    pub fn set_outcome(&self, name: &str, direction: Direction, outcome: FakeOutcome) {
        self.inner
            .lock()
            .outcomes
            .insert((name.to_string(), direction), outcome);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SourceCall> {
        self.inner.lock().calls.clone()
    }

    /// Directions invoked, as `(direction, name)` in call order
    pub fn invocations(&self) -> Vec<(Direction, String)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                SourceCall::Invoke { name, direction } => Some((*direction, name.clone())),
                SourceCall::Load { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl MigrationSource for FakeMigrationSource {
    async fn load(
        &self,
        migration: &Migration,
        dir: &Path,
    ) -> Result<Box<dyn LoadedMigration>, MigrationError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SourceCall::Load {
            name: migration.name.clone(),
            dir: dir.to_path_buf(),
        });
        if inner.missing.contains(&migration.name) {
            return Err(MigrationError::NotFound {
                name: migration.name.clone(),
                path: dir.join(format!("{}.toml", migration.name)),
            });
        }
        if let Some(reason) = inner.broken.get(&migration.name) {
            return Err(MigrationError::Load {
                name: migration.name.clone(),
                reason: reason.clone(),
            });
        }
        Ok(Box::new(FakeLoaded {
            migration: migration.clone(),
            source: self.clone(),
        }))
    }
}

struct FakeLoaded {
    migration: Migration,
    source: FakeMigrationSource,
}

#[async_trait]
impl LoadedMigration for FakeLoaded {
    fn migration(&self) -> &Migration {
        &self.migration
    }

    fn supports(&self, direction: Direction) -> bool {
        !self
            .source
            .inner
            .lock()
            .no_entry
            .contains(&(self.migration.name.clone(), direction))
    }

    async fn invoke(&self, direction: Direction) -> Result<(), MigrationError> {
        let outcome = {
            let mut inner = self.source.inner.lock();
            inner.calls.push(SourceCall::Invoke {
                name: self.migration.name.clone(),
                direction,
            });
            inner
                .outcomes
                .get(&(self.migration.name.clone(), direction))
                .cloned()
                .unwrap_or(FakeOutcome::Succeed)
        };
        match outcome {
            FakeOutcome::Succeed => Ok(()),
            FakeOutcome::Fail(detail) => Err(MigrationError::ExecutionFailed {
                name: self.migration.name.clone(),
                direction,
                detail,
            }),
            #[allow(clippy::panic)]
            FakeOutcome::Panic(msg) => panic!("{}", msg),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
