// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::{Coordinator, RunEvent, RunOptions};
use cairn_adapters::{FakeGit, FakeMigrationSource};
use cairn_storage::MemoryStore;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Convenience alias for the fully-typed test coordinator.
pub(crate) type TestCoordinator = Coordinator<FakeGit, MemoryStore, FakeMigrationSource>;

/// Fakes for every collaborator plus a scratch working copy.
pub(crate) struct TestContext {
    pub git: FakeGit,
    pub store: MemoryStore,
    pub source: FakeMigrationSource,
    pub repo: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            git: FakeGit::new(),
            store: MemoryStore::new(),
            source: FakeMigrationSource::new(),
            repo: TempDir::new().unwrap(),
        }
    }

    pub fn repo(&self) -> &Path {
        self.repo.path()
    }

    /// Coordinator with a fast poll and a short pending ceiling.
    pub fn coordinator(&self) -> TestCoordinator {
        Coordinator::new(
            self.git.clone(),
            self.store.clone(),
            self.source.clone(),
            self.repo(),
        )
        .with_options(RunOptions {
            poll_interval: Duration::from_millis(100),
            pending_timeout: Duration::from_secs(5),
        })
    }

    pub fn coordinator_with_events(&self) -> (TestCoordinator, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (self.coordinator().with_events(tx), rx)
    }
}

/// Collect every event sent so far.
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<RunEvent>) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
