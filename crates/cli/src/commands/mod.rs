// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod generate;
pub mod hook;
pub mod init;
pub mod migrate;
pub mod named;
pub mod status;

use anyhow::{Context, Result};
use cairn_adapters::{GitCli, ScriptSource, TracedSource};
use cairn_core::Config;
use cairn_engine::Coordinator;
use cairn_storage::MigrationStore;
use std::path::{Path, PathBuf};

/// Coordinator wired to the real git, database and script runner
pub type CliCoordinator = Coordinator<GitCli, Box<dyn MigrationStore>, TracedSource<ScriptSource>>;

/// Repository and database a command operates on
pub struct Workspace {
    repo: PathBuf,
    db: Option<String>,
}

impl Workspace {
    pub fn new(repo: PathBuf, db: Option<String>) -> Self {
        Self { repo, db }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    pub fn db(&self) -> Option<&str> {
        self.db.as_deref()
    }

    pub fn git(&self) -> GitCli {
        GitCli::new(&self.repo)
    }

    pub fn config(&self) -> Result<Config> {
        Config::load_or_default(&self.repo).context("failed to load repository configuration")
    }

    /// Connect to the database and make sure the migration table exists.
    pub async fn store(&self) -> Result<Box<dyn MigrationStore>> {
        let store = cairn_storage::connect(self.db()).await?;
        store.init().await?;
        Ok(store)
    }

    pub async fn coordinator(&self) -> Result<CliCoordinator> {
        let store = self.store().await?;
        let mut scripts = ScriptSource::default();
        if let Some(url) = self.db() {
            scripts = scripts.with_database_url(url);
        }
        Ok(Coordinator::new(
            self.git(),
            store,
            TracedSource::new(scripts),
            &self.repo,
        ))
    }
}
