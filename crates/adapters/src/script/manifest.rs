// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script manifests: `<dir>/<name>.toml` with shell commands per direction.
//!
//! ```toml
//! up = "psql \"$CAIRN_DATABASE_URL\" -f up.sql"
//! down = "psql \"$CAIRN_DATABASE_URL\" -f down.sql"
//! ```

use super::{LoadedMigration, MigrationError, MigrationSource};
use crate::subprocess::{describe_exit, run_with_timeout, stderr_tail};
use async_trait::async_trait;
use cairn_core::{Direction, Migration};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// File extension of a migration manifest.
pub const MANIFEST_EXTENSION: &str = "toml";

#[derive(Debug, Clone, Default, Deserialize)]
struct Manifest {
    up: Option<String>,
    down: Option<String>,
}

impl Manifest {
    fn command(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Up => self.up.as_deref(),
            Direction::Down => self.down.as_deref(),
        }
        .filter(|cmd| !cmd.trim().is_empty())
    }
}

/// Loads manifests from disk and runs their commands with `sh -c`.
#[derive(Debug, Clone)]
pub struct ScriptSource {
    database_url: Option<String>,
    timeout: Duration,
}

impl Default for ScriptSource {
    fn default() -> Self {
        Self {
            database_url: None,
            timeout: crate::env::script_timeout(),
        }
    }
}

impl ScriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exported to scripts as `CAIRN_DATABASE_URL`.
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path a migration's manifest is expected at.
    pub fn manifest_path(migration: &Migration, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}", migration.name, MANIFEST_EXTENSION))
    }
}

#[async_trait]
impl MigrationSource for ScriptSource {
    async fn load(
        &self,
        migration: &Migration,
        dir: &Path,
    ) -> Result<Box<dyn LoadedMigration>, MigrationError> {
        let path = Self::manifest_path(migration, dir);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MigrationError::NotFound {
                    name: migration.name.clone(),
                    path,
                })
            }
            Err(e) => {
                return Err(MigrationError::Load {
                    name: migration.name.clone(),
                    reason: format!("{}: {}", path.display(), e),
                })
            }
        };
        let manifest: Manifest = toml::from_str(&text).map_err(|e| MigrationError::Load {
            name: migration.name.clone(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        tracing::debug!(migration = %migration, path = %path.display(), "loaded manifest");

        Ok(Box::new(ScriptMigration {
            migration: migration.clone(),
            dir: dir.to_path_buf(),
            manifest,
            database_url: self.database_url.clone(),
            timeout: self.timeout,
        }))
    }
}

struct ScriptMigration {
    migration: Migration,
    dir: PathBuf,
    manifest: Manifest,
    database_url: Option<String>,
    timeout: Duration,
}

#[async_trait]
impl LoadedMigration for ScriptMigration {
    fn migration(&self) -> &Migration {
        &self.migration
    }

    fn supports(&self, direction: Direction) -> bool {
        self.manifest.command(direction).is_some()
    }

    async fn invoke(&self, direction: Direction) -> Result<(), MigrationError> {
        let name = self.migration.name.clone();
        let Some(script) = self.manifest.command(direction) else {
            return Err(MigrationError::MissingEntryPoint { name, direction });
        };

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(script)
            .current_dir(&self.dir)
            .env("CAIRN_MIGRATION", &name)
            .env("CAIRN_DIRECTION", direction.as_str());
        if let Some(url) = &self.database_url {
            cmd.env("CAIRN_DATABASE_URL", url);
        }

        let description = format!("{} {}", direction, name);
        let output = run_with_timeout(cmd, self.timeout, &description)
            .await
            .map_err(|detail| MigrationError::ExecutionFailed {
                name: name.clone(),
                direction,
                detail,
            })?;

        if !output.status.success() {
            let tail = stderr_tail(&output);
            let detail = if tail.is_empty() {
                describe_exit(&output.status)
            } else {
                format!("{}: {}", describe_exit(&output.status), tail)
            };
            return Err(MigrationError::ExecutionFailed {
                name,
                direction,
                detail,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
