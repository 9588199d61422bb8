// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository configuration (`.cairnrc.json`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name, relative to the repository root.
pub const CONFIG_FILE: &str = ".cairnrc.json";

const DEFAULT_MIGRATION_DIR: &str = "migrations";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid .cairnrc.json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where migration scripts live.
///
/// `migration_dir` holds the sources that are staged and committed;
/// `migration_out_dir` is where runnable scripts end up when a build step
/// sits in between. Without a build step both are the same directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_migration_dir")]
    pub migration_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_out_dir: Option<PathBuf>,
}

fn default_migration_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MIGRATION_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migration_dir: default_migration_dir(),
            migration_out_dir: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load the working-copy config, or `None` if the file does not exist.
    pub fn load(root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = root.join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    /// Load the working-copy config, falling back to defaults.
    pub fn load_or_default(root: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load(root)?.unwrap_or_default())
    }

    /// Directory holding runnable scripts, relative to the repository root.
    pub fn out_dir(&self) -> &Path {
        self.migration_out_dir
            .as_deref()
            .unwrap_or(&self.migration_dir)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
