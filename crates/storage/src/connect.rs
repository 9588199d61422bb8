// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend selection from a connection string

use crate::{MigrationStore, PostgresStore, SqliteStore, StoreError, TracedStore};
use std::path::PathBuf;

/// Backend named by a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// `sqlite://<path>`; `sqlite:///abs/path` for absolute paths
    Sqlite(PathBuf),
    /// `postgres://...` or `postgresql://...`, passed through unchanged
    Postgres(String),
}

impl Backend {
    pub fn parse(url: Option<&str>) -> Result<Self, StoreError> {
        let url = url.map(str::trim).filter(|u| !u.is_empty());
        let Some(url) = url else {
            return Err(StoreError::MissingUrl);
        };
        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(StoreError::InvalidUrl(url.to_string()));
        };
        match scheme.to_ascii_lowercase().as_str() {
            "" => Err(StoreError::InvalidUrl(url.to_string())),
            "sqlite" if rest.is_empty() => Err(StoreError::InvalidUrl(url.to_string())),
            "sqlite" => Ok(Backend::Sqlite(PathBuf::from(rest))),
            "postgres" | "postgresql" => Ok(Backend::Postgres(url.to_string())),
            other => Err(StoreError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sqlite(_) => "sqlite",
            Backend::Postgres(_) => "postgres",
        }
    }
}

/// Open the store named by `url`, wrapped in [`TracedStore`].
pub async fn connect(url: Option<&str>) -> Result<Box<dyn MigrationStore>, StoreError> {
    let backend = Backend::parse(url)?;
    tracing::debug!(backend = backend.name(), "connecting");
    Ok(match backend {
        Backend::Sqlite(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::InvalidUrl(format!("{}: {}", path.display(), e)))?;
            }
            let store = tokio::task::spawn_blocking(move || SqliteStore::open(path)).await??;
            Box::new(TracedStore::new(store, "sqlite"))
        }
        Backend::Postgres(url) => {
            Box::new(TracedStore::new(PostgresStore::connect(&url).await?, "postgres"))
        }
    })
}

#[cfg(test)]
#[path = "connect_tests.rs"]
mod tests;
