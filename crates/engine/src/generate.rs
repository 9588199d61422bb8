// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stub files for new migrations

use cairn_adapters::MANIFEST_EXTENSION;
use cairn_core::Config;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest written when no template is given. Empty commands count as
/// missing entry points, so an unedited stub refuses to run.
pub const DEFAULT_TEMPLATE: &str = r#"# Migration {name}
#
# Each command runs with `sh -c` from this directory. CAIRN_MIGRATION,
# CAIRN_DIRECTION and CAIRN_DATABASE_URL are set in its environment.
up = ""
down = ""
"#;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{} already exists", .0.display())]
    FileExists(PathBuf),
    #[error("template {} not found", .0.display())]
    TemplateNotFound(PathBuf),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Create `<migrationDir>/<name>.toml`, naming it with a fresh UUID unless
/// `name` is given. `{name}` in the template is replaced with the name.
pub fn generate(
    repo: &Path,
    config: &Config,
    name: Option<&str>,
    template: Option<&Path>,
) -> Result<PathBuf, GenerateError> {
    let body = match template {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GenerateError::TemplateNotFound(path.to_path_buf()))
            }
            Err(source) => {
                return Err(GenerateError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        },
        None => DEFAULT_TEMPLATE.to_string(),
    };
    let name = match name {
        Some(name) => name.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    };

    let dir = repo.join(&config.migration_dir);
    std::fs::create_dir_all(&dir).map_err(|source| GenerateError::Io {
        path: dir.clone(),
        source,
    })?;
    let path = dir.join(format!("{}.{}", name, MANIFEST_EXTENSION));

    let mut file = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(GenerateError::FileExists(path))
        }
        Err(source) => return Err(GenerateError::Io { path, source }),
    };
    if let Err(source) = file.write_all(body.replace("{name}", &name).as_bytes()) {
        return Err(GenerateError::Io { path, source });
    }

    tracing::info!(path = %path.display(), "generated migration");
    Ok(path)
}

#[cfg(test)]
#[path = "generate_tests.rs"]
mod tests;
