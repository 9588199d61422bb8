// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cairn generate`: create a migration manifest

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::Workspace;
use crate::output::OutputFormat;

#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Migration name (defaults to a random UUID)
    #[arg(long)]
    pub name: Option<String>,

    /// Template file to copy instead of the built-in one
    #[arg(long)]
    pub template: Option<PathBuf>,
}

pub fn handle(args: GenerateArgs, workspace: &Workspace, format: OutputFormat) -> Result<()> {
    let config = workspace.config()?;
    let path = cairn_engine::generate(
        workspace.repo(),
        &config,
        args.name.as_deref(),
        args.template.as_deref(),
    )?;
    let shown = path.strip_prefix(workspace.repo()).unwrap_or(&path);
    println!("{}", format_created(shown, format)?);
    Ok(())
}

fn format_created(path: &Path, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("Created {}", path.display())),
        OutputFormat::Json => Ok(serde_json::to_string(&serde_json::json!({
            "path": path.display().to_string(),
        }))?),
    }
}

#[cfg(test)]
#[path = "generate_tests.rs"]
mod tests;
