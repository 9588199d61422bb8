// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cairn up` / `cairn down`: run migrations by name

use anyhow::Result;
use cairn_core::{Direction, Migration, Task, TaskList};

use super::migrate::{format_summary, run_with_progress, Work};
use super::Workspace;
use crate::output::OutputFormat;

#[derive(clap::Args)]
pub struct NamedArgs {
    /// Migration names, run in the order given
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub async fn handle(
    args: NamedArgs,
    direction: Direction,
    workspace: &Workspace,
    format: OutputFormat,
) -> Result<()> {
    let tasks = named_tasks(direction, &args.names);
    let coordinator = workspace.coordinator().await?;
    let summary = run_with_progress(coordinator, Work::Named(tasks), format).await?;
    print!("{}", format_summary(&summary, format)?);
    Ok(())
}

pub(crate) fn named_tasks(direction: Direction, names: &[String]) -> TaskList {
    names
        .iter()
        .map(|name| Task::new(direction, Migration::new(name.as_str())))
        .collect()
}

#[cfg(test)]
#[path = "named_tests.rs"]
mod tests;
