// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cairn status`: last applied task and the plan still to run

use std::fmt::Write;

use anyhow::Result;
use cairn_engine::Status;
use serde::Serialize;

use super::Workspace;
use crate::output::{format_timestamp, CommitView, OutputFormat, TaskView};

pub async fn handle(workspace: &Workspace, format: OutputFormat) -> Result<()> {
    let coordinator = workspace.coordinator().await?;
    let status = coordinator.status().await;
    coordinator.store().close().await?;
    print!("{}", format_status(&status?, format)?);
    Ok(())
}

#[derive(Serialize)]
struct StatusView {
    head: Option<CommitView>,
    last_task: Option<TaskView>,
    reversed: bool,
    pending: Vec<TaskView>,
}

pub(crate) fn format_status(status: &Status, format: OutputFormat) -> Result<String> {
    let plan = status.tasks_to_execute();
    if format == OutputFormat::Json {
        let view = StatusView {
            head: status.head.as_ref().map(CommitView::from),
            last_task: status.last_task.as_ref().map(TaskView::from),
            reversed: status.new_commits.is_reversed,
            pending: plan.iter().map(TaskView::from).collect(),
        };
        let mut out = serde_json::to_string_pretty(&view)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    match &status.head {
        Some(head) => writeln!(out, "HEAD: {}", describe_commit(head.short_id(), head.subject()))?,
        None => writeln!(out, "HEAD: (no commits)")?,
    }
    match &status.last_task {
        Some(task) => {
            write!(out, "Last migration: {} {}", task.direction, task.name())?;
            if let Some(at) = &task.applied_at {
                write!(out, " at {}", format_timestamp(at))?;
            }
            writeln!(out)?;
            if let Some(commit) = &task.commit {
                writeln!(
                    out,
                    "  from {}",
                    describe_commit(commit.short_id(), commit.subject())
                )?;
            }
        }
        None => writeln!(out, "Last migration: (none)")?,
    }
    writeln!(out, "New commits: {}", status.new_commits.len())?;

    if plan.is_empty() {
        writeln!(out, "\nDatabase is up to date.")?;
        return Ok(out);
    }
    let heading = if status.new_commits.is_reversed {
        "To revert (HEAD moved back)"
    } else {
        "To apply"
    };
    writeln!(out, "\n{}:", heading)?;
    for task in plan.iter() {
        write!(out, "  {:<4} {}", task.direction.as_str(), task.name())?;
        if let Some(commit) = &task.commit {
            write!(out, "  ({})", commit.short_id())?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

fn describe_commit(id: &str, subject: Option<&str>) -> String {
    match subject {
        Some(subject) => format!("{} {}", id, subject),
        None => id.to_string(),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
