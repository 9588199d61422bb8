// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cairn migrate`: apply everything committed since the last run

use std::fmt::Write;

use anyhow::Result;
use cairn_core::TaskList;
use cairn_engine::{RunEvent, RunSummary};
use serde::Serialize;
use tokio::sync::mpsc;

use super::{CliCoordinator, Workspace};
use crate::output::{format_duration, OutputFormat, TaskView};

pub async fn handle(workspace: &Workspace, format: OutputFormat) -> Result<()> {
    let coordinator = workspace.coordinator().await?;
    let summary = run_with_progress(coordinator, Work::Committed, format).await?;
    print!("{}", format_summary(&summary, format)?);
    Ok(())
}

/// What a run should execute
pub(crate) enum Work {
    /// Tasks implied by commits since the last applied one
    Committed,
    Named(TaskList),
}

/// Drive a run while printing its progress events to stderr.
///
/// The store is closed whether or not the run succeeds.
pub(crate) async fn run_with_progress(
    coordinator: CliCoordinator,
    work: Work,
    format: OutputFormat,
) -> Result<RunSummary> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = coordinator.with_events(tx);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if format == OutputFormat::Text {
                eprintln!("{}", format_event(&event));
            }
        }
    });

    let result = match work {
        Work::Committed => coordinator.run().await,
        Work::Named(tasks) => coordinator.run_named(tasks).await,
    };
    let closed = coordinator.store().close().await;
    // The printer ends once the sender inside the coordinator is gone
    drop(coordinator);
    let _ = printer.await;

    let summary = result?;
    closed?;
    Ok(summary)
}

pub(crate) fn format_event(event: &RunEvent) -> String {
    match event {
        RunEvent::WaitingForPending { waited } => format!(
            "waiting for a pending migration to finish ({} so far)",
            format_duration(*waited)
        ),
        RunEvent::PendingCleared { waited } => format!(
            "pending migration finished after {}",
            format_duration(*waited)
        ),
        RunEvent::Replanning => "re-reading history".to_string(),
        RunEvent::TaskStarted { task } => format!("{} {} ...", task.direction, task.name()),
        RunEvent::TaskDeferred { task } => format!(
            "{} {} deferred: another migration is pending",
            task.direction,
            task.name()
        ),
        RunEvent::UnappliedDirectives { tasks } => format!(
            "warning: {} committed migration{} not applied yet ({}); run `cairn migrate` first or they will be left behind",
            tasks.len(),
            if tasks.len() == 1 { " is" } else { "s are" },
            tasks
                .iter()
                .map(|t| format!("{} {}", t.direction, t.name()))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        RunEvent::TaskFinished { task, elapsed } => format!(
            "{} {} done in {}",
            task.direction,
            task.name(),
            format_duration(*elapsed)
        ),
    }
}

#[derive(Serialize)]
struct SummaryView {
    executed: Vec<TaskView>,
    deferred: Vec<TaskView>,
    replans: usize,
}

pub(crate) fn format_summary(summary: &RunSummary, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let view = SummaryView {
            executed: summary.executed.iter().map(TaskView::from).collect(),
            deferred: summary.deferred.iter().map(TaskView::from).collect(),
            replans: summary.replans,
        };
        let mut out = serde_json::to_string_pretty(&view)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    if summary.is_empty() {
        writeln!(out, "Database is up to date.")?;
        return Ok(out);
    }
    let count = summary.executed.len();
    writeln!(
        out,
        "Applied {} migration{}.",
        count,
        if count == 1 { "" } else { "s" }
    )?;
    if !summary.deferred.is_empty() {
        let names: Vec<&str> = summary.deferred.iter().map(|t| t.name()).collect();
        writeln!(out, "Deferred behind another migration: {}", names.join(", "))?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "migrate_tests.rs"]
mod tests;
