// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use cairn_core::{Commit, Task};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Short, human-readable duration ("850ms", "12.3s", "4m05s").
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        let secs = d.as_secs();
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Serializable view of a commit
#[derive(Debug, Serialize)]
pub struct CommitView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl From<&Commit> for CommitView {
    fn from(commit: &Commit) -> Self {
        Self {
            id: commit.id().to_string(),
            subject: commit.subject().map(str::to_string),
        }
    }
}

/// Serializable view of a task
#[derive(Debug, Serialize)]
pub struct TaskView {
    pub direction: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<CommitView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            direction: task.direction.as_str(),
            name: task.name().to_string(),
            commit: task.commit.as_ref().map(CommitView::from),
            head: task.head.as_ref().map(CommitView::from),
            applied_at: task.applied_at,
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
