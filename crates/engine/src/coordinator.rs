// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution coordinator.
//!
//! A run moves through resolving, waiting for pending, registering and
//! executing. When a pending task from another process clears only after
//! waiting, the plan is resolved again from scratch: the other process may
//! have applied part of it.

use crate::status::get_status;
use crate::wait::{Poller, Tick};
use crate::{RunError, Status};
use cairn_adapters::{run_supervised, GitAdapter, GitError, MigrationError, MigrationSource};
use cairn_core::{Commit, Config, Task, TaskList};
use cairn_storage::{MigrationStore, StoreError};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Progress notifications emitted during a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Another task is pending; emitted on every poll
    WaitingForPending { waited: Duration },
    PendingCleared { waited: Duration },
    /// The plan is being resolved again after a wait
    Replanning,
    TaskStarted { task: Task },
    /// Registration found another task pending; the plan is resolved again
    TaskDeferred { task: Task },
    /// A named run found committed directives not applied yet. Recording
    /// HEAD with the named task moves the baseline past them.
    UnappliedDirectives { tasks: TaskList },
    TaskFinished { task: Task, elapsed: Duration },
}

/// Outcome of a completed run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub executed: Vec<Task>,
    /// Tasks that lost a registration race and were retried after a replan
    pub deferred: Vec<Task>,
    pub replans: usize,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty() && self.deferred.is_empty()
    }
}

/// Whether a task got its row in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    Applied,
    /// Another task was pending when this one tried to register
    Lost,
}

/// Tunables for the pending wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub poll_interval: Duration,
    pub pending_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            poll_interval: crate::env::pending_poll_interval(),
            pending_timeout: crate::env::pending_timeout(),
        }
    }
}

/// Runs planned or named tasks against a store.
pub struct Coordinator<G, S, M> {
    git: G,
    store: S,
    source: M,
    repo: PathBuf,
    options: RunOptions,
    events: Option<mpsc::UnboundedSender<RunEvent>>,
}

impl<G, S, M> Coordinator<G, S, M>
where
    G: GitAdapter,
    S: MigrationStore,
    M: MigrationSource,
{
    pub fn new(git: G, store: S, source: M, repo: impl Into<PathBuf>) -> Self {
        Self {
            git,
            store,
            source,
            repo: repo.into(),
            options: RunOptions::default(),
            events: None,
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Send progress notifications to `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<RunEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn status(&self) -> Result<Status, RunError> {
        get_status(&self.git, &self.store).await
    }

    /// Apply every task implied by commits since the last applied one.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        'resolve: loop {
            let status = self.status().await?;
            let plan = status.tasks_to_execute();
            if plan.is_empty() {
                tracing::info!("database is up to date");
                return Ok(summary);
            }
            tracing::info!(
                tasks = plan.len(),
                reversed = status.new_commits.is_reversed,
                "resolved plan"
            );

            if self.wait_for_pending().await?.is_some() {
                tracing::info!("pending task cleared; resolving plan again");
                self.replan(&mut summary);
                continue;
            }

            for task in plan {
                let registration = self
                    .execute(task, status.head.as_ref(), &mut summary)
                    .await?;
                // No later task may be finalized past the one that lost
                if registration == Registration::Lost {
                    self.wait_for_pending().await?;
                    tracing::info!("lost a registration race; resolving plan again");
                    self.replan(&mut summary);
                    continue 'resolve;
                }
            }
            return Ok(summary);
        }
    }

    fn replan(&self, summary: &mut RunSummary) {
        summary.replans += 1;
        self.emit(RunEvent::Replanning);
    }

    /// Run explicitly named tasks, outside of any commit.
    ///
    /// The current HEAD is recorded with each task, so a repository without
    /// commits is an error. A task that loses a registration race waits for
    /// the pending one and tries again.
    pub async fn run_named(&self, tasks: TaskList) -> Result<RunSummary, RunError> {
        let head = self.git.require_head().await?;
        self.warn_unapplied().await;
        let mut summary = RunSummary::default();
        self.wait_for_pending().await?;
        for task in tasks {
            while self.execute(task.clone(), Some(&head), &mut summary).await?
                == Registration::Lost
            {
                self.wait_for_pending().await?;
            }
        }
        Ok(summary)
    }

    /// Committed directives that a named run would leave behind.
    async fn warn_unapplied(&self) {
        let plan = match self.status().await {
            Ok(status) => status.tasks_to_execute(),
            Err(e) => {
                tracing::debug!(error = %e, "could not resolve plan before named run");
                return;
            }
        };
        if plan.is_empty() {
            return;
        }
        tracing::warn!(
            tasks = plan.len(),
            "committed migrations are not applied yet; a named run moves the baseline past them"
        );
        self.emit(RunEvent::UnappliedDirectives { tasks: plan });
    }

    /// Block until no task is pending.
    ///
    /// Returns how long it waited, or `None` if nothing was pending.
    async fn wait_for_pending(&self) -> Result<Option<Duration>, RunError> {
        if !self.store.has_pending_migration().await? {
            return Ok(None);
        }
        let mut poller = Poller::new(
            self.options.poll_interval,
            Some(self.options.pending_timeout),
        );
        loop {
            let waited = poller.elapsed();
            tracing::info!(waited_ms = waited.as_millis() as u64, "waiting for pending migration");
            self.emit(RunEvent::WaitingForPending { waited });
            if poller.tick().await == Tick::Timeout {
                return Err(RunError::PendingTimedOut(self.options.pending_timeout));
            }
            if !self.store.has_pending_migration().await? {
                let waited = poller.elapsed();
                tracing::info!(waited_ms = waited.as_millis() as u64, "pending migration cleared");
                self.emit(RunEvent::PendingCleared { waited });
                return Ok(Some(waited));
            }
        }
    }

    /// Check, register, run and finalize one task.
    ///
    /// Errors name the task and the commit that asked for it.
    async fn execute(
        &self,
        task: Task,
        head: Option<&Commit>,
        summary: &mut RunSummary,
    ) -> Result<Registration, RunError> {
        let direction = task.direction;
        let name = task.name().to_string();
        let commit = task.commit.as_ref().map(|c| c.short_id().to_string());
        self.execute_task(task, head, summary)
            .await
            .map_err(|source| RunError::Task {
                direction,
                name,
                commit,
                source: Box::new(source),
            })
    }

    async fn execute_task(
        &self,
        mut task: Task,
        head: Option<&Commit>,
        summary: &mut RunSummary,
    ) -> Result<Registration, RunError> {
        self.store.check_if_task_can_execute(&task).await?;

        // Resolve the script before registering so a missing file never
        // leaves a pending row behind.
        let dir = self.script_dir(task.commit.as_ref()).await?;
        let loaded = self.source.load(&task.migration, &dir).await?;
        if !loaded.supports(task.direction) {
            return Err(MigrationError::MissingEntryPoint {
                name: task.name().to_string(),
                direction: task.direction,
            }
            .into());
        }

        match self.store.begin_migration_task(&mut task).await {
            Ok(()) => {}
            Err(StoreError::PendingMigration) => {
                tracing::info!(task = %task, "another task is pending; deferring");
                self.emit(RunEvent::TaskDeferred { task: task.clone() });
                summary.deferred.push(task);
                return Ok(Registration::Lost);
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(task = %task, id = task.id, "running");
        self.emit(RunEvent::TaskStarted { task: task.clone() });
        let start = Instant::now();
        run_supervised(loaded, task.direction).await?;
        let elapsed = start.elapsed();

        task.applied_at = Some(Utc::now());
        task.head = head.map(|c| Commit::new(c.id()));
        self.store.finish_migration_task(&task).await?;

        tracing::info!(task = %task, elapsed_ms = elapsed.as_millis() as u64, "applied");
        self.emit(RunEvent::TaskFinished {
            task: task.clone(),
            elapsed,
        });
        summary.executed.push(task);
        Ok(Registration::Applied)
    }

    /// Directory holding runnable scripts for a task.
    ///
    /// Uses the configuration as committed in the triggering commit, so a
    /// later change of `migrationOutDir` does not break older directives.
    /// Falls back to the working copy's configuration.
    async fn script_dir(&self, trigger: Option<&Commit>) -> Result<PathBuf, RunError> {
        let committed = match trigger {
            Some(commit) => match self.git.config_at(commit).await {
                Ok(config) => config,
                Err(GitError::UnknownCommit(id)) => {
                    tracing::warn!(commit = %id, "trigger commit is gone; using working-copy config");
                    None
                }
                Err(e) => return Err(e.into()),
            },
            None => None,
        };
        let config = match committed {
            Some(config) => config,
            None => Config::load_or_default(&self.repo)?,
        };
        Ok(resolve(&self.repo, config.out_dir()))
    }

    fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            // Receiver gone means nobody is listening; the run continues
            let _ = tx.send(event);
        }
    }
}

fn resolve(repo: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        repo.join(dir)
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
