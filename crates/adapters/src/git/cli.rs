// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git adapter backed by the `git` command line

use super::records::{RecordReader, LOG_FORMAT};
use super::{parse_commit, GitAdapter, GitError};
use crate::subprocess::{
    describe_exit, drain_tail, run_with_timeout, stderr_tail, STDERR_CAPTURE_BYTES,
};
use async_trait::async_trait;
use cairn_core::{Commit, CommitSequence, Config, CONFIG_FILE};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Runs `git` against a working copy.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            timeout: crate::env::git_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.repo).args(args);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    async fn output(&self, args: &[&str]) -> Result<Output, GitError> {
        let description = format!("git {}", args.join(" "));
        tracing::debug!(cmd = %description, "running");
        run_with_timeout(self.command(args), self.timeout, &description)
            .await
            .map_err(GitError::CommandFailed)
    }

    /// Run and require success, returning stdout.
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn commit_exists(&self, id: &str) -> Result<bool, GitError> {
        let spec = format!("{}^{{commit}}", id);
        let output = self.output(&["cat-file", "-e", &spec]).await?;
        Ok(output.status.success())
    }

    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError> {
        let args = ["merge-base", "--is-ancestor", ancestor, descendant];
        let output = self.output(&args).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(failure(&args, &output)),
        }
    }

    /// Directory git runs hooks from.
    pub async fn hooks_dir(&self) -> Result<PathBuf, GitError> {
        let path = self.run(&["rev-parse", "--git-path", "hooks"]).await?;
        let path = PathBuf::from(path.trim());
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.repo.join(path))
        }
    }

    /// Stream `git log --reverse` for `range` and parse each commit as its
    /// record completes.
    async fn log(&self, range: &str) -> Result<Vec<Commit>, GitError> {
        let mut child = self
            .command(&["log", "--reverse", LOG_FORMAT, range])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GitError::CommandFailed("git log: stdout not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GitError::CommandFailed("git log: stderr not captured".to_string()))?;
        let stderr = drain_tail(stderr, STDERR_CAPTURE_BYTES);

        let mut lines = BufReader::new(stdout).lines();
        let mut reader = RecordReader::new();
        let mut commits = Vec::new();
        let collect = async {
            while let Some(line) = lines.next_line().await? {
                if let Some(record) = reader.push_line(&line) {
                    commits.push(parse_commit(record.id, record.message)?);
                }
            }
            if let Some(record) = reader.finish() {
                commits.push(parse_commit(record.id, record.message)?);
            }
            Ok::<_, GitError>(())
        };
        match tokio::time::timeout(self.timeout, collect).await {
            Ok(result) => result?,
            Err(_elapsed) => {
                return Err(GitError::CommandFailed(format!(
                    "git log {} timed out after {}s",
                    range,
                    self.timeout.as_secs()
                )))
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            let output = Output {
                status,
                stdout: Vec::new(),
                stderr: stderr.await.unwrap_or_default(),
            };
            return Err(failure(&["log", range], &output));
        }
        tracing::debug!(range, count = commits.len(), "walked history");
        Ok(commits)
    }
}

fn failure(args: &[&str], output: &Output) -> GitError {
    GitError::CommandFailed(format!(
        "git {} {}: {}",
        args.join(" "),
        describe_exit(&output.status),
        stderr_tail(output)
    ))
}

#[async_trait]
impl GitAdapter for GitCli {
    async fn head(&self) -> Result<Option<Commit>, GitError> {
        let args = ["rev-parse", "--verify", "--quiet", "HEAD"];
        let output = self.output(&args).await?;
        match output.status.code() {
            Some(0) => {
                let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Ok(Some(Commit::new(id)))
            }
            // --quiet exits 1 without output when HEAD is unborn
            Some(1) if output.stderr.is_empty() => Ok(None),
            _ => Err(failure(&args, &output)),
        }
    }

    async fn new_commits(&self, since: Option<&Commit>) -> Result<CommitSequence, GitError> {
        let Some(head) = self.head().await? else {
            return Ok(CommitSequence::default());
        };
        let Some(since) = since else {
            return Ok(CommitSequence::forward(self.log(head.id()).await?));
        };
        if !self.commit_exists(since.id()).await? {
            return Err(GitError::UnknownCommit(since.id().to_string()));
        }
        if self.is_ancestor(since.id(), head.id()).await? {
            let range = format!("{}..{}", since.id(), head.id());
            Ok(CommitSequence::forward(self.log(&range).await?))
        } else {
            let range = format!("{}..{}", head.id(), since.id());
            Ok(CommitSequence::reversed(self.log(&range).await?))
        }
    }

    async fn read_message(&self, id: &str) -> Result<String, GitError> {
        let args = ["show", "-s", "--format=%B", id];
        let output = self.output(&args).await?;
        if output.status.success() {
            let message = String::from_utf8_lossy(&output.stdout);
            return Ok(message.trim_end().to_string());
        }
        if !self.commit_exists(id).await? {
            return Err(GitError::UnknownCommit(id.to_string()));
        }
        Err(failure(&args, &output))
    }

    async fn config_at(&self, commit: &Commit) -> Result<Option<Config>, GitError> {
        let spec = format!("{}:{}", commit.id(), CONFIG_FILE);
        let output = self.output(&["show", &spec]).await?;
        if !output.status.success() {
            if !self.commit_exists(commit.id()).await? {
                return Err(GitError::UnknownCommit(commit.id().to_string()));
            }
            // Commit predates the config file
            return Ok(None);
        }
        let json = String::from_utf8_lossy(&output.stdout);
        Config::from_json(&json)
            .map(Some)
            .map_err(|source| GitError::Config {
                commit: commit.id().to_string(),
                source,
            })
    }

    async fn staged_added_files(&self, dir: &Path) -> Result<Vec<PathBuf>, GitError> {
        let dir = dir.to_string_lossy().into_owned();
        let stdout = self
            .run(&[
                "diff",
                "--cached",
                "--name-only",
                "--diff-filter=A",
                "-z",
                "--",
                dir.as_str(),
            ])
            .await?;
        Ok(stdout
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
