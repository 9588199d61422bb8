// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::process::{ExitStatus, Output};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Default timeout for git queries.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for a migration script entry point.
/// Set to 10 minutes as a safety net for long-running data migrations.
pub const SCRIPT_TIMEOUT: Duration = Duration::from_secs(600);

/// Number of stderr lines kept when describing a failed command.
const STDERR_TAIL_LINES: usize = 20;

/// Run a subprocess command with a timeout.
///
/// Wraps `Command::output()` with `tokio::time::timeout`, converting
/// timeout expiration into a descriptive error message. The child process
/// is killed if the timeout elapses.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{} failed: {}", description, io_err)),
        Err(_elapsed) => Err(format!(
            "{} timed out after {}s",
            description,
            timeout.as_secs()
        )),
    }
}

/// Bytes of a streamed child's stderr kept for error messages.
pub const STDERR_CAPTURE_BYTES: usize = 64 * 1024;

/// Read `reader` to the end on a separate task, keeping only its last `cap`
/// bytes.
///
/// Used for the stderr of a child whose stdout is being streamed, so a noisy
/// child never blocks on a full pipe.
pub fn drain_tail<R>(mut reader: R, cap: usize) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut kept = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    kept.extend_from_slice(&chunk[..n]);
                    if kept.len() > cap {
                        kept.drain(..kept.len() - cap);
                    }
                }
            }
        }
        kept
    })
}

/// Describe how a process ended: exit code, or the signal that killed it.
pub fn describe_exit(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exited with status {}", code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("terminated by signal {}", signal);
        }
    }
    "terminated abnormally".to_string()
}

/// Last few lines of a command's stderr, trimmed.
pub fn stderr_tail(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
