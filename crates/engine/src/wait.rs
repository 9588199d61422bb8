// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling loop helper for waiting out another process's task.

use std::time::Duration;
use tokio::time::Instant;

/// Result of waiting for the next poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Ready for the next poll iteration.
    Ready,
    /// The deadline was reached.
    Timeout,
}

/// A polling loop helper with interval timing and an optional deadline.
#[derive(Debug)]
pub struct Poller {
    interval: Duration,
    started: Instant,
    deadline: Option<Instant>,
}

impl Poller {
    /// Create a new poller with the given interval and optional timeout.
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        let started = Instant::now();
        Self {
            interval,
            started,
            deadline: timeout.map(|t| started + t),
        }
    }

    /// Time since the poller was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Wait for the next poll tick.
    ///
    /// Returns [`Tick::Timeout`] if the deadline has been reached, checked
    /// both before and after sleeping. The sleep is cut short at the
    /// deadline.
    pub async fn tick(&mut self) -> Tick {
        let now = Instant::now();
        let wake = match self.deadline {
            Some(deadline) if now >= deadline => return Tick::Timeout,
            Some(deadline) => deadline.min(now + self.interval),
            None => now + self.interval,
        };
        tokio::time::sleep_until(wake).await;
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Tick::Timeout,
            _ => Tick::Ready,
        }
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
