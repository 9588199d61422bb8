// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

/// Default pause between checks while another task is pending.
pub const PENDING_POLL: Duration = Duration::from_secs(1);

/// Default ceiling on waiting for a pending task to finish.
pub const PENDING_TIMEOUT: Duration = Duration::from_secs(600);

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Interval between pending checks (default: 1s).
pub fn pending_poll_interval() -> Duration {
    parse_duration_ms("CAIRN_PENDING_POLL_MS")
        .filter(|d| !d.is_zero())
        .unwrap_or(PENDING_POLL)
}

/// How long to wait for a pending task before giving up (default: 10m).
pub fn pending_timeout() -> Duration {
    parse_duration_ms("CAIRN_PENDING_TIMEOUT_MS").unwrap_or(PENDING_TIMEOUT)
}
