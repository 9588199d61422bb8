// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use crate::subprocess::{GIT_TIMEOUT, SCRIPT_TIMEOUT};
use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for a single git invocation (default: 60s).
pub fn git_timeout() -> Duration {
    parse_duration_ms("CAIRN_GIT_TIMEOUT_MS").unwrap_or(GIT_TIMEOUT)
}

/// Timeout for one migration script entry point (default: 10m).
pub fn script_timeout() -> Duration {
    parse_duration_ms("CAIRN_SCRIPT_TIMEOUT_MS").unwrap_or(SCRIPT_TIMEOUT)
}
