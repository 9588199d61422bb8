// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the storage crate.

use std::time::Duration;

/// How long a SQLite writer waits for a competing lock (default: 30s).
pub fn sqlite_busy_timeout() -> Duration {
    std::env::var("CAIRN_SQLITE_BUSY_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(30))
}
