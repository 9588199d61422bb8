// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

/// Variable holding the database connection string.
pub const DB_VAR: &str = "CAIRN_DB";

/// Variable holding the log filter directives.
pub const LOG_VAR: &str = "CAIRN_LOG";

/// Log filter from `CAIRN_LOG` (default: `warn`).
pub fn log_filter() -> String {
    std::env::var(LOG_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "warn".to_string())
}
