// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Applied-migration bookkeeping.
//!
//! Every backend keeps one table, `cairn_meta`, with a row per task. A row
//! without `applied_at` is a pending task; at most one may exist at a time,
//! which is what serializes concurrent runs across processes.

mod connect;
mod env;
mod error;
mod postgres;
mod row;
mod sqlite;
mod store;
mod traced;

pub use connect::{connect, Backend};
pub use error::StoreError;
pub use postgres::PostgresStore;
pub use row::TABLE;
pub use sqlite::SqliteStore;
pub use store::MigrationStore;
pub use traced::TracedStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod memory;
#[cfg(any(test, feature = "test-support"))]
pub use memory::{MemoryStore, StoreCall};
