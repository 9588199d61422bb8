// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: git history and migration scripts

mod env;
pub mod git;
pub mod script;
pub mod subprocess;
pub mod traced;

pub use git::{GitAdapter, GitCli, GitError};
pub use script::{
    run_supervised, LoadedMigration, MigrationError, MigrationSource, ScriptSource,
    MANIFEST_EXTENSION,
};
pub use traced::TracedSource;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use git::{FakeGit, GitCall};
#[cfg(any(test, feature = "test-support"))]
pub use script::{FakeMigrationSource, FakeOutcome, SourceCall};
