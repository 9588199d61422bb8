// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Plan resolution and execution for cairn.
//!
//! [`get_status`] compares the last applied task with git history to find
//! the work still to do; [`Coordinator`] runs it against a shared store.

mod coordinator;
mod env;
mod error;
mod generate;
mod prepare;
mod status;
mod wait;

#[cfg(test)]
mod test_helpers;

pub use coordinator::{Coordinator, RunEvent, RunOptions, RunSummary};
pub use error::RunError;
pub use generate::{generate, GenerateError, DEFAULT_TEMPLATE};
pub use prepare::{prepare_commit_message, MessageSource, PrepareError, PrepareOutcome};
pub use status::{get_status, Status};
pub use wait::{Poller, Tick};
