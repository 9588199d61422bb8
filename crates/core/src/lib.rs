// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cairn-core: value types shared by every cairn crate
//!
//! Commits, tasks and the directive syntax that links them live here, along
//! with the per-migration sequencing rules and the repository configuration.

pub mod commit;
pub mod config;
pub mod directive;
pub mod sequence;
pub mod task;

pub use commit::{Commit, CommitSequence};
pub use config::{Config, ConfigError, CONFIG_FILE};
pub use directive::{ParseError, ParsedMessage, KEYWORD};
pub use sequence::{check_sequence, SequenceError};
pub use task::{Direction, Migration, Task, TaskList, UnknownDirection};
