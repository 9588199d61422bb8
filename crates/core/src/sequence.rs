// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-migration sequencing rules.
//!
//! Each migration name moves through `never run → up ⇄ down`. Only the
//! most recent finalized task for that name matters: `up` is legal when the
//! migration has never run or was last taken down, `down` only when it was
//! last taken up.

use crate::task::{Direction, Task};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("migration {name} was already run {direction}; it cannot run {direction} twice in a row")]
    RunTwice { name: String, direction: Direction },
    #[error("migration {name} has never run up, so it cannot run down")]
    FirstDown { name: String },
}

/// Check that `task` may follow `last`, the latest finalized task for the
/// same migration name.
pub fn check_sequence(last: Option<&Task>, task: &Task) -> Result<(), SequenceError> {
    match (last.map(|t| t.direction), task.direction) {
        (None, Direction::Down) => Err(SequenceError::FirstDown {
            name: task.name().to_string(),
        }),
        (Some(prev), next) if prev == next => Err(SequenceError::RunTwice {
            name: task.name().to_string(),
            direction: next,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
