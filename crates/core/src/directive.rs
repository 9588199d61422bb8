// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directive syntax embedded in commit messages.
//!
//! A directive block names one direction and one or more migrations:
//!
//! ```text
//! [cairn up 3f2a 9c1e]
//! ```
//!
//! Long blocks are wrapped one item per line:
//!
//! ```text
//! [
//!   cairn up
//!   0b6a3a4e-5d39-4b0b-9a7e-1e9f3a5d7c21
//!   7c0d2f0b-1b9e-4f5b-8a3b-2c6e0f9d4e18
//! ]
//! ```

use crate::task::{Direction, Migration, Task, TaskList};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Leading keyword that marks a bracketed block as a directive.
pub const KEYWORD: &str = "cairn";

/// Single-line blocks longer than this are rendered in multi-line form.
pub const WRAP_WIDTH: usize = 72;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\[\s*{}(\s|\])", KEYWORD)).expect("constant regex pattern is valid")
});

/// Errors for directive blocks that start with the keyword but are malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("directive at offset {offset} is missing its closing ']'")]
    Unterminated { offset: usize },
    #[error("directive at offset {offset} has no direction")]
    MissingDirection { offset: usize },
    #[error("directive at offset {offset} has unknown direction '{word}'")]
    UnknownDirection { offset: usize, word: String },
    #[error("directive at offset {offset} names no migrations")]
    MissingNames { offset: usize },
    #[error("directive at offset {offset} contains a nested '['")]
    Nested { offset: usize },
}

/// Result of scanning a commit message.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMessage {
    /// Tasks in the order their directives appeared
    pub tasks: TaskList,
    /// The message with every directive block removed
    pub text: String,
}

/// Extract directives from a commit message.
///
/// An empty task list is a valid result; a block that opens with the keyword
/// but cannot be read is an error.
pub fn parse(message: &str) -> Result<ParsedMessage, ParseError> {
    let mut tasks = TaskList::new();
    let mut text = String::with_capacity(message.len());
    let mut cursor = 0;

    while let Some(caps) = OPENER.captures_at(message, cursor) {
        let (Some(whole), Some(sep)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let offset = whole.start();
        let body_start = sep.start();
        let body_len = message[body_start..]
            .find(']')
            .ok_or(ParseError::Unterminated { offset })?;
        let body = &message[body_start..body_start + body_len];
        if body.contains('[') {
            return Err(ParseError::Nested { offset });
        }

        let mut words = body.split_whitespace();
        let word = words.next().ok_or(ParseError::MissingDirection { offset })?;
        let direction: Direction = word.parse().map_err(|_| ParseError::UnknownDirection {
            offset,
            word: word.to_string(),
        })?;
        let before = tasks.len();
        for name in words {
            tasks.push(Task::new(direction, Migration::new(name)));
        }
        if tasks.len() == before {
            return Err(ParseError::MissingNames { offset });
        }

        text.push_str(&message[cursor..offset]);
        cursor = body_start + body_len + 1;
    }
    text.push_str(&message[cursor..]);

    Ok(ParsedMessage {
        tasks,
        text: tidy(&text),
    })
}

/// Render tasks as directive blocks, one block per run of same-direction
/// tasks.
pub fn render(tasks: &TaskList) -> String {
    let mut blocks: Vec<(Direction, Vec<&str>)> = Vec::new();
    for task in tasks {
        match blocks.last_mut() {
            Some((direction, names)) if *direction == task.direction => {
                names.push(task.name());
            }
            _ => blocks.push((task.direction, vec![task.name()])),
        }
    }
    blocks
        .iter()
        .map(|(direction, names)| render_block(*direction, names))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(direction: Direction, names: &[&str]) -> String {
    let single = format!("[{} {} {}]", KEYWORD, direction, names.join(" "));
    if single.len() <= WRAP_WIDTH {
        return single;
    }
    let mut out = format!("[\n  {} {}\n", KEYWORD, direction);
    for name in names {
        out.push_str("  ");
        out.push_str(name);
        out.push('\n');
    }
    out.push(']');
    out
}

/// Drop trailing whitespace on each line and trailing blank lines.
fn tidy(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

#[cfg(test)]
#[path = "directive_tests.rs"]
mod tests;
