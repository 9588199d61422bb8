// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::task::Direction;

#[test]
fn parse_extracts_tasks_pointing_at_commit() {
    let commit = Commit::parse("abc1234def", "add users table\n\n[cairn up 3f2a]").unwrap();

    assert_eq!(commit.tasks().len(), 1);
    let task = &commit.tasks()[0];
    assert_eq!(task.direction, Direction::Up);
    assert_eq!(task.name(), "3f2a");
    assert_eq!(task.commit.as_ref().map(Commit::id), Some("abc1234def"));
}

#[test]
fn parse_propagates_directive_errors() {
    let err = Commit::parse("abc", "oops [cairn sideways x]").unwrap_err();
    assert!(matches!(err, ParseError::UnknownDirection { .. }));
}

#[test]
fn subject_is_first_line() {
    let commit = Commit::parse("abc", "first line\nsecond line").unwrap();
    assert_eq!(commit.subject(), Some("first line"));
}

#[test]
fn bare_commit_has_no_message_until_set() {
    let commit = Commit::new("abc");
    assert_eq!(commit.message(), None);
    assert_eq!(commit.subject(), None);

    assert_eq!(commit.set_message("hello\nworld".to_string()), "hello\nworld");
    assert_eq!(commit.subject(), Some("hello"));
}

#[test]
fn message_is_memoized() {
    let commit = Commit::new("abc");
    commit.set_message("first".to_string());
    assert_eq!(commit.set_message("second".to_string()), "first");
}

#[test]
fn equality_is_by_id() {
    let a = Commit::new("abc");
    let b = Commit::parse("abc", "with message").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, Commit::new("def"));
}

#[yare::parameterized(
    long  = { "0123456789abcdef", "0123456" },
    short = { "abc", "abc" },
)]
fn short_id_truncates(id: &str, expected: &str) {
    assert_eq!(Commit::new(id).short_id(), expected);
}

#[test]
fn display_includes_subject_when_loaded() {
    let commit = Commit::parse("0123456789", "add users").unwrap();
    assert_eq!(commit.to_string(), "0123456 \"add users\"");
    assert_eq!(Commit::new("0123456789").to_string(), "0123456");
}

#[test]
fn forward_sequence_keeps_directions_and_order() {
    let seq = CommitSequence::forward(vec![
        Commit::parse("c2", "[cairn up a b]").unwrap(),
        Commit::parse("c3", "[cairn down c]").unwrap(),
    ]);

    let tasks = seq.tasks_to_execute();
    assert_eq!(
        tasks.directives(),
        vec![
            (Direction::Up, "a".to_string()),
            (Direction::Up, "b".to_string()),
            (Direction::Down, "c".to_string()),
        ]
    );
}

#[test]
fn reversed_sequence_inverts_directions_in_commit_order() {
    let seq = CommitSequence::reversed(vec![
        Commit::parse("c2", "[cairn up a]").unwrap(),
        Commit::parse("c3", "[cairn up b]").unwrap(),
    ]);

    let tasks = seq.tasks_to_execute();
    assert_eq!(
        tasks.directives(),
        vec![
            (Direction::Down, "a".to_string()),
            (Direction::Down, "b".to_string()),
        ]
    );
    let commits: Vec<_> = tasks
        .iter()
        .map(|t| t.commit.as_ref().map(|c| c.id().to_string()))
        .collect();
    assert_eq!(commits, vec![Some("c2".to_string()), Some("c3".to_string())]);
}

#[test]
fn empty_sequence_has_no_tasks() {
    let seq = CommitSequence::default();
    assert!(seq.is_empty());
    assert!(!seq.is_reversed);
    assert!(seq.tasks_to_execute().is_empty());
}
