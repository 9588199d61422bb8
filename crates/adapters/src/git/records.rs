// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental splitting of `git log` output into per-commit records.
//!
//! The log is requested with `--format=%x1e%H%n%B`, so every record starts
//! with a line holding the ASCII record separator followed by the hash. The
//! reader is fed one line at a time as the process produces output and
//! emits each record once the next separator shows up; the last record is
//! flushed by [`RecordReader::finish`].

/// Record separator that prefixes each commit hash.
pub const RECORD_MARK: char = '\u{1e}';

/// `git log --format` string producing the record layout.
pub const LOG_FORMAT: &str = "--format=%x1e%H%n%B";

/// One commit's raw log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RecordReader {
    current: Option<CommitRecord>,
}

impl RecordReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its newline). Returns the previous record when
    /// this line starts a new one.
    pub fn push_line(&mut self, line: &str) -> Option<CommitRecord> {
        if let Some(id) = line.strip_prefix(RECORD_MARK) {
            let next = CommitRecord {
                id: id.trim().to_string(),
                message: String::new(),
            };
            return self.current.replace(next).map(finalize);
        }
        // Text before the first separator carries no commit
        if let Some(record) = self.current.as_mut() {
            record.message.push_str(line);
            record.message.push('\n');
        }
        None
    }

    /// Flush the record in progress at end of output.
    pub fn finish(&mut self) -> Option<CommitRecord> {
        self.current.take().map(finalize)
    }
}

fn finalize(mut record: CommitRecord) -> CommitRecord {
    let trimmed = record.message.trim_end().len();
    record.message.truncate(trimmed);
    record
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
