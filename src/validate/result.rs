//! Validation results.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::message::ValidationMessage;
use super::rule::Severity;
use crate::report::MessageSorter;

/// Message counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl SeverityCounts {
    pub fn tally(messages: &[ValidationMessage]) -> Self {
        let mut counts = Self::default();
        for message in messages {
            match message.severity() {
                Severity::Error => counts.errors += 1,
                Severity::Warn => counts.warnings += 1,
                Severity::Info => counts.infos += 1,
            }
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.errors,
            Severity::Warn => self.warnings,
            Severity::Info => self.infos,
        }
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Outcome of validating one or more documents. Messages are sorted.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    files: Vec<PathBuf>,
    messages: Vec<ValidationMessage>,
    counts: SeverityCounts,
    duration: Duration,
    completed_at: DateTime<Utc>,
}

impl ValidationResult {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn is_clean(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether any message is at least as severe as `fail_level`.
    pub fn has_failures(&self, fail_level: Severity) -> bool {
        self.messages.iter().any(|m| m.severity() >= fail_level)
    }
}

/// Collects files and messages; `finish` sorts and seals them.
#[derive(Debug)]
pub struct ValidationResultBuilder {
    files: Vec<PathBuf>,
    messages: Vec<ValidationMessage>,
    started: Instant,
}

impl Default for ValidationResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResultBuilder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            messages: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn add_file(&mut self, file: impl AsRef<Path>) -> &mut Self {
        self.files.push(file.as_ref().to_path_buf());
        self
    }

    pub fn add_messages(
        &mut self,
        messages: impl IntoIterator<Item = ValidationMessage>,
    ) -> &mut Self {
        self.messages.extend(messages);
        self
    }

    pub fn finish(self, sorter: &MessageSorter) -> ValidationResult {
        let mut messages = self.messages;
        sorter.sort(&mut messages);
        let counts = SeverityCounts::tally(&messages);

        ValidationResult {
            files: self.files,
            messages,
            counts,
            duration: self.started.elapsed(),
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SourceLocation;

    fn message(severity: Severity, line: usize) -> ValidationMessage {
        ValidationMessage::new(
            "pattern",
            severity,
            "Bad",
            SourceLocation::line("guide.adoc", line),
        )
    }

    #[test]
    fn counts_by_severity() {
        let counts = SeverityCounts::tally(&[
            message(Severity::Error, 1),
            message(Severity::Warn, 2),
            message(Severity::Warn, 3),
        ]);
        assert_eq!(counts.errors, 1);
        assert_eq!(counts.get(Severity::Warn), 2);
        assert_eq!(counts.infos, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn finish_sorts_messages() {
        let mut builder = ValidationResultBuilder::new();
        builder
            .add_file("guide.adoc")
            .add_messages(vec![message(Severity::Info, 9), message(Severity::Error, 2)]);
        let result = builder.finish(&MessageSorter::default());

        assert_eq!(result.files().len(), 1);
        let lines: Vec<usize> = result.messages().iter().map(|m| m.location().line).collect();
        assert_eq!(lines, [2, 9]);
        assert_eq!(result.counts().total(), 2);
    }

    #[test]
    fn failure_threshold() {
        let mut builder = ValidationResultBuilder::new();
        builder.add_messages(vec![message(Severity::Warn, 1)]);
        let result = builder.finish(&MessageSorter::default());

        assert!(!result.has_failures(Severity::Error));
        assert!(result.has_failures(Severity::Warn));
        assert!(result.has_failures(Severity::Info));
    }

    #[test]
    fn empty_result_is_clean() {
        let result = ValidationResultBuilder::new().finish(&MessageSorter::default());
        assert!(result.is_clean());
        assert!(!result.has_failures(Severity::Info));
    }
}
