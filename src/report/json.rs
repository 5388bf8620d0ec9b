//! JSON output formatter.
//!
//! Formats validation results as machine-readable JSON for tooling
//! integration.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::group::group_messages;
use super::{ReportFormatter, ReportOptions};
use crate::document::BlockType;
use crate::validate::{ErrorKind, Suggestion, ValidationMessage, ValidationResult};

/// Formats results as JSON.
pub struct JsonFormatter {
    options: ReportOptions,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    timestamp: DateTime<Utc>,
    duration_ms: u64,
    summary: JsonSummary,
    files: Vec<String>,
    messages: Vec<JsonMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<Vec<JsonGroup<'a>>>,
}

#[derive(Serialize)]
struct JsonSummary {
    files: usize,
    total: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
}

#[derive(Serialize)]
struct JsonMessage<'a> {
    rule_id: &'a str,
    severity: &'static str,
    message: &'a str,
    file: String,
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    block_type: Option<BlockType>,
    #[serde(skip_serializing_if = "no_suggestions")]
    suggestions: &'a [Suggestion],
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    rule_id: &'a str,
    message: String,
    count: usize,
    locations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a Suggestion>,
}

fn no_suggestions(suggestions: &&[Suggestion]) -> bool {
    suggestions.is_empty()
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    fn message<'a>(&self, m: &'a ValidationMessage) -> JsonMessage<'a> {
        let location = m.location();
        JsonMessage {
            rule_id: m.rule_id().as_str(),
            severity: m.severity().label(),
            message: m.message(),
            file: location.file.display().to_string(),
            line: location.line,
            column: location.start_col,
            end_column: location.end_col,
            attribute: m.attribute(),
            actual: m.actual(),
            expected: m.expected(),
            kind: m.kind(),
            block_type: m.block_type(),
            suggestions: if self.options.suggestions {
                m.suggestions()
            } else {
                &[]
            },
            cause: m.cause(),
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(&self, result: &ValidationResult, writer: &mut W) -> std::io::Result<()> {
        let counts = result.counts();

        let groups: Option<Vec<JsonGroup<'_>>> = self.options.group.then(|| {
            group_messages(result.messages())
                .groups
                .into_iter()
                .map(|g| JsonGroup {
                    rule_id: g.rule_id.as_str(),
                    count: g.len(),
                    locations: g.members.iter().map(|m| m.location().to_string()).collect(),
                    fix: g.fix.filter(|_| self.options.suggestions),
                    message: g.pattern,
                })
                .collect()
        });

        let output = JsonOutput {
            timestamp: result.completed_at(),
            duration_ms: u64::try_from(result.duration().as_millis()).unwrap_or(u64::MAX),
            summary: JsonSummary {
                files: result.files().len(),
                total: counts.total(),
                errors: counts.errors,
                warnings: counts.warnings,
                infos: counts.infos,
            },
            files: result
                .files()
                .iter()
                .map(|f| f.display().to_string())
                .collect(),
            messages: result.messages().iter().map(|m| self.message(m)).collect(),
            groups,
        };

        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)?;

        Ok(())
    }
}
