//! Human-readable output formatter.
//!
//! Formats validation results for terminal display with optional color,
//! source excerpts and suggestions.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::group::{group_messages, MessageGroup};
use super::theme::ReportTheme;
use super::{ReportFormatter, ReportOptions};
use crate::validate::{Severity, Suggestion, ValidationMessage, ValidationResult};

/// Formats results for human consumption.
pub struct HumanFormatter {
    theme: ReportTheme,
    options: ReportOptions,
    /// Source text per file, for excerpts.
    sources: HashMap<PathBuf, String>,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool, options: ReportOptions) -> Self {
        Self {
            theme: ReportTheme::for_color(use_color),
            options,
            sources: HashMap::new(),
        }
    }

    /// Provide the text of `path` for source excerpts.
    pub fn with_source(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.add_source(path, text);
        self
    }

    pub fn add_source(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.sources.insert(path.into(), text.into());
    }

    fn write_header<W: Write>(&self, w: &mut W, result: &ValidationResult) -> std::io::Result<()> {
        let title = format!(
            "docrule report: {} file(s), {} message(s)",
            result.files().len(),
            result.messages().len()
        );
        let bar = "─".repeat(title.chars().count() + 2);
        let edge = |s: &str| self.theme.border.apply_to(s.to_string()).to_string();

        writeln!(w, "{}", edge(&format!("╭{}╮", bar)))?;
        writeln!(
            w,
            "{} {} {}",
            edge("│"),
            self.theme.header.apply_to(&title),
            edge("│")
        )?;
        writeln!(w, "{}", edge(&format!("╰{}╯", bar)))?;
        writeln!(w)
    }

    fn write_message<W: Write>(&self, w: &mut W, m: &ValidationMessage) -> std::io::Result<()> {
        writeln!(
            w,
            "  {} {} {}",
            self.theme.format_severity(m.severity()),
            self.theme.dim.apply_to(format!("[{}]", m.rule_id())),
            m.message()
        )?;
        writeln!(
            w,
            "        at {}",
            self.theme.location.apply_to(m.location().to_string())
        )?;
        if let Some(actual) = m.actual() {
            writeln!(w, "        actual:   {}", actual)?;
        }
        if let Some(expected) = m.expected() {
            writeln!(w, "        expected: {}", expected)?;
        }
        if let Some(cause) = m.cause() {
            writeln!(w, "        cause:    {}", cause)?;
        }
        self.write_context(w, m)?;
        if self.options.suggestions {
            for suggestion in m.suggestions() {
                self.write_suggestion(w, suggestion, "        ")?;
            }
        }
        Ok(())
    }

    fn write_suggestion<W: Write>(
        &self,
        w: &mut W,
        suggestion: &Suggestion,
        indent: &str,
    ) -> std::io::Result<()> {
        writeln!(
            w,
            "{}{} {}",
            indent,
            self.theme.hint.apply_to("= help:"),
            suggestion.description()
        )?;
        for example in suggestion.examples() {
            writeln!(w, "{}    e.g. {}", indent, example)?;
        }
        if let Some(explanation) = suggestion.explanation() {
            writeln!(w, "{}    {}", indent, self.theme.dim.apply_to(explanation))?;
        }
        Ok(())
    }

    fn write_context<W: Write>(&self, w: &mut W, m: &ValidationMessage) -> std::io::Result<()> {
        let context = self.options.context_lines;
        if context == 0 {
            return Ok(());
        }
        let location = m.location();
        let Some(source) = self.source_for(&location.file) else {
            return Ok(());
        };

        let lines: Vec<&str> = source.lines().collect();
        if location.line == 0 || location.line > lines.len() {
            return Ok(());
        }
        let first = location.line.saturating_sub(context).max(1);
        let last = (location.line + context).min(lines.len());
        let width = last.to_string().len();

        for number in first..=last {
            let text = lines[number - 1];
            if number == location.line {
                writeln!(
                    w,
                    "      {} {:>width$} │ {}",
                    self.theme.severity(m.severity()).apply_to(">"),
                    number,
                    self.theme.highlight.apply_to(text),
                    width = width
                )?;
                if let Some(start) = location.start_col.filter(|c| *c > 0) {
                    let end = location.end_col.filter(|e| *e > start).unwrap_or(start);
                    writeln!(
                        w,
                        "        {:>width$} │ {}{}",
                        "",
                        " ".repeat(start - 1),
                        self.theme
                            .severity(m.severity())
                            .apply_to("^".repeat(end - start + 1)),
                        width = width
                    )?;
                }
            } else {
                writeln!(
                    w,
                    "        {} │ {}",
                    self.theme.dim.apply_to(format!("{:>width$}", number, width = width)),
                    text
                )?;
            }
        }
        Ok(())
    }

    fn source_for(&self, file: &Path) -> Option<&str> {
        self.sources.get(file).map(String::as_str)
    }

    fn write_by_file<W: Write>(&self, w: &mut W, result: &ValidationResult) -> std::io::Result<()> {
        let mut current: Option<&Path> = None;
        for m in result.messages() {
            let file = m.location().file.as_path();
            if current != Some(file) {
                if current.is_some() {
                    writeln!(w)?;
                }
                writeln!(w, "{}", self.theme.header.apply_to(file.display()))?;
                current = Some(file);
            }
            self.write_message(w, m)?;
        }
        if current.is_some() {
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_groups<W: Write>(&self, w: &mut W, result: &ValidationResult) -> std::io::Result<()> {
        let grouping = group_messages(result.messages());

        for group in &grouping.groups {
            self.write_group(w, group)?;
            writeln!(w)?;
        }
        if !grouping.ungrouped.is_empty() {
            if !grouping.groups.is_empty() {
                writeln!(w, "{}", self.theme.header.apply_to("Other messages"))?;
            }
            for m in &grouping.ungrouped {
                self.write_message(w, m)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_group<W: Write>(&self, w: &mut W, group: &MessageGroup<'_>) -> std::io::Result<()> {
        let worst = group
            .members
            .iter()
            .map(|m| m.severity())
            .max()
            .unwrap_or(Severity::Info);
        writeln!(
            w,
            "{} {} {} {}",
            self.theme.format_severity(worst),
            self.theme.dim.apply_to(format!("[{}]", group.rule_id)),
            self.theme.header.apply_to(&group.pattern),
            self.theme.dim.apply_to(format!("({} occurrences)", group.len()))
        )?;
        for m in &group.members {
            match m.actual() {
                Some(actual) => writeln!(
                    w,
                    "    {}  {}",
                    self.theme.location.apply_to(m.location().to_string()),
                    actual
                )?,
                None => writeln!(
                    w,
                    "    {}",
                    self.theme.location.apply_to(m.location().to_string())
                )?,
            }
        }
        if self.options.suggestions {
            if let Some(fix) = group.fix {
                self.write_suggestion(w, fix, "    ")?;
            }
        }
        Ok(())
    }

    fn write_summary<W: Write>(&self, w: &mut W, result: &ValidationResult) -> std::io::Result<()> {
        let counts = result.counts();
        let files = result.files().len();
        if result.is_clean() {
            return writeln!(
                w,
                "{}",
                self.theme
                    .success
                    .apply_to(format!("✓ No problems found in {} file(s)", files))
            );
        }
        writeln!(
            w,
            "Found {}, {} and {} in {} file(s) {}",
            self.theme
                .error
                .apply_to(format!("{} error(s)", counts.errors)),
            self.theme
                .warning
                .apply_to(format!("{} warning(s)", counts.warnings)),
            self.theme.info.apply_to(format!("{} info(s)", counts.infos)),
            files,
            self.theme
                .dim
                .apply_to(format!("({} ms)", result.duration().as_millis()))
        )
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(&self, result: &ValidationResult, writer: &mut W) -> std::io::Result<()> {
        self.write_header(writer, result)?;
        if self.options.group {
            self.write_groups(writer, result)?;
        } else {
            self.write_by_file(writer, result)?;
        }
        self.write_summary(writer, result)
    }
}
