//! Reporting of validation results.
//!
//! Results arrive sorted (see [`MessageSorter`]); formatters render them
//! as they are, optionally grouped, and never reorder.

pub mod group;
pub mod human;
pub mod json;
pub mod sarif;
pub mod sort;
pub mod theme;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::validate::ValidationResult;

pub use group::{group_messages, group_pattern, Grouping, MessageGroup};
pub use human::HumanFormatter;
pub use json::JsonFormatter;
pub use sarif::SarifFormatter;
pub use sort::MessageSorter;
pub use theme::{should_use_colors, ReportTheme};

/// Output format for reports.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Sarif,
}

/// Options shared by formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Render groups of similar messages.
    pub group: bool,
    /// Include suggestions.
    pub suggestions: bool,
    /// Source lines shown around each message (human report only).
    pub context_lines: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            group: false,
            suggestions: true,
            context_lines: 0,
        }
    }
}

/// Trait for formatting validation results.
pub trait ReportFormatter {
    /// Format `result` to the given writer.
    fn format<W: Write>(&self, result: &ValidationResult, writer: &mut W) -> std::io::Result<()>;
}
