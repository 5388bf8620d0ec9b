//! Source positions and locations.
//!
//! A [`Position`] is what a parsed node carries (line and optional column
//! span); a [`SourceLocation`] adds the file and is what messages report.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Position of a node inside its source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Position {
    /// Line (1-indexed).
    pub line: usize,
    /// Starting column (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Ending column (1-indexed, inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

impl Default for Position {
    fn default() -> Self {
        Self::line(1)
    }
}

impl Position {
    /// A position covering a whole line.
    pub fn line(line: usize) -> Self {
        Self {
            line,
            column: None,
            end_column: None,
        }
    }

    /// A position with a column span.
    pub fn span(line: usize, column: usize, end_column: usize) -> Self {
        Self {
            line,
            column: Some(column),
            end_column: Some(end_column),
        }
    }
}

/// A location in a file, as reported on messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    /// File path.
    pub file: PathBuf,
    /// Starting line (1-indexed).
    pub line: usize,
    /// Starting column (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_col: Option<usize>,
    /// Ending column (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_col: Option<usize>,
}

impl SourceLocation {
    /// Create a location covering a single line.
    pub fn line(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
            start_col: None,
            end_col: None,
        }
    }

    /// Create a location with a column span.
    pub fn new(file: impl Into<PathBuf>, line: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            file: file.into(),
            line,
            start_col: Some(start_col),
            end_col: Some(end_col),
        }
    }

    /// Locate a node position inside `file`.
    pub fn at(file: impl Into<PathBuf>, position: &Position) -> Self {
        Self {
            file: file.into(),
            line: position.line,
            start_col: position.column,
            end_col: position.end_column,
        }
    }

    /// Start column used for ordering; a missing column sorts first.
    pub fn sort_column(&self) -> usize {
        self.start_col.unwrap_or(0)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)?;
        match (self.start_col, self.end_col) {
            (Some(start), Some(end)) if end > start => write!(f, ":{}-{}", start, end),
            (Some(start), _) => write!(f, ":{}", start),
            _ => Ok(()),
        }
    }
}
