//! Validation messages.
//!
//! A [`ValidationMessage`] is produced by exactly one check and never
//! changes afterwards: fields are private, and the `with_*` methods consume
//! the message while it is being built.

use serde::Serialize;

use super::rule::{RuleId, Severity};
use crate::document::{BlockType, SourceLocation};

/// Category of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    MissingValue,
    InvalidPattern,
    TooShort,
    TooLong,
    OutOfRange,
    NotAllowed,
    TooFew,
    TooMany,
    Order,
    TitleMismatch,
    Ambiguous,
    Parse,
    Io,
}

impl ErrorKind {
    /// Occurrence violations get the block-type sort key.
    pub fn is_occurrence(self) -> bool {
        matches!(self, ErrorKind::TooFew | ErrorKind::TooMany)
    }
}

/// A proposed fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

impl Suggestion {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            examples: Vec::new(),
            explanation: None,
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

/// One reported rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    severity: Severity,
    rule_id: RuleId,
    message: String,
    location: SourceLocation,
    attribute: Option<String>,
    actual: Option<String>,
    expected: Option<String>,
    kind: Option<ErrorKind>,
    block_type: Option<BlockType>,
    suggestions: Vec<Suggestion>,
    cause: Option<String>,
}

impl ValidationMessage {
    /// Create a new message.
    pub fn new(
        rule_id: impl Into<RuleId>,
        severity: Severity,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            severity,
            rule_id: rule_id.into(),
            message: message.into(),
            location,
            attribute: None,
            actual: None,
            expected: None,
            kind: None,
            block_type: None,
            suggestions: Vec::new(),
            cause: None,
        }
    }

    /// Name the attribute this message is about.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_block_type(mut self, block_type: BlockType) -> Self {
        self.block_type = Some(block_type);
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Record the underlying cause (e.g. an I/O error text).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn actual(&self) -> Option<&str> {
        self.actual.as_deref()
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.block_type
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        RuleId::new(id)
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        RuleId(id)
    }
}
