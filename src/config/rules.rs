//! The rule tree: metadata attribute rules and nested section rules.

use std::collections::HashMap;

use super::blocks::BlockRule;
use super::constraints::{OccurrenceRule, OrderRule, Pattern};
use crate::error::{DocruleError, Result};
use crate::validate::Severity;

/// Complete rule configuration for one kind of document.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub metadata: MetadataRules,
    /// Top-level section rules in authoring order. Level-0 entries
    /// describe the document root.
    pub sections: Vec<SectionRule>,
}

impl RuleSet {
    pub fn new(metadata: MetadataRules, sections: Vec<SectionRule>) -> Self {
        Self { metadata, sections }
    }
}

/// Rules for header attributes.
#[derive(Debug, Clone, Default)]
pub struct MetadataRules {
    attributes: Vec<AttributeConfig>,
}

impl MetadataRules {
    /// Build from attribute configs; names must be unique.
    pub fn new(attributes: Vec<AttributeConfig>) -> Result<Self> {
        for (idx, attr) in attributes.iter().enumerate() {
            if attributes[..idx].iter().any(|a| a.name == attr.name) {
                return Err(DocruleError::invalid_config(format!(
                    "attribute '{}' is configured more than once",
                    attr.name
                )));
            }
        }
        Ok(Self { attributes })
    }

    pub fn attributes(&self) -> &[AttributeConfig] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&AttributeConfig> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// 1-based declaration index per attribute name, used to order
    /// attribute messages that share a location.
    pub fn priorities(&self) -> HashMap<String, usize> {
        self.attributes
            .iter()
            .enumerate()
            .map(|(idx, attr)| (attr.name.clone(), idx + 1))
            .collect()
    }
}

/// Constraints on one header attribute.
#[derive(Debug, Clone)]
pub struct AttributeConfig {
    name: String,
    order: Option<u32>,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Pattern>,
    severity: Severity,
}

impl AttributeConfig {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DocruleError::invalid_config("attribute name must not be empty"));
        }
        Ok(Self {
            name,
            order: None,
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            severity: Severity::Error,
        })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Result<Self> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(DocruleError::invalid_config(format!(
                    "attribute '{}': minLength ({}) is greater than maxLength ({})",
                    self.name, min, max
                )));
            }
        }
        self.min_length = min;
        self.max_length = max;
        Ok(self)
    }

    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> Option<u32> {
        self.order
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// Title constraint of a section rule.
///
/// Unlike attribute and block field patterns, which must match the whole
/// value, a title pattern only has to occur somewhere in the title:
/// `Intro` accepts "Introduction" and "A short Intro". Anchor it
/// (`^Intro$`) to require an exact title.
#[derive(Debug, Clone)]
pub struct TitleRule {
    pattern: Pattern,
    severity: Severity,
}

impl TitleRule {
    pub fn new(pattern: &str, severity: Severity) -> Result<Self> {
        Ok(Self {
            pattern: Pattern::new(pattern)?,
            severity,
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Titles match when the pattern occurs in them; a missing title never
    /// matches.
    pub fn accepts(&self, title: Option<&str>) -> bool {
        title.is_some_and(|t| self.pattern.is_found(t))
    }
}

/// Expected section at a nesting level.
#[derive(Debug, Clone)]
pub struct SectionRule {
    name: String,
    level: u32,
    order: Option<u32>,
    occurrence: OccurrenceRule,
    title: Option<TitleRule>,
    blocks: Vec<BlockRule>,
    block_order: Option<OrderRule>,
    subsections: Vec<SectionRule>,
}

impl SectionRule {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
            order: None,
            occurrence: OccurrenceRule::default(),
            title: None,
            blocks: Vec::new(),
            block_order: None,
            subsections: Vec::new(),
        }
    }

    /// Rule for the document root (level 0).
    pub fn root(name: impl Into<String>) -> Self {
        Self::new(name, 0)
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_occurrence(mut self, occurrence: OccurrenceRule) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn with_title(mut self, title: TitleRule) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_block(mut self, block: BlockRule) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_block_order(mut self, order: OrderRule) -> Self {
        self.block_order = Some(order);
        self
    }

    /// Add a nested rule; it must sit deeper than this one.
    pub fn with_subsection(mut self, subsection: SectionRule) -> Result<Self> {
        if subsection.level <= self.level {
            return Err(DocruleError::invalid_config(format!(
                "subsection '{}' (level {}) must be deeper than '{}' (level {})",
                subsection.name, subsection.level, self.name, self.level
            )));
        }
        self.subsections.push(subsection);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn order(&self) -> Option<u32> {
        self.order
    }

    pub fn occurrence(&self) -> &OccurrenceRule {
        &self.occurrence
    }

    pub fn title(&self) -> Option<&TitleRule> {
        self.title.as_ref()
    }

    pub fn blocks(&self) -> &[BlockRule] {
        &self.blocks
    }

    pub fn block_order(&self) -> Option<&OrderRule> {
        self.block_order.as_ref()
    }

    pub fn subsections(&self) -> &[SectionRule] {
        &self.subsections
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    /// Whether a node at `level` with `title` matches this rule.
    pub fn accepts(&self, level: u32, title: Option<&str>) -> bool {
        self.level == level && self.title.as_ref().is_none_or(|t| t.accepts(title))
    }
}
