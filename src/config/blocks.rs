//! Block rules.
//!
//! A [`BlockRule`] pairs the settings every block rule has (severity,
//! occurrence, optional name) with a [`BlockSpec`] variant holding the
//! type-specific field constraints. The block type is derived from the
//! variant, so it cannot disagree with the fields.

use super::constraints::{AllowList, CountRange, OccurrenceRule, TextRule};
use crate::document::{Block, BlockType};
use crate::validate::Severity;

#[derive(Debug, Clone, Default)]
pub struct ParagraphRules {
    pub lines: Option<CountRange>,
    pub sentences: Option<CountRange>,
    /// Words per sentence.
    pub words: Option<CountRange>,
    pub content: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct ListingRules {
    pub title: Option<TextRule>,
    pub language: Option<AllowList>,
    pub lines: Option<CountRange>,
    pub callouts: Option<CountRange>,
}

#[derive(Debug, Clone, Default)]
pub struct TableRules {
    pub columns: Option<CountRange>,
    pub rows: Option<CountRange>,
    pub caption: Option<TextRule>,
    pub header_required: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ImageRules {
    pub url: Option<TextRule>,
    pub width: Option<CountRange>,
    pub height: Option<CountRange>,
    pub alt: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct VerseRules {
    pub author: Option<TextRule>,
    pub attribution: Option<TextRule>,
    pub content: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct AdmonitionRules {
    pub variant: Option<AllowList>,
    pub title: Option<TextRule>,
    pub content: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct PassRules {
    pub content: Option<TextRule>,
    pub reason: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct LiteralRules {
    pub title: Option<TextRule>,
    pub lines: Option<CountRange>,
}

#[derive(Debug, Clone, Default)]
pub struct AudioRules {
    pub url: Option<TextRule>,
    pub title: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteRules {
    pub author: Option<TextRule>,
    pub citation: Option<TextRule>,
    pub content: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct SidebarRules {
    pub title: Option<TextRule>,
    pub content: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct ExampleRules {
    pub title: Option<TextRule>,
    pub caption: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct VideoRules {
    pub url: Option<TextRule>,
    pub width: Option<CountRange>,
    pub height: Option<CountRange>,
    pub caption: Option<TextRule>,
}

#[derive(Debug, Clone, Default)]
pub struct UlistRules {
    pub items: Option<CountRange>,
}

/// Type-specific constraints, one variant per block type.
#[derive(Debug, Clone)]
pub enum BlockSpec {
    Paragraph(ParagraphRules),
    Listing(ListingRules),
    Table(TableRules),
    Image(ImageRules),
    Verse(VerseRules),
    Admonition(AdmonitionRules),
    Pass(PassRules),
    Literal(LiteralRules),
    Audio(AudioRules),
    Quote(QuoteRules),
    Sidebar(SidebarRules),
    Example(ExampleRules),
    Video(VideoRules),
    Ulist(UlistRules),
}

impl BlockSpec {
    /// A variant with no field constraints.
    pub fn empty(kind: BlockType) -> Self {
        match kind {
            BlockType::Paragraph => BlockSpec::Paragraph(Default::default()),
            BlockType::Listing => BlockSpec::Listing(Default::default()),
            BlockType::Table => BlockSpec::Table(Default::default()),
            BlockType::Image => BlockSpec::Image(Default::default()),
            BlockType::Verse => BlockSpec::Verse(Default::default()),
            BlockType::Admonition => BlockSpec::Admonition(Default::default()),
            BlockType::Pass => BlockSpec::Pass(Default::default()),
            BlockType::Literal => BlockSpec::Literal(Default::default()),
            BlockType::Audio => BlockSpec::Audio(Default::default()),
            BlockType::Quote => BlockSpec::Quote(Default::default()),
            BlockType::Sidebar => BlockSpec::Sidebar(Default::default()),
            BlockType::Example => BlockSpec::Example(Default::default()),
            BlockType::Video => BlockSpec::Video(Default::default()),
            BlockType::Ulist => BlockSpec::Ulist(Default::default()),
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            BlockSpec::Paragraph(_) => BlockType::Paragraph,
            BlockSpec::Listing(_) => BlockType::Listing,
            BlockSpec::Table(_) => BlockType::Table,
            BlockSpec::Image(_) => BlockType::Image,
            BlockSpec::Verse(_) => BlockType::Verse,
            BlockSpec::Admonition(_) => BlockType::Admonition,
            BlockSpec::Pass(_) => BlockType::Pass,
            BlockSpec::Literal(_) => BlockType::Literal,
            BlockSpec::Audio(_) => BlockType::Audio,
            BlockSpec::Quote(_) => BlockType::Quote,
            BlockSpec::Sidebar(_) => BlockType::Sidebar,
            BlockSpec::Example(_) => BlockType::Example,
            BlockSpec::Video(_) => BlockType::Video,
            BlockSpec::Ulist(_) => BlockType::Ulist,
        }
    }
}

/// One allowed block at a section level.
#[derive(Debug, Clone)]
pub struct BlockRule {
    name: Option<String>,
    severity: Severity,
    occurrence: OccurrenceRule,
    spec: BlockSpec,
}

impl BlockRule {
    pub fn new(spec: BlockSpec) -> Self {
        Self {
            name: None,
            severity: Severity::Error,
            occurrence: OccurrenceRule::default(),
            spec,
        }
    }

    /// A rule for `kind` with no field constraints.
    pub fn of(kind: BlockType) -> Self {
        Self::new(BlockSpec::empty(kind))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_occurrence(mut self, occurrence: OccurrenceRule) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn occurrence(&self) -> &OccurrenceRule {
        &self.occurrence
    }

    pub fn spec(&self) -> &BlockSpec {
        &self.spec
    }

    pub fn block_type(&self) -> BlockType {
        self.spec.block_type()
    }

    /// Name used by order constraints: the rule name, else the type tag.
    pub fn entity_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.block_type().tag())
    }

    /// Label used in occurrence messages.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.block_type(), name),
            None => self.block_type().to_string(),
        }
    }

    /// Whether this rule applies to `block`.
    pub fn applies_to(&self, block: &Block) -> bool {
        self.block_type() == block.kind
            && self
                .name
                .as_deref()
                .is_none_or(|name| block.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Position;

    #[test]
    fn block_type_follows_variant() {
        for kind in BlockType::ALL {
            assert_eq!(BlockSpec::empty(kind).block_type(), kind);
        }
    }

    #[test]
    fn unnamed_rule_applies_to_any_block_of_type() {
        let rule = BlockRule::of(BlockType::Listing);
        let named = Block::new(BlockType::Listing, Position::line(1)).with_name("setup");
        let plain = Block::new(BlockType::Listing, Position::line(2));
        let other = Block::new(BlockType::Literal, Position::line(3));

        assert!(rule.applies_to(&named));
        assert!(rule.applies_to(&plain));
        assert!(!rule.applies_to(&other));
    }

    #[test]
    fn named_rule_requires_matching_name() {
        let rule = BlockRule::of(BlockType::Listing).with_name("setup");
        let named = Block::new(BlockType::Listing, Position::line(1)).with_name("setup");
        let plain = Block::new(BlockType::Listing, Position::line(2));

        assert!(rule.applies_to(&named));
        assert!(!rule.applies_to(&plain));
    }

    #[test]
    fn entity_name_and_label() {
        let plain = BlockRule::of(BlockType::Paragraph);
        assert_eq!(plain.entity_name(), "paragraph");
        assert_eq!(plain.label(), "paragraph");

        let named = BlockRule::of(BlockType::Listing).with_name("setup");
        assert_eq!(named.entity_name(), "setup");
        assert_eq!(named.label(), "listing (setup)");
    }
}
