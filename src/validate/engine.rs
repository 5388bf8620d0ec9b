//! Single-document validation.

use tracing::debug;

use super::attributes::MetadataSession;
use super::message::ValidationMessage;
use super::sections::{RootPolicy, SectionMatcher};
use crate::config::RuleSet;
use crate::document::Document;
use crate::report::MessageSorter;

/// Options that change how rules are applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    pub root_policy: RootPolicy,
}

/// Validates documents against one rule set.
///
/// Metadata runs first, then the section tree (root blocks included).
/// Messages come back unsorted; see [`MessageSorter`].
#[derive(Debug, Clone)]
pub struct Validator<'r> {
    rules: &'r RuleSet,
    options: ValidationOptions,
}

impl<'r> Validator<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        self.rules
    }

    /// Sorter keyed on this rule set's attribute declarations.
    pub fn sorter(&self) -> MessageSorter {
        MessageSorter::for_rules(&self.rules.metadata)
    }

    pub fn validate(&self, document: &Document) -> Vec<ValidationMessage> {
        let origin = document.origin();

        let mut session = MetadataSession::new(&self.rules.metadata);
        session.feed_document(document);
        let mut messages = session.finish(&origin);
        let metadata_count = messages.len();

        messages.extend(
            SectionMatcher::new(document).validate(&self.rules.sections, self.options.root_policy),
        );

        debug!(
            "Validated {}: {} metadata and {} structure messages",
            document.source.display(),
            metadata_count,
            messages.len() - metadata_count
        );
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttributeConfig, BlockRule, MetadataRules, OccurrenceRule, SectionRule};
    use crate::document::{Attribute, BlockType, Section};
    use crate::validate::Severity;

    fn rules() -> RuleSet {
        let metadata = MetadataRules::new(vec![
            AttributeConfig::new("title")
                .unwrap()
                .required()
                .with_length(Some(10), None)
                .unwrap(),
            AttributeConfig::new("version").unwrap().with_order(1),
            AttributeConfig::new("author").unwrap().with_order(2),
        ])
        .unwrap();
        let sections = vec![SectionRule::new("body", 1).with_block(
            BlockRule::of(BlockType::Paragraph)
                .with_occurrence(OccurrenceRule::new(1, Some(3), None, Severity::Error).unwrap()),
        )];
        RuleSet::new(metadata, sections)
    }

    fn document() -> Document {
        let mut document = Document::new("guide.adoc");
        document.attributes = vec![
            Attribute::new("title", "Short", 1),
            Attribute::new("author", "Jo", 2),
            Attribute::new("version", "1.0", 3),
        ];
        document.sections = vec![Section::new(1, "Body", 5)];
        document
    }

    #[test]
    fn merges_metadata_and_structure() {
        let rules = rules();
        let messages = Validator::new(&rules).validate(&document());

        let ids: Vec<&str> = messages.iter().map(|m| m.rule_id().as_str()).collect();
        assert_eq!(ids, ["length.min", "order", "block.occurrence.min"]);
    }

    #[test]
    fn validation_is_repeatable() {
        let rules = rules();
        let validator = Validator::new(&rules);
        let doc = document();

        let mut first = validator.validate(&doc);
        let mut second = validator.validate(&doc);
        validator.sorter().sort(&mut first);
        validator.sorter().sort(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn clean_document() {
        let rules = rules();
        let mut doc = document();
        doc.attributes = vec![
            Attribute::new("title", "A long enough title", 1),
            Attribute::new("version", "1.0", 2),
            Attribute::new("author", "Jo", 3),
        ];
        doc.sections[0].blocks = vec![crate::document::Block::new(
            BlockType::Paragraph,
            crate::document::Position::line(6),
        )];

        assert!(Validator::new(&rules).validate(&doc).is_empty());
    }
}
