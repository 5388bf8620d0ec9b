//! Section matching.
//!
//! Document sections are paired with section rules by level and optional
//! title pattern; the first accepting rule wins. A matched rule validates
//! the section's direct blocks and hands its subsections to the next level.
//! Without subsections (or without a match) the caller's candidates keep
//! applying one level down.

use tracing::{debug, trace};

use super::blocks::BlockValidator;
use super::message::{ErrorKind, Suggestion, ValidationMessage};
use super::rule::Severity;
use crate::config::{OccurrenceViolation, SectionRule};
use crate::document::{Document, Section, SourceLocation};

/// How to treat several level-0 rules that disagree on their subsections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootPolicy {
    /// The first level-0 rule with subsections seeds level 1.
    #[default]
    FirstWins,
    /// As `FirstWins`, but report the ambiguity.
    Strict,
}

/// Walks the section tree of one document.
pub struct SectionMatcher<'a> {
    document: &'a Document,
    blocks: BlockValidator<'a>,
}

impl<'a> SectionMatcher<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            blocks: BlockValidator::new(document),
        }
    }

    /// Validate the document root and every section below it.
    pub fn validate(&self, rules: &[SectionRule], policy: RootPolicy) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();
        let origin = self.document.origin();

        let roots: Vec<&SectionRule> = rules.iter().filter(|r| r.is_root()).collect();
        let title = self.document.title.as_deref();
        if let Some(root) = roots.iter().find(|r| r.accepts(0, title)) {
            debug!("Root blocks matched rule '{}'", root.name());
            messages.extend(self.blocks.validate(
                &self.document.blocks,
                root.blocks(),
                root.block_order(),
                &origin,
            ));
        }

        let seeded: Vec<&SectionRule> = roots
            .iter()
            .copied()
            .filter(|r| !r.subsections().is_empty())
            .collect();
        if policy == RootPolicy::Strict {
            if let Some(message) = ambiguous_roots(&seeded, &origin) {
                messages.push(message);
            }
        }

        let candidates = seeded.first().map_or(rules, |r| r.subsections());
        self.validate_siblings(&self.document.sections, candidates, 1, &origin, &mut messages);
        messages
    }

    /// Validate one sibling list. `level` is the level expected of its
    /// members and `container` the location of their parent.
    fn validate_siblings(
        &self,
        sections: &[Section],
        candidates: &[SectionRule],
        level: u32,
        container: &SourceLocation,
        messages: &mut Vec<ValidationMessage>,
    ) {
        let matched: Vec<Option<usize>> = sections
            .iter()
            .map(|s| candidates.iter().position(|c| c.accepts(s.level, s.title.as_deref())))
            .collect();

        for (section, rule_idx) in sections.iter().zip(&matched) {
            let location = self.document.locate(&section.position);
            let next = match rule_idx {
                Some(idx) => {
                    let rule = &candidates[*idx];
                    trace!("Section at line {} matched '{}'", location.line, rule.name());
                    messages.extend(self.blocks.validate(
                        &section.blocks,
                        rule.blocks(),
                        rule.block_order(),
                        &location,
                    ));
                    if rule.subsections().is_empty() {
                        candidates
                    } else {
                        rule.subsections()
                    }
                }
                None => {
                    if let Some(message) = title_mismatch(section, candidates, &location) {
                        messages.push(message);
                    }
                    candidates
                }
            };
            self.validate_siblings(&section.sections, next, section.level + 1, &location, messages);
        }

        self.check_occurrences(sections, candidates, &matched, level, container, messages);
        self.check_order(sections, candidates, &matched, messages);
    }

    fn check_occurrences(
        &self,
        sections: &[Section],
        candidates: &[SectionRule],
        matched: &[Option<usize>],
        level: u32,
        container: &SourceLocation,
        messages: &mut Vec<ValidationMessage>,
    ) {
        for (idx, rule) in candidates.iter().enumerate() {
            if rule.level() != level {
                continue;
            }
            let instances: Vec<&Section> = sections
                .iter()
                .zip(matched)
                .filter(|(_, m)| **m == Some(idx))
                .map(|(s, _)| s)
                .collect();
            let count = instances.len() as u64;
            let occurrence = rule.occurrence();

            let message = match occurrence.check(count) {
                Some(OccurrenceViolation::TooFew { min }) => ValidationMessage::new(
                    "section.occurrence.min",
                    occurrence.severity(),
                    format!("Too few occurrences of section: {}", rule.name()),
                    container.clone(),
                )
                .with_expected(format!("At least {} occurrences", min))
                .with_kind(ErrorKind::TooFew)
                .with_suggestion(Suggestion::new(format!(
                    "Add a level {} section for '{}'",
                    rule.level(),
                    rule.name()
                ))),
                Some(OccurrenceViolation::TooMany { max }) => ValidationMessage::new(
                    "section.occurrence.max",
                    occurrence.severity(),
                    format!("Too many occurrences of section: {}", rule.name()),
                    self.document.locate(&instances[max as usize].position),
                )
                .with_expected(format!("At most {} occurrences", max))
                .with_kind(ErrorKind::TooMany)
                .with_suggestion(Suggestion::new(format!(
                    "Merge or remove extra '{}' sections",
                    rule.name()
                ))),
                None => continue,
            };
            messages.push(message.with_actual(format!("{} occurrences", count)));
        }
    }

    /// Matched siblings with a declared order must appear in that order.
    fn check_order(
        &self,
        sections: &[Section],
        candidates: &[SectionRule],
        matched: &[Option<usize>],
        messages: &mut Vec<ValidationMessage>,
    ) {
        let ordered: Vec<(&Section, &SectionRule, u32)> = sections
            .iter()
            .zip(matched)
            .filter_map(|(s, m)| m.map(|idx| (s, &candidates[idx])))
            .filter_map(|(s, rule)| rule.order().map(|order| (s, rule, order)))
            .collect();

        for pair in ordered.windows(2) {
            let (prev, prev_rule, prev_order) = pair[0];
            let (cur, cur_rule, cur_order) = pair[1];
            if prev_order <= cur_order {
                continue;
            }
            let cur_loc = self.document.locate(&cur.position);
            let prev_loc = self.document.locate(&prev.position);
            messages.push(
                ValidationMessage::new(
                    "section.order",
                    cur_rule.occurrence().severity(),
                    format!(
                        "Section '{}' should appear before '{}'",
                        cur_rule.name(),
                        prev_rule.name()
                    ),
                    cur_loc.clone(),
                )
                .with_actual(format!(
                    "'{}' at line {}, '{}' at line {}",
                    cur_rule.name(),
                    cur_loc.line,
                    prev_rule.name(),
                    prev_loc.line
                ))
                .with_expected(format!("'{}' before '{}'", cur_rule.name(), prev_rule.name()))
                .with_kind(ErrorKind::Order),
            );
        }
    }
}

/// A section nothing matched, while a same-level rule asks for a title.
fn title_mismatch(
    section: &Section,
    candidates: &[SectionRule],
    location: &SourceLocation,
) -> Option<ValidationMessage> {
    let (rule, title_rule) = candidates
        .iter()
        .filter(|c| c.level() == section.level)
        .find_map(|c| c.title().map(|t| (c, t)))?;

    Some(
        ValidationMessage::new(
            "section.title",
            title_rule.severity(),
            format!("Section title does not match the title of '{}'", rule.name()),
            location.clone(),
        )
        .with_actual(section.title.as_deref().unwrap_or("(untitled)"))
        .with_expected(title_rule.pattern().as_str())
        .with_kind(ErrorKind::TitleMismatch)
        .with_suggestion(
            Suggestion::new(format!("Rename the section to match '{}'", title_rule.pattern())),
        ),
    )
}

/// Several level-0 rules seed level 1 with differing subsection lists.
fn ambiguous_roots(seeded: &[&SectionRule], origin: &SourceLocation) -> Option<ValidationMessage> {
    let names = |rule: &SectionRule| -> Vec<String> {
        rule.subsections().iter().map(|s| s.name().to_string()).collect()
    };
    let (first, rest) = seeded.split_first()?;
    let expected = names(first);
    let other = rest.iter().find(|r| names(r) != expected)?;

    Some(
        ValidationMessage::new(
            "section.root.ambiguous",
            Severity::Warn,
            format!(
                "Root rules '{}' and '{}' declare different subsections",
                first.name(),
                other.name()
            ),
            origin.clone(),
        )
        .with_actual(names(other).join(", "))
        .with_expected(expected.join(", "))
        .with_kind(ErrorKind::Ambiguous)
        .with_suggestion(
            Suggestion::new(format!("Keep one level-0 rule; '{}' is used", first.name())),
        ),
    )
}
