//! Block validation.
//!
//! [`BlockValidator`] checks the direct blocks of one container (the
//! document root or a section) against the block rules allowed there:
//! type-specific fields per block, then occurrence per rule, then order.
//! Blocks no rule applies to are left alone.

use tracing::trace;

use super::message::{ErrorKind, Suggestion, ValidationMessage};
use super::rule::Severity;
use crate::config::{
    AllowList, BlockRule, BlockSpec, Bound, CountRange, OccurrenceViolation, OrderRule, PairKind,
    TextRule,
};
use crate::document::{Block, Document, SourceLocation};

/// Validates block lists of one document.
pub struct BlockValidator<'a> {
    document: &'a Document,
}

impl<'a> BlockValidator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Validate `blocks` against `rules`. `container` is where messages
    /// about missing blocks are reported.
    pub fn validate(
        &self,
        blocks: &[Block],
        rules: &[BlockRule],
        order: Option<&OrderRule>,
        container: &SourceLocation,
    ) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();

        let matched: Vec<Option<usize>> = blocks
            .iter()
            .map(|block| rules.iter().position(|rule| rule.applies_to(block)))
            .collect();

        for (block, rule_idx) in blocks.iter().zip(&matched) {
            if let Some(idx) = rule_idx {
                let mut check = FieldCheck {
                    block,
                    rule: &rules[*idx],
                    location: self.document.locate(&block.position),
                    messages: &mut messages,
                };
                check.run();
            } else {
                trace!("No rule for {} block at line {}", block.kind, block.position.line);
            }
        }

        self.check_occurrences(blocks, rules, &matched, container, &mut messages);

        let placed = Placement::new(blocks, rules, &matched);
        match order {
            Some(order) => {
                if !order.sequence().is_empty() {
                    self.check_fixed(&placed, order.sequence(), |_| order.severity(), &mut messages);
                } else {
                    self.check_implicit(&placed, rules, &mut messages);
                }
                self.check_pairs(&placed, order, &mut messages);
            }
            None => self.check_implicit(&placed, rules, &mut messages),
        }

        messages
    }

    fn check_occurrences(
        &self,
        blocks: &[Block],
        rules: &[BlockRule],
        matched: &[Option<usize>],
        container: &SourceLocation,
        messages: &mut Vec<ValidationMessage>,
    ) {
        for (idx, rule) in rules.iter().enumerate() {
            let instances: Vec<&Block> = blocks
                .iter()
                .zip(matched)
                .filter(|(_, m)| **m == Some(idx))
                .map(|(b, _)| b)
                .collect();
            let count = instances.len() as u64;
            let occurrence = rule.occurrence();

            match occurrence.check(count) {
                Some(OccurrenceViolation::TooFew { min }) => messages.push(
                    ValidationMessage::new(
                        "block.occurrence.min",
                        occurrence.severity(),
                        format!("Too few occurrences of block: {}", rule.label()),
                        container.clone(),
                    )
                    .with_actual(format!("{} occurrences", count))
                    .with_expected(format!("At least {} occurrences", min))
                    .with_kind(ErrorKind::TooFew)
                    .with_block_type(rule.block_type())
                    .with_suggestion(Suggestion::new(format!(
                        "Add {} more {} block(s)",
                        min - count,
                        rule.label()
                    ))),
                ),
                Some(OccurrenceViolation::TooMany { max }) => {
                    let first_extra = instances[max as usize];
                    messages.push(
                        ValidationMessage::new(
                            "block.occurrence.max",
                            occurrence.severity(),
                            format!("Too many occurrences of block: {}", rule.label()),
                            self.document.locate(&first_extra.position),
                        )
                        .with_actual(format!("{} occurrences", count))
                        .with_expected(format!("At most {} occurrences", max))
                        .with_kind(ErrorKind::TooMany)
                        .with_block_type(rule.block_type())
                        .with_suggestion(Suggestion::new(format!(
                            "Remove or merge {} {} block(s)",
                            count - max,
                            rule.label()
                        ))),
                    )
                }
                None => {}
            }
        }
    }

    /// Derive a fixed order from rules that declare `occurrence.order`.
    fn check_implicit(
        &self,
        placed: &Placement<'_>,
        rules: &[BlockRule],
        messages: &mut Vec<ValidationMessage>,
    ) {
        let mut ordered: Vec<(u32, usize)> = rules
            .iter()
            .enumerate()
            .filter_map(|(idx, r)| r.occurrence().order().map(|o| (o, idx)))
            .collect();
        if ordered.len() < 2 {
            return;
        }
        ordered.sort();
        let sequence: Vec<String> = ordered
            .iter()
            .map(|(_, idx)| rules[*idx].entity_name().to_string())
            .collect();
        let severity_of = |name: &str| {
            rules
                .iter()
                .find(|r| r.entity_name() == name)
                .map_or(Severity::Error, |r| r.occurrence().severity())
        };
        self.check_fixed(placed, &sequence, severity_of, messages);
    }

    /// Check a fixed sequence, only when every entity in it is present.
    fn check_fixed(
        &self,
        placed: &Placement<'_>,
        sequence: &[String],
        severity_of: impl Fn(&str) -> Severity,
        messages: &mut Vec<ValidationMessage>,
    ) {
        let firsts: Option<Vec<usize>> = sequence.iter().map(|name| placed.first(name)).collect();
        let Some(firsts) = firsts else {
            return;
        };

        for (idx, pair) in sequence.windows(2).enumerate() {
            let (earlier, later) = (&pair[0], &pair[1]);
            let (earlier_pos, later_pos) = (firsts[idx], firsts[idx + 1]);
            if earlier_pos > later_pos {
                let earlier_loc = self.document.locate(&placed.blocks[earlier_pos].position);
                let later_loc = self.document.locate(&placed.blocks[later_pos].position);
                messages.push(
                    ValidationMessage::new(
                        "block.order.fixed",
                        severity_of(earlier),
                        format!("Block '{}' should appear before '{}'", earlier, later),
                        earlier_loc.clone(),
                    )
                    .with_actual(format!(
                        "'{}' at line {}, '{}' at line {}",
                        earlier, earlier_loc.line, later, later_loc.line
                    ))
                    .with_expected(sequence.join(", "))
                    .with_kind(ErrorKind::Order)
                    .with_block_type(placed.blocks[earlier_pos].kind)
                    .with_suggestion(Suggestion::new(format!(
                        "Move the {} block above the {} block",
                        earlier, later
                    ))),
                );
            }
        }
    }

    fn check_pairs(
        &self,
        placed: &Placement<'_>,
        order: &OrderRule,
        messages: &mut Vec<ValidationMessage>,
    ) {
        for pair in order.pairs() {
            let (Some(first_min), Some(first_max)) = (placed.first(&pair.first), placed.last(&pair.first)) else {
                continue;
            };
            let (Some(second_min), Some(second_max)) = (placed.first(&pair.second), placed.last(&pair.second)) else {
                continue;
            };

            let (violating, rule_id, relation) = match pair.kind {
                PairKind::Before if first_max > second_min => {
                    (first_max, "block.order.before", "before")
                }
                PairKind::After if first_min < second_max => {
                    (first_min, "block.order.after", "after")
                }
                _ => continue,
            };

            let block = &placed.blocks[violating];
            let location = self.document.locate(&block.position);
            messages.push(
                ValidationMessage::new(
                    rule_id,
                    pair.severity,
                    format!(
                        "Block '{}' should appear {} '{}'",
                        pair.first, relation, pair.second
                    ),
                    location.clone(),
                )
                .with_actual(format!("'{}' at line {}", pair.first, location.line))
                .with_expected(format!("'{}' {} '{}'", pair.first, relation, pair.second))
                .with_kind(ErrorKind::Order)
                .with_block_type(block.kind),
            );
        }
    }
}

/// Positions of matched blocks, addressable by entity name.
struct Placement<'b> {
    blocks: &'b [Block],
    /// `(block index, rule entity name)` in document order.
    entries: Vec<(usize, &'b str)>,
}

impl<'b> Placement<'b> {
    fn new(blocks: &'b [Block], rules: &'b [BlockRule], matched: &[Option<usize>]) -> Self {
        let entries = matched
            .iter()
            .enumerate()
            .filter_map(|(pos, m)| m.map(|idx| (pos, rules[idx].entity_name())))
            .collect();
        Self { blocks, entries }
    }

    /// An order entry names either a rule or a block type.
    fn is(&self, entry: &(usize, &str), name: &str) -> bool {
        entry.1 == name || self.blocks[entry.0].kind.tag() == name
    }

    fn first(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| self.is(e, name))
            .map(|(pos, _)| *pos)
    }

    fn last(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .rev()
            .find(|e| self.is(e, name))
            .map(|(pos, _)| *pos)
    }
}

/// Type-specific checks for one block.
struct FieldCheck<'c> {
    block: &'c Block,
    rule: &'c BlockRule,
    location: SourceLocation,
    messages: &'c mut Vec<ValidationMessage>,
}

impl FieldCheck<'_> {
    fn run(&mut self) {
        let block = self.block;
        let rule = self.rule;
        match rule.spec() {
            BlockSpec::Paragraph(rules) => {
                self.count("lines", "line count", Some(block.line_count()), &rules.lines);
                let sentences = block.sentences();
                self.count(
                    "sentences",
                    "sentence count",
                    Some(sentences.len() as u64),
                    &rules.sentences,
                );
                if let Some(words) = &rules.words {
                    for sentence in &sentences {
                        self.words(sentence, words);
                    }
                }
                self.text("content", block.text.as_deref(), &rules.content);
            }
            BlockSpec::Listing(rules) => {
                self.text("title", block.title.as_deref(), &rules.title);
                self.allowed("language", block.language.as_deref(), &rules.language);
                self.count("lines", "line count", Some(block.line_count()), &rules.lines);
                self.count("callouts", "callout count", block.callouts, &rules.callouts);
            }
            BlockSpec::Table(rules) => {
                self.count("columns", "column count", block.columns, &rules.columns);
                self.count("rows", "row count", block.rows, &rules.rows);
                self.text("caption", block.caption.as_deref(), &rules.caption);
                if rules.header_required && !block.header {
                    self.missing("header", rule.severity());
                }
            }
            BlockSpec::Image(rules) => {
                self.text("url", block.url.as_deref(), &rules.url);
                self.count("width", "width", block.width, &rules.width);
                self.count("height", "height", block.height, &rules.height);
                self.text("alt", block.alt.as_deref(), &rules.alt);
            }
            BlockSpec::Verse(rules) => {
                self.text("author", block.author.as_deref(), &rules.author);
                self.text("attribution", block.attribution.as_deref(), &rules.attribution);
                self.text("content", block.text.as_deref(), &rules.content);
            }
            BlockSpec::Admonition(rules) => {
                self.allowed("variant", block.variant.as_deref(), &rules.variant);
                self.text("title", block.title.as_deref(), &rules.title);
                self.text("content", block.text.as_deref(), &rules.content);
            }
            BlockSpec::Pass(rules) => {
                self.text("content", block.text.as_deref(), &rules.content);
                self.text("reason", block.reason.as_deref(), &rules.reason);
            }
            BlockSpec::Literal(rules) => {
                self.text("title", block.title.as_deref(), &rules.title);
                self.count("lines", "line count", Some(block.line_count()), &rules.lines);
            }
            BlockSpec::Audio(rules) => {
                self.text("url", block.url.as_deref(), &rules.url);
                self.text("title", block.title.as_deref(), &rules.title);
            }
            BlockSpec::Quote(rules) => {
                self.text("author", block.author.as_deref(), &rules.author);
                self.text("citation", block.citation.as_deref(), &rules.citation);
                self.text("content", block.text.as_deref(), &rules.content);
            }
            BlockSpec::Sidebar(rules) => {
                self.text("title", block.title.as_deref(), &rules.title);
                self.text("content", block.text.as_deref(), &rules.content);
            }
            BlockSpec::Example(rules) => {
                self.text("title", block.title.as_deref(), &rules.title);
                self.text("caption", block.caption.as_deref(), &rules.caption);
            }
            BlockSpec::Video(rules) => {
                self.text("url", block.url.as_deref(), &rules.url);
                self.count("width", "width", block.width, &rules.width);
                self.count("height", "height", block.height, &rules.height);
                self.text("caption", block.caption.as_deref(), &rules.caption);
            }
            BlockSpec::Ulist(rules) => {
                self.count(
                    "items",
                    "item count",
                    Some(block.items.len() as u64),
                    &rules.items,
                );
            }
        }
    }

    fn rule_id(&self, field: &str, check: &str) -> String {
        format!("block.{}.{}.{}", self.block.kind, field, check)
    }

    /// "Listing block", "Image block", ...
    fn noun(&self) -> String {
        let tag = self.block.kind.tag();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => format!("{}{} block", first.to_ascii_uppercase(), chars.as_str()),
            None => "Block".to_string(),
        }
    }

    fn push(&mut self, message: ValidationMessage) {
        self.messages
            .push(message.with_block_type(self.block.kind));
    }

    fn missing(&mut self, field: &str, severity: Severity) {
        let message = ValidationMessage::new(
            self.rule_id(field, "required"),
            severity,
            format!("{} is missing its {}", self.noun(), field),
            self.location.clone(),
        )
        .with_expected(format!("A {} value", field))
        .with_kind(ErrorKind::MissingValue)
        .with_suggestion(Suggestion::new(format!(
            "Add a {} to the {} block",
            field, self.block.kind
        )));
        self.push(message);
    }

    fn text(&mut self, field: &str, value: Option<&str>, rule: &Option<TextRule>) {
        let Some(rule) = rule else {
            return;
        };
        let severity = rule.severity().unwrap_or(self.rule.severity());

        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                if rule.is_required() {
                    self.missing(field, severity);
                }
                return;
            }
        };

        if let Some(pattern) = rule.pattern() {
            if !pattern.matches(value) {
                let message = ValidationMessage::new(
                    self.rule_id(field, "pattern"),
                    severity,
                    format!("{} {} does not match the required pattern", self.noun(), field),
                    self.location.clone(),
                )
                .with_actual(value)
                .with_expected(pattern.as_str())
                .with_kind(ErrorKind::InvalidPattern)
                .with_suggestion(
                    Suggestion::new(format!("Reformat the {} of the {} block", field, self.block.kind))
                        .with_explanation(format!("The value must match {}", pattern)),
                );
                self.push(message);
            }
        }

        let length = value.chars().count();
        if let Some(min) = rule.min_length().filter(|min| length < *min) {
            let message = ValidationMessage::new(
                self.rule_id(field, "length.min"),
                severity,
                format!("{} {} is too short", self.noun(), field),
                self.location.clone(),
            )
            .with_actual(format!("{} characters", length))
            .with_expected(format!("Minimum {} characters", min))
            .with_kind(ErrorKind::TooShort);
            self.push(message);
        } else if let Some(max) = rule.max_length().filter(|max| length > *max) {
            let message = ValidationMessage::new(
                self.rule_id(field, "length.max"),
                severity,
                format!("{} {} is too long", self.noun(), field),
                self.location.clone(),
            )
            .with_actual(format!("{} characters", length))
            .with_expected(format!("Maximum {} characters", max))
            .with_kind(ErrorKind::TooLong);
            self.push(message);
        }
    }

    fn count(&mut self, field: &str, label: &str, actual: Option<u64>, range: &Option<CountRange>) {
        let (Some(range), Some(actual)) = (range, actual) else {
            return;
        };
        let severity = range.severity().unwrap_or(self.rule.severity());

        let message = match range.check(actual) {
            Some(Bound::Min(min)) => ValidationMessage::new(
                self.rule_id(field, "min"),
                severity,
                format!("{} {} is below the minimum", self.noun(), label),
                self.location.clone(),
            )
            .with_expected(format!("Minimum {}", min)),
            Some(Bound::Max(max)) => ValidationMessage::new(
                self.rule_id(field, "max"),
                severity,
                format!("{} {} exceeds the maximum", self.noun(), label),
                self.location.clone(),
            )
            .with_expected(format!("Maximum {}", max)),
            None => return,
        };
        let message = message
            .with_actual(actual.to_string())
            .with_kind(ErrorKind::OutOfRange);
        self.push(message);
    }

    fn words(&mut self, sentence: &str, range: &CountRange) {
        let words = sentence.split_whitespace().count() as u64;
        let severity = range.severity().unwrap_or(self.rule.severity());
        let preview: String = sentence.chars().take(40).collect();

        let message = match range.check(words) {
            Some(Bound::Min(min)) => ValidationMessage::new(
                self.rule_id("words", "min"),
                severity,
                format!("{} sentence has too few words", self.noun()),
                self.location.clone(),
            )
            .with_expected(format!("Minimum {} words", min)),
            Some(Bound::Max(max)) => ValidationMessage::new(
                self.rule_id("words", "max"),
                severity,
                format!("{} sentence has too many words", self.noun()),
                self.location.clone(),
            )
            .with_expected(format!("Maximum {} words", max))
            .with_suggestion(Suggestion::new("Split the sentence into shorter ones")),
            None => return,
        };
        let message = message
            .with_actual(format!("{} words in \"{}\"", words, preview))
            .with_kind(ErrorKind::OutOfRange);
        self.push(message);
    }

    fn allowed(&mut self, field: &str, value: Option<&str>, list: &Option<AllowList>) {
        let Some(list) = list else {
            return;
        };
        let severity = list.severity().unwrap_or(self.rule.severity());

        match value {
            Some(v) if !v.is_empty() => {
                if !list.permits(v) {
                    let allowed = list.allowed().join(", ");
                    let message = ValidationMessage::new(
                        self.rule_id(field, "allowed"),
                        severity,
                        format!("{} {} '{}' is not allowed", self.noun(), field, v),
                        self.location.clone(),
                    )
                    .with_actual(v)
                    .with_expected(allowed.clone())
                    .with_kind(ErrorKind::NotAllowed)
                    .with_suggestion(Suggestion::new(format!("Use one of: {}", allowed)));
                    self.push(message);
                }
            }
            _ => {
                if list.is_required() {
                    self.missing(field, severity);
                }
            }
        }
    }
}
