//! Metadata attribute rules.
//!
//! Each [`AttributeRule`] checks one kind of constraint across all
//! configured attributes. Rules see attributes one at a time through
//! [`AttributeRule::evaluate`]; checks that need the whole header (missing
//! attributes, relative order) run in [`AttributeRule::finalize`].
//!
//! Rules are driven by a [`MetadataSession`], which is built for a single
//! document and consumed by [`MetadataSession::finish`], so the finalize
//! phase runs exactly once and state never carries over to another
//! document.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::message::{ErrorKind, Suggestion, ValidationMessage};
use super::rule::Severity;
use crate::config::{MetadataRules, Pattern};
use crate::document::{Document, SourceLocation};

/// A check over header attributes.
pub trait AttributeRule {
    /// Short name, for logging.
    fn name(&self) -> &str;

    /// Whether this rule has anything to say about `attribute`.
    fn applicable(&self, attribute: &str) -> bool;

    /// Check one attribute occurrence.
    fn evaluate(
        &mut self,
        attribute: &str,
        value: &str,
        location: &SourceLocation,
    ) -> Vec<ValidationMessage>;

    /// Emit deferred messages once every attribute has been seen. `origin`
    /// is where messages about absent attributes are reported.
    fn finalize(&mut self, _origin: &SourceLocation) -> Vec<ValidationMessage> {
        Vec::new()
    }
}

/// Reports configured-required attributes the document never supplies.
pub struct RequiredRule {
    required: Vec<(String, Severity)>,
    seen: HashSet<String>,
}

impl RequiredRule {
    pub fn new(config: &MetadataRules) -> Self {
        Self {
            required: config
                .attributes()
                .iter()
                .filter(|a| a.is_required())
                .map(|a| (a.name().to_string(), a.severity()))
                .collect(),
            seen: HashSet::new(),
        }
    }
}

impl AttributeRule for RequiredRule {
    fn name(&self) -> &str {
        "required"
    }

    fn applicable(&self, attribute: &str) -> bool {
        self.required.iter().any(|(name, _)| name == attribute)
    }

    fn evaluate(&mut self, attribute: &str, _value: &str, _: &SourceLocation) -> Vec<ValidationMessage> {
        self.seen.insert(attribute.to_string());
        Vec::new()
    }

    fn finalize(&mut self, origin: &SourceLocation) -> Vec<ValidationMessage> {
        self.required
            .iter()
            .filter(|(name, _)| !self.seen.contains(name))
            .map(|(name, severity)| {
                ValidationMessage::new(
                    "required",
                    *severity,
                    format!("Missing required attribute '{}'", name),
                    origin.clone(),
                )
                .with_attribute(name.clone())
                .with_kind(ErrorKind::MissingValue)
                .with_expected(format!("Attribute '{}' is set", name))
                .with_suggestion(
                    Suggestion::new(format!("Add '{}' to the document header", name))
                        .with_example(format!("{}: <value>", name)),
                )
            })
            .collect()
    }
}

/// Checks attribute values against configured patterns.
pub struct PatternRule {
    patterns: Vec<(String, Pattern, Severity)>,
}

impl PatternRule {
    pub fn new(config: &MetadataRules) -> Self {
        Self {
            patterns: config
                .attributes()
                .iter()
                .filter_map(|a| {
                    a.pattern()
                        .map(|p| (a.name().to_string(), p.clone(), a.severity()))
                })
                .collect(),
        }
    }
}

impl AttributeRule for PatternRule {
    fn name(&self) -> &str {
        "pattern"
    }

    fn applicable(&self, attribute: &str) -> bool {
        self.patterns.iter().any(|(name, _, _)| name == attribute)
    }

    fn evaluate(
        &mut self,
        attribute: &str,
        value: &str,
        location: &SourceLocation,
    ) -> Vec<ValidationMessage> {
        if value.is_empty() {
            return Vec::new();
        }
        self.patterns
            .iter()
            .filter(|(name, pattern, _)| name == attribute && !pattern.matches(value))
            .map(|(name, pattern, severity)| {
                ValidationMessage::new(
                    "pattern",
                    *severity,
                    format!("Attribute '{}' does not match the required pattern", name),
                    location.clone(),
                )
                .with_attribute(name.clone())
                .with_actual(value)
                .with_expected(pattern.as_str())
                .with_kind(ErrorKind::InvalidPattern)
                .with_suggestion(
                    Suggestion::new(format!("Reformat the value of '{}'", name))
                        .with_explanation(format!("The value must match {}", pattern)),
                )
            })
            .collect()
    }
}

struct LengthBounds {
    name: String,
    min: Option<usize>,
    max: Option<usize>,
    severity: Severity,
}

/// Checks value lengths, counted in characters.
pub struct LengthRule {
    bounds: Vec<LengthBounds>,
}

impl LengthRule {
    pub fn new(config: &MetadataRules) -> Self {
        Self {
            bounds: config
                .attributes()
                .iter()
                .filter(|a| a.min_length().is_some() || a.max_length().is_some())
                .map(|a| LengthBounds {
                    name: a.name().to_string(),
                    min: a.min_length(),
                    max: a.max_length(),
                    severity: a.severity(),
                })
                .collect(),
        }
    }
}

impl AttributeRule for LengthRule {
    fn name(&self) -> &str {
        "length"
    }

    fn applicable(&self, attribute: &str) -> bool {
        self.bounds.iter().any(|b| b.name == attribute)
    }

    fn evaluate(
        &mut self,
        attribute: &str,
        value: &str,
        location: &SourceLocation,
    ) -> Vec<ValidationMessage> {
        let length = value.chars().count();
        let mut messages = Vec::new();

        for bounds in self.bounds.iter().filter(|b| b.name == attribute) {
            let actual = format!("{} ({} characters)", value, length);
            if let Some(min) = bounds.min.filter(|min| length < *min) {
                messages.push(
                    ValidationMessage::new(
                        "length.min",
                        bounds.severity,
                        format!("Attribute '{}' is too short", attribute),
                        location.clone(),
                    )
                    .with_attribute(attribute)
                    .with_actual(actual)
                    .with_expected(format!("Minimum {} characters", min))
                    .with_kind(ErrorKind::TooShort)
                    .with_suggestion(Suggestion::new(format!(
                        "Extend '{}' to at least {} characters",
                        attribute, min
                    ))),
                );
            } else if let Some(max) = bounds.max.filter(|max| length > *max) {
                messages.push(
                    ValidationMessage::new(
                        "length.max",
                        bounds.severity,
                        format!("Attribute '{}' is too long", attribute),
                        location.clone(),
                    )
                    .with_attribute(attribute)
                    .with_actual(actual)
                    .with_expected(format!("Maximum {} characters", max))
                    .with_kind(ErrorKind::TooLong)
                    .with_suggestion(Suggestion::new(format!(
                        "Shorten '{}' to at most {} characters",
                        attribute, max
                    ))),
                );
            }
        }
        messages
    }
}

struct OrderedAttribute {
    name: String,
    order: u32,
    severity: Severity,
}

/// Checks that ordered attributes appear in their declared order.
///
/// Stateful: `evaluate` records where each ordered attribute first
/// appears, `finalize` compares the recorded positions pairwise.
pub struct OrderRule {
    ordered: Vec<OrderedAttribute>,
    positions: HashMap<String, (usize, SourceLocation)>,
    next_position: usize,
}

impl OrderRule {
    pub fn new(config: &MetadataRules) -> Self {
        Self {
            ordered: config
                .attributes()
                .iter()
                .filter_map(|a| {
                    a.order().map(|order| OrderedAttribute {
                        name: a.name().to_string(),
                        order,
                        severity: a.severity(),
                    })
                })
                .collect(),
            positions: HashMap::new(),
            next_position: 1,
        }
    }
}

impl AttributeRule for OrderRule {
    fn name(&self) -> &str {
        "order"
    }

    fn applicable(&self, attribute: &str) -> bool {
        self.ordered.iter().any(|a| a.name == attribute)
    }

    fn evaluate(&mut self, attribute: &str, _value: &str, location: &SourceLocation) -> Vec<ValidationMessage> {
        let position = self.next_position;
        self.next_position += 1;
        self.positions
            .entry(attribute.to_string())
            .or_insert_with(|| (position, location.clone()));
        Vec::new()
    }

    fn finalize(&mut self, _origin: &SourceLocation) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();

        // Every ordered pair is visited in both directions; the predicate
        // only holds for one of them.
        for first in &self.ordered {
            for second in &self.ordered {
                if first.name == second.name {
                    continue;
                }
                let (Some((first_pos, first_loc)), Some((second_pos, second_loc))) = (
                    self.positions.get(&first.name),
                    self.positions.get(&second.name),
                ) else {
                    continue;
                };
                if first.order < second.order && first_pos > second_pos {
                    messages.push(
                        ValidationMessage::new(
                            "order",
                            first.severity,
                            format!(
                                "Attribute '{}' should appear before '{}'",
                                first.name, second.name
                            ),
                            first_loc.clone(),
                        )
                        .with_attribute(first.name.clone())
                        .with_actual(format!(
                            "'{}' at line {}, '{}' at line {}",
                            first.name, first_loc.line, second.name, second_loc.line
                        ))
                        .with_expected(format!("'{}' before '{}'", first.name, second.name))
                        .with_kind(ErrorKind::Order)
                        .with_suggestion(Suggestion::new(format!(
                            "Move '{}' above '{}' (line {})",
                            first.name, second.name, second_loc.line
                        ))),
                    );
                }
            }
        }
        messages
    }
}

/// Attribute validation for one document.
pub struct MetadataSession {
    rules: Vec<Box<dyn AttributeRule>>,
    messages: Vec<ValidationMessage>,
}

impl MetadataSession {
    /// Fresh instances of the built-in rules for `config`.
    pub fn new(config: &MetadataRules) -> Self {
        Self::with_rules(vec![
            Box::new(RequiredRule::new(config)),
            Box::new(PatternRule::new(config)),
            Box::new(LengthRule::new(config)),
            Box::new(OrderRule::new(config)),
        ])
    }

    /// A session over a custom rule chain.
    pub fn with_rules(rules: Vec<Box<dyn AttributeRule>>) -> Self {
        Self {
            rules,
            messages: Vec::new(),
        }
    }

    /// Feed one attribute occurrence through every applicable rule.
    pub fn feed(&mut self, attribute: &str, value: &str, location: &SourceLocation) {
        for rule in self.rules.iter_mut().filter(|r| r.applicable(attribute)) {
            trace!("Attribute '{}' checked by {} rule", attribute, rule.name());
            self.messages
                .extend(rule.evaluate(attribute, value, location));
        }
    }

    /// Feed every header attribute of `document`, in source order.
    pub fn feed_document(&mut self, document: &Document) {
        for attr in &document.attributes {
            self.feed(&attr.name, &attr.value, &document.locate(&attr.position));
        }
    }

    /// Run the finalize phase and return every message of the session.
    pub fn finish(mut self, origin: &SourceLocation) -> Vec<ValidationMessage> {
        for rule in &mut self.rules {
            self.messages.extend(rule.finalize(origin));
        }
        self.messages
    }
}
