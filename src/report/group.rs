//! Grouping of similar messages.
//!
//! Two messages are similar when they share a rule id and their texts are
//! equal once the quoted actual value is replaced by a placeholder. Groups keep
//! the order of their first member; members keep the input order.

use std::collections::HashMap;

use crate::validate::{RuleId, Suggestion, ValidationMessage};

const PLACEHOLDER: &str = "{value}";

/// Messages that differ only in location or actual value.
#[derive(Debug)]
pub struct MessageGroup<'m> {
    pub rule_id: &'m RuleId,
    /// Message text with the actual value templated out.
    pub pattern: String,
    pub members: Vec<&'m ValidationMessage>,
    /// The first member's first suggestion, when every member has one.
    pub fix: Option<&'m Suggestion>,
}

impl MessageGroup<'_> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Messages split into groups of two or more and the rest.
#[derive(Debug, Default)]
pub struct Grouping<'m> {
    pub groups: Vec<MessageGroup<'m>>,
    pub ungrouped: Vec<&'m ValidationMessage>,
}

/// Template a message's text on its actual value.
///
/// Only the first `'value'` slot is replaced; text that merely contains the
/// value elsewhere is left alone.
pub fn group_pattern(message: &ValidationMessage) -> String {
    let text = message.message();
    match message.actual() {
        Some(actual) if !actual.is_empty() => {
            let quoted = format!("'{}'", actual);
            text.replacen(&quoted, &format!("'{}'", PLACEHOLDER), 1)
        }
        _ => text.to_string(),
    }
}

/// Group `messages`, which should already be sorted.
pub fn group_messages(messages: &[ValidationMessage]) -> Grouping<'_> {
    let mut order: Vec<(&RuleId, String)> = Vec::new();
    let mut buckets: HashMap<(&RuleId, String), Vec<&ValidationMessage>> = HashMap::new();

    for message in messages {
        let key = (message.rule_id(), group_pattern(message));
        let bucket = buckets.entry(key.clone()).or_default();
        if bucket.is_empty() {
            order.push(key);
        }
        bucket.push(message);
    }

    let mut grouping = Grouping::default();
    for key in order {
        let Some(members) = buckets.remove(&key) else {
            continue;
        };
        if members.len() < 2 {
            grouping.ungrouped.extend(members);
            continue;
        }
        let fix = if members.iter().all(|m| !m.suggestions().is_empty()) {
            members[0].suggestions().first()
        } else {
            None
        };
        grouping.groups.push(MessageGroup {
            rule_id: key.0,
            pattern: key.1,
            members,
            fix,
        });
    }
    grouping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SourceLocation;
    use crate::validate::Severity;

    fn msg(rule: &str, text: &str, line: usize) -> ValidationMessage {
        ValidationMessage::new(rule, Severity::Error, text, SourceLocation::line("a.adoc", line))
    }

    #[test]
    fn groups_need_two_members() {
        let messages = vec![
            msg("block.occurrence.min", "Too few occurrences of block: paragraph", 2),
            msg("block.occurrence.min", "Too few occurrences of block: paragraph", 8),
            msg("length.min", "Attribute 'title' is too short", 1),
        ];

        let grouping = group_messages(&messages);

        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].len(), 2);
        assert_eq!(grouping.ungrouped.len(), 1);
        assert_eq!(grouping.ungrouped[0].rule_id().as_str(), "length.min");
    }

    #[test]
    fn actual_value_is_templated_out() {
        let messages = vec![
            msg("block.listing.language.allowed", "Listing block language 'perl' is not allowed", 3)
                .with_actual("perl"),
            msg("block.listing.language.allowed", "Listing block language 'tcl' is not allowed", 9)
                .with_actual("tcl"),
        ];

        let grouping = group_messages(&messages);

        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(
            grouping.groups[0].pattern,
            "Listing block language '{value}' is not allowed"
        );
    }

    #[test]
    fn short_values_only_replace_their_slot() {
        let allowed = |value: &str, line| {
            msg(
                "block.listing.language.allowed",
                &format!("Listing block language '{}' is not allowed", value),
                line,
            )
            .with_actual(value)
        };
        let messages = vec![allowed("c", 3), allowed("go", 9)];

        let grouping = group_messages(&messages);

        assert_eq!(grouping.groups.len(), 1);
        assert!(grouping.ungrouped.is_empty());
        assert_eq!(
            grouping.groups[0].pattern,
            "Listing block language '{value}' is not allowed"
        );
    }

    #[test]
    fn unquoted_actual_leaves_text_untouched() {
        let message = msg("block.listing.lines.max", "Listing block line count exceeds the maximum", 4)
            .with_actual("e");
        assert_eq!(
            group_pattern(&message),
            "Listing block line count exceeds the maximum"
        );
    }

    #[test]
    fn same_text_different_rule_is_not_grouped() {
        let messages = vec![msg("a", "Same", 1), msg("b", "Same", 2)];
        let grouping = group_messages(&messages);
        assert!(grouping.groups.is_empty());
        assert_eq!(grouping.ungrouped.len(), 2);
    }

    #[test]
    fn fix_requires_every_member_to_have_one() {
        let with = |line| msg("r", "Text", line).with_suggestion(Suggestion::new(format!("fix {line}")));
        let all = vec![with(1), with(2)];
        assert_eq!(
            group_messages(&all).groups[0].fix.map(|s| s.description()),
            Some("fix 1")
        );

        let partial = vec![with(1), msg("r", "Text", 2)];
        assert!(group_messages(&partial).groups[0].fix.is_none());
    }

    #[test]
    fn group_order_follows_first_member() {
        let messages = vec![
            msg("b", "B", 1),
            msg("a", "A", 2),
            msg("b", "B", 3),
            msg("a", "A", 4),
        ];
        let grouping = group_messages(&messages);
        let ids: Vec<&str> = grouping.groups.iter().map(|g| g.rule_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }
}
