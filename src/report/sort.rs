//! Deterministic message order.
//!
//! Keys, in order: file, line, start column (missing = 0), attribute
//! priority, block-type priority (occurrence messages only), message text.
//! The sort is stable, so fully tied messages keep their production order.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::MetadataRules;
use crate::validate::ValidationMessage;

/// Orders messages for reporting.
#[derive(Debug, Clone, Default)]
pub struct MessageSorter {
    attribute_priority: HashMap<String, usize>,
}

impl MessageSorter {
    /// `attribute_priority` maps attribute names to their 1-based
    /// declaration index.
    pub fn new(attribute_priority: HashMap<String, usize>) -> Self {
        Self { attribute_priority }
    }

    pub fn for_rules(metadata: &MetadataRules) -> Self {
        Self::new(metadata.priorities())
    }

    pub fn sort(&self, messages: &mut [ValidationMessage]) {
        messages.sort_by(|a, b| self.compare(a, b));
    }

    pub fn compare(&self, a: &ValidationMessage, b: &ValidationMessage) -> Ordering {
        let (la, lb) = (a.location(), b.location());
        la.file
            .to_string_lossy()
            .cmp(&lb.file.to_string_lossy())
            .then(la.line.cmp(&lb.line))
            .then(la.sort_column().cmp(&lb.sort_column()))
            .then(self.attribute_rank(a).cmp(&self.attribute_rank(b)))
            .then(block_rank(a).cmp(&block_rank(b)))
            .then_with(|| a.message().cmp(b.message()))
    }

    fn attribute_rank(&self, message: &ValidationMessage) -> usize {
        message
            .attribute()
            .and_then(|name| self.attribute_priority.get(name))
            .copied()
            .unwrap_or(0)
    }
}

fn block_rank(message: &ValidationMessage) -> usize {
    match (message.kind(), message.block_type()) {
        (Some(kind), Some(block)) if kind.is_occurrence() => block.priority(),
        _ => 0,
    }
}
