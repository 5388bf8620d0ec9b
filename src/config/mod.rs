//! Rule configuration.
//!
//! - [`constraints`] - Validated building blocks (patterns, ranges, order)
//! - [`blocks`] - Block rules and their type-specific fields
//! - [`rules`] - The rule tree: attributes and nested section rules
//! - [`schema`] - Rule file structure as read from disk
//! - [`loader`] - Rule file loading and conversion

pub mod blocks;
pub mod constraints;
pub mod loader;
pub mod rules;
pub mod schema;

pub use blocks::{
    AdmonitionRules, AudioRules, BlockRule, BlockSpec, ExampleRules, ImageRules, ListingRules,
    LiteralRules, ParagraphRules, PassRules, QuoteRules, SidebarRules, TableRules, UlistRules,
    VerseRules, VideoRules,
};
pub use constraints::{
    AllowList, Bound, CountRange, OccurrenceRule, OccurrenceViolation, OrderRule, PairKind,
    PairRule, Pattern, TextRule,
};
pub use loader::{build_rules, load_rules, parse_rules, LoadedRules};
pub use rules::{AttributeConfig, MetadataRules, RuleSet, SectionRule, TitleRule};
pub use schema::{RawConfig, Settings};
