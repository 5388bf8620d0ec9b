//! Rule file loading.
//!
//! Reads a rule file (JSON for `.json`, YAML otherwise), then converts the
//! raw schema into a validated [`RuleSet`]. Every authoring mistake the
//! validator could trip over (bad regex, inverted ranges, fields that do
//! not exist on a block type) is reported here, before any document is
//! touched.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::blocks::{
    AdmonitionRules, AudioRules, BlockRule, BlockSpec, ExampleRules, ImageRules, ListingRules,
    LiteralRules, ParagraphRules, PassRules, QuoteRules, SidebarRules, TableRules, UlistRules,
    VerseRules, VideoRules,
};
use super::constraints::{
    AllowList, CountRange, OccurrenceRule, OrderRule, PairKind, PairRule, TextRule,
};
use super::rules::{AttributeConfig, MetadataRules, RuleSet, SectionRule, TitleRule};
use super::schema::{
    RawAllowed, RawAttribute, RawBlock, RawConfig, RawCount, RawOccurrence, RawOrder, RawPair,
    RawSection, RawText, Settings,
};
use crate::document::BlockType;
use crate::error::{DocruleError, Result};
use crate::validate::Severity;

/// A loaded rule file.
#[derive(Debug, Clone)]
pub struct LoadedRules {
    pub rules: RuleSet,
    pub settings: Settings,
}

/// Load and validate the rule file at `path`.
///
/// # Errors
///
/// `ConfigNotFound` when the file does not exist, `ConfigParse` when it is
/// not valid YAML/JSON for the schema, `ConfigValidation` when the rules
/// are inconsistent.
pub fn load_rules(path: &Path) -> Result<LoadedRules> {
    if !path.exists() {
        return Err(DocruleError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    parse_rules(path, &content)
}

/// Parse rules from `content`; `path` selects the format and is used in
/// error messages.
pub fn parse_rules(path: &Path, content: &str) -> Result<LoadedRules> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let raw: RawConfig = if is_json {
        serde_json::from_str(content).map_err(|e| DocruleError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(content).map_err(|e| DocruleError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    let loaded = build_rules(raw)?;
    debug!(
        "Loaded {} section rule(s) and {} attribute rule(s) from {}",
        loaded.rules.sections.len(),
        loaded.rules.metadata.attributes().len(),
        path.display()
    );
    Ok(loaded)
}

/// Convert a raw rule file into validated rules.
pub fn build_rules(raw: RawConfig) -> Result<LoadedRules> {
    let attributes = raw
        .document
        .metadata
        .attributes
        .into_iter()
        .map(attribute)
        .collect::<Result<Vec<_>>>()?;
    let metadata = MetadataRules::new(attributes)?;

    let sections = raw
        .document
        .sections
        .into_iter()
        .map(section)
        .collect::<Result<Vec<_>>>()?;

    Ok(LoadedRules {
        rules: RuleSet::new(metadata, sections),
        settings: raw.settings,
    })
}

/// Prefix a configuration error with where it happened.
fn within(context: &str, err: DocruleError) -> DocruleError {
    match err {
        DocruleError::ConfigValidation { message } => {
            DocruleError::invalid_config(format!("{}: {}", context, message))
        }
        DocruleError::InvalidPattern { pattern, message } => DocruleError::invalid_config(
            format!("{}: invalid pattern '{}': {}", context, pattern, message),
        ),
        other => other,
    }
}

fn attribute(raw: RawAttribute) -> Result<AttributeConfig> {
    let context = format!("attribute '{}'", raw.name);
    let build = || -> Result<AttributeConfig> {
        let mut config = AttributeConfig::new(raw.name.clone())?
            .with_length(raw.min_length, raw.max_length)?
            .with_severity(raw.severity.unwrap_or(Severity::Error));
        if let Some(pattern) = &raw.pattern {
            config = config.with_pattern(pattern)?;
        }
        if let Some(order) = raw.order {
            config = config.with_order(order);
        }
        if raw.required {
            config = config.required();
        }
        Ok(config)
    };
    build().map_err(|e| within(&context, e))
}

fn occurrence(raw: Option<RawOccurrence>, fallback: Severity) -> Result<OccurrenceRule> {
    match raw {
        Some(raw) => OccurrenceRule::new(
            raw.min,
            raw.max,
            raw.order,
            raw.severity.unwrap_or(fallback),
        ),
        None => Ok(OccurrenceRule::default()),
    }
}

fn pair(raw: RawPair, kind: PairKind, fallback: Severity) -> PairRule {
    PairRule {
        kind,
        first: raw.first,
        second: raw.second,
        severity: raw.severity.unwrap_or(fallback),
    }
}

fn order(raw: RawOrder) -> Result<OrderRule> {
    let severity = raw.severity.unwrap_or(Severity::Error);
    let pairs = raw
        .before
        .into_iter()
        .map(|p| pair(p, PairKind::Before, severity))
        .chain(
            raw.after
                .into_iter()
                .map(|p| pair(p, PairKind::After, severity)),
        )
        .collect();
    OrderRule::new(raw.fixed, pairs, severity)
}

fn section(raw: RawSection) -> Result<SectionRule> {
    let context = format!("section '{}'", raw.name);
    let build = || -> Result<SectionRule> {
        let mut rule = SectionRule::new(raw.name.clone(), raw.level)
            .with_occurrence(occurrence(raw.occurrence.clone(), Severity::Error)?);
        if let Some(order) = raw.order {
            rule = rule.with_order(order);
        }
        if let Some(title) = &raw.title {
            rule = rule.with_title(TitleRule::new(
                &title.pattern,
                title.severity.unwrap_or(Severity::Error),
            )?);
        }
        for block in raw.allowed_blocks.iter().cloned() {
            rule = rule.with_block(block_rule(block)?);
        }
        if let Some(block_order) = raw.block_order.clone() {
            rule = rule.with_block_order(order(block_order)?);
        }
        for sub in raw.subsections.iter().cloned() {
            rule = rule.with_subsection(section(sub)?)?;
        }
        Ok(rule)
    };
    build().map_err(|e| within(&context, e))
}

fn count(raw: Option<RawCount>) -> Result<Option<CountRange>> {
    raw.map(|r| CountRange::new(r.min, r.max, r.severity))
        .transpose()
}

fn text(raw: Option<RawText>) -> Result<Option<TextRule>> {
    raw.map(|r| {
        TextRule::new(
            r.required,
            r.pattern.as_deref(),
            r.min_length,
            r.max_length,
            r.severity,
        )
    })
    .transpose()
}

fn allowed(raw: Option<RawAllowed>) -> Result<Option<AllowList>> {
    raw.map(|r| AllowList::new(r.allowed, r.required, r.severity))
        .transpose()
}

/// Field names set on a raw block, in schema order.
fn present_fields(raw: &RawBlock) -> Vec<&'static str> {
    let mut fields = Vec::new();
    let mut mark = |set: bool, name: &'static str| {
        if set {
            fields.push(name);
        }
    };
    mark(raw.lines.is_some(), "lines");
    mark(raw.sentences.is_some(), "sentences");
    mark(raw.words.is_some(), "words");
    mark(raw.callouts.is_some(), "callouts");
    mark(raw.columns.is_some(), "columns");
    mark(raw.rows.is_some(), "rows");
    mark(raw.width.is_some(), "width");
    mark(raw.height.is_some(), "height");
    mark(raw.items.is_some(), "items");
    mark(raw.content.is_some(), "content");
    mark(raw.title.is_some(), "title");
    mark(raw.caption.is_some(), "caption");
    mark(raw.url.is_some(), "url");
    mark(raw.alt.is_some(), "alt");
    mark(raw.author.is_some(), "author");
    mark(raw.attribution.is_some(), "attribution");
    mark(raw.citation.is_some(), "citation");
    mark(raw.reason.is_some(), "reason");
    mark(raw.language.is_some(), "language");
    mark(raw.variant.is_some(), "variant");
    mark(raw.header, "header");
    fields
}

/// Fields each block type understands.
fn supported_fields(kind: BlockType) -> &'static [&'static str] {
    match kind {
        BlockType::Paragraph => &["lines", "sentences", "words", "content"],
        BlockType::Listing => &["title", "language", "lines", "callouts"],
        BlockType::Table => &["columns", "rows", "caption", "header"],
        BlockType::Image => &["url", "width", "height", "alt"],
        BlockType::Verse => &["author", "attribution", "content"],
        BlockType::Admonition => &["variant", "title", "content"],
        BlockType::Pass => &["content", "reason"],
        BlockType::Literal => &["title", "lines"],
        BlockType::Audio => &["url", "title"],
        BlockType::Quote => &["author", "citation", "content"],
        BlockType::Sidebar => &["title", "content"],
        BlockType::Example => &["title", "caption"],
        BlockType::Video => &["url", "width", "height", "caption"],
        BlockType::Ulist => &["items"],
    }
}

fn block_rule(raw: RawBlock) -> Result<BlockRule> {
    let context = match &raw.name {
        Some(name) => format!("block '{}' ({})", name, raw.kind),
        None => format!("block '{}'", raw.kind),
    };
    let build = || -> Result<BlockRule> {
        let supported = supported_fields(raw.kind);
        if let Some(field) = present_fields(&raw)
            .into_iter()
            .find(|f| !supported.contains(f))
        {
            return Err(DocruleError::invalid_config(format!(
                "field '{}' is not valid for {} blocks",
                field, raw.kind
            )));
        }

        let raw = raw.clone();
        let spec = match raw.kind {
            BlockType::Paragraph => BlockSpec::Paragraph(ParagraphRules {
                lines: count(raw.lines)?,
                sentences: count(raw.sentences)?,
                words: count(raw.words)?,
                content: text(raw.content)?,
            }),
            BlockType::Listing => BlockSpec::Listing(ListingRules {
                title: text(raw.title)?,
                language: allowed(raw.language)?,
                lines: count(raw.lines)?,
                callouts: count(raw.callouts)?,
            }),
            BlockType::Table => BlockSpec::Table(TableRules {
                columns: count(raw.columns)?,
                rows: count(raw.rows)?,
                caption: text(raw.caption)?,
                header_required: raw.header,
            }),
            BlockType::Image => BlockSpec::Image(ImageRules {
                url: text(raw.url)?,
                width: count(raw.width)?,
                height: count(raw.height)?,
                alt: text(raw.alt)?,
            }),
            BlockType::Verse => BlockSpec::Verse(VerseRules {
                author: text(raw.author)?,
                attribution: text(raw.attribution)?,
                content: text(raw.content)?,
            }),
            BlockType::Admonition => BlockSpec::Admonition(AdmonitionRules {
                variant: allowed(raw.variant)?,
                title: text(raw.title)?,
                content: text(raw.content)?,
            }),
            BlockType::Pass => BlockSpec::Pass(PassRules {
                content: text(raw.content)?,
                reason: text(raw.reason)?,
            }),
            BlockType::Literal => BlockSpec::Literal(LiteralRules {
                title: text(raw.title)?,
                lines: count(raw.lines)?,
            }),
            BlockType::Audio => BlockSpec::Audio(AudioRules {
                url: text(raw.url)?,
                title: text(raw.title)?,
            }),
            BlockType::Quote => BlockSpec::Quote(QuoteRules {
                author: text(raw.author)?,
                citation: text(raw.citation)?,
                content: text(raw.content)?,
            }),
            BlockType::Sidebar => BlockSpec::Sidebar(SidebarRules {
                title: text(raw.title)?,
                content: text(raw.content)?,
            }),
            BlockType::Example => BlockSpec::Example(ExampleRules {
                title: text(raw.title)?,
                caption: text(raw.caption)?,
            }),
            BlockType::Video => BlockSpec::Video(VideoRules {
                url: text(raw.url)?,
                width: count(raw.width)?,
                height: count(raw.height)?,
                caption: text(raw.caption)?,
            }),
            BlockType::Ulist => BlockSpec::Ulist(UlistRules {
                items: count(raw.items)?,
            }),
        };

        let severity = raw.severity.unwrap_or(Severity::Error);
        let mut rule = BlockRule::new(spec)
            .with_severity(severity)
            .with_occurrence(occurrence(raw.occurrence, severity)?);
        if let Some(name) = raw.name {
            rule = rule.with_name(name);
        }
        Ok(rule)
    };
    build().map_err(|e| within(&context, e))
}
