//! Content block instances.

use serde::{Deserialize, Serialize};

use super::location::Position;

/// Closed set of content block types.
///
/// Declaration order is the canonical block order used when sorting
/// occurrence messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Paragraph,
    Listing,
    Table,
    Image,
    Verse,
    Admonition,
    Pass,
    Literal,
    Audio,
    Quote,
    Sidebar,
    Example,
    Video,
    #[serde(alias = "unordered-list")]
    Ulist,
}

impl BlockType {
    /// Every block type in canonical order.
    pub const ALL: [BlockType; 14] = [
        BlockType::Paragraph,
        BlockType::Listing,
        BlockType::Table,
        BlockType::Image,
        BlockType::Verse,
        BlockType::Admonition,
        BlockType::Pass,
        BlockType::Literal,
        BlockType::Audio,
        BlockType::Quote,
        BlockType::Sidebar,
        BlockType::Example,
        BlockType::Video,
        BlockType::Ulist,
    ];

    /// Lower-case tag as written in rule files.
    pub fn tag(self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Listing => "listing",
            BlockType::Table => "table",
            BlockType::Image => "image",
            BlockType::Verse => "verse",
            BlockType::Admonition => "admonition",
            BlockType::Pass => "pass",
            BlockType::Literal => "literal",
            BlockType::Audio => "audio",
            BlockType::Quote => "quote",
            BlockType::Sidebar => "sidebar",
            BlockType::Example => "example",
            BlockType::Video => "video",
            BlockType::Ulist => "ulist",
        }
    }

    /// 1-based position in the canonical block order.
    pub fn priority(self) -> usize {
        self as usize + 1
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One content block as delivered by the parser.
///
/// Which optional fields are filled depends on the block type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockType,
    #[serde(default)]
    pub position: Position,
    /// Explicit block name, used to pick between same-typed rules.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub citation: Option<String>,
    /// Admonition kind (NOTE, TIP, ...).
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub width: Option<u64>,
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(default)]
    pub columns: Option<u64>,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub header: bool,
    #[serde(default)]
    pub callouts: Option<u64>,
    #[serde(default)]
    pub items: Vec<String>,
}

impl Block {
    /// An empty block of the given type at `position`.
    pub fn new(kind: BlockType, position: Position) -> Self {
        Self {
            kind,
            position,
            name: None,
            title: None,
            text: None,
            url: None,
            caption: None,
            language: None,
            author: None,
            attribution: None,
            citation: None,
            variant: None,
            alt: None,
            reason: None,
            width: None,
            height: None,
            columns: None,
            rows: None,
            header: false,
            callouts: None,
            items: Vec::new(),
        }
    }

    /// Set the body text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the block title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of lines in the body text.
    pub fn line_count(&self) -> u64 {
        self.text.as_deref().map_or(0, |t| t.lines().count() as u64)
    }

    /// Sentences of the body text, trimmed, in order.
    pub fn sentences(&self) -> Vec<&str> {
        self.text.as_deref().map_or_else(Vec::new, split_sentences)
    }
}

/// Split text at `.`, `!` or `?` followed by whitespace or end of text.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                let end = idx + ch.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_declaration_order() {
        assert_eq!(BlockType::Paragraph.priority(), 1);
        assert_eq!(BlockType::Listing.priority(), 2);
        assert_eq!(BlockType::Ulist.priority(), 14);
        assert!(BlockType::Table.priority() < BlockType::Image.priority());
    }

    #[test]
    fn tags_round_trip_through_serde() {
        for kind in BlockType::ALL {
            let yaml = serde_yaml::to_string(&kind).unwrap();
            assert_eq!(yaml.trim(), kind.tag());
        }
        let ulist: BlockType = serde_yaml::from_str("unordered-list").unwrap();
        assert_eq!(ulist, BlockType::Ulist);
    }

    #[test]
    fn line_count_counts_text_lines() {
        let block = Block::new(BlockType::Listing, Position::line(4)).with_text("a\nb\nc");
        assert_eq!(block.line_count(), 3);
        assert_eq!(Block::new(BlockType::Listing, Position::line(4)).line_count(), 0);
    }

    #[test]
    fn sentences_split_on_terminators() {
        let block = Block::new(BlockType::Paragraph, Position::line(1))
            .with_text("First one. Second, with v1.2 inside! Third?  trailing");
        assert_eq!(
            block.sentences(),
            vec!["First one.", "Second, with v1.2 inside!", "Third?", "trailing"]
        );
    }

    #[test]
    fn block_deserializes_with_defaults() {
        let block: Block = serde_json::from_str(r#"{"type": "image", "url": "a.png"}"#).unwrap();
        assert_eq!(block.kind, BlockType::Image);
        assert_eq!(block.url.as_deref(), Some("a.png"));
        assert_eq!(block.position.line, 1);
        assert!(!block.header);
    }
}
