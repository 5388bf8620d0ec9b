//! Parsed document trees.
//!
//! The validator never parses markup. It consumes the tree described here:
//! a [`Document`] with header attributes, root-level (preamble) blocks and
//! nested [`Section`]s, each owning its blocks and child sections.
//!
//! Trees come from a [`DocumentParser`]; [`TreeFileParser`] reads trees
//! that were serialized to JSON or YAML by an upstream parser.

pub mod block;
pub mod location;
pub mod parser;

pub use block::{Block, BlockType};
pub use location::{Position, SourceLocation};
pub use parser::{DocumentParser, ParseFailure, TreeFileParser};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A parsed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    /// Source file the tree was parsed from.
    pub source: PathBuf,
    /// Document title, if any.
    pub title: Option<String>,
    /// Position of the document header.
    pub position: Position,
    /// Header attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Blocks before the first section.
    pub blocks: Vec<Block>,
    /// Level-1 sections.
    pub sections: Vec<Section>,
}

impl Document {
    /// Create an empty document for `source`.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Resolve a node position to a location in this document.
    pub fn locate(&self, position: &Position) -> SourceLocation {
        SourceLocation::at(&self.source, position)
    }

    /// Location of the document header.
    pub fn origin(&self) -> SourceLocation {
        self.locate(&self.position)
    }
}

/// A header attribute (`key: value`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub position: Position,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            position: Position::line(line),
        }
    }
}

/// A section and everything nested below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Nesting level, 1 for top-level sections.
    pub level: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Section {
    /// Create an empty section.
    pub fn new(level: u32, title: impl Into<String>, line: usize) -> Self {
        Self {
            level,
            title: Some(title.into()),
            position: Position::line(line),
            blocks: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Append a block.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Append a child section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}
