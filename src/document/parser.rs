//! Document parser seam.
//!
//! Markup parsing is outside this crate. [`DocumentParser`] is the seam an
//! upstream parser plugs into; [`TreeFileParser`] loads trees that were
//! already serialized to JSON (`.json`) or YAML (anything else).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Document;

/// Why a document tree could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The file could not be read.
    Io { path: PathBuf, message: String },
    /// The file was read but is not a valid tree.
    Parse { path: PathBuf, message: String },
}

impl ParseFailure {
    /// Rule id used for the message reporting this failure.
    pub fn rule_id(&self) -> &'static str {
        match self {
            ParseFailure::Io { .. } => "io-error",
            ParseFailure::Parse { .. } => "parse-error",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ParseFailure::Io { path, .. } | ParseFailure::Parse { path, .. } => path,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseFailure::Io { message, .. } | ParseFailure::Parse { message, .. } => message,
        }
    }
}

/// Produces document trees for files.
pub trait DocumentParser: Sync {
    /// Parse the document at `path`.
    fn parse(&self, path: &Path) -> Result<Document, ParseFailure>;
}

/// Reads pre-parsed document trees from JSON or YAML files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFileParser;

impl TreeFileParser {
    /// Create a new tree file parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a tree from text. `path` picks the format and becomes the
    /// document source when the tree does not name one.
    pub fn parse_str(&self, path: &Path, content: &str) -> Result<Document, ParseFailure> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed: Result<Document, String> = if is_json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        };

        let mut document = parsed.map_err(|message| ParseFailure::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        if document.source.as_os_str().is_empty() {
            document.source = path.to_path_buf();
        }
        Ok(document)
    }
}

impl DocumentParser for TreeFileParser {
    fn parse(&self, path: &Path) -> Result<Document, ParseFailure> {
        debug!("Reading document tree from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| ParseFailure::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.parse_str(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_json_tree() {
        let parser = TreeFileParser::new();
        let doc = parser
            .parse_str(Path::new("doc.json"), r#"{"title": "Guide"}"#)
            .unwrap();
        assert_eq!(doc.title.as_deref(), Some("Guide"));
        assert_eq!(doc.source, PathBuf::from("doc.json"));
    }

    #[test]
    fn keeps_declared_source() {
        let parser = TreeFileParser::new();
        let doc = parser
            .parse_str(Path::new("tree.yml"), "source: guide.adoc\n")
            .unwrap();
        assert_eq!(doc.source, PathBuf::from("guide.adoc"));
    }

    #[test]
    fn malformed_tree_is_parse_failure() {
        let parser = TreeFileParser::new();
        let err = parser
            .parse_str(Path::new("doc.json"), "{not json")
            .unwrap_err();
        assert_eq!(err.rule_id(), "parse-error");
        assert_eq!(err.path(), Path::new("doc.json"));
    }

    #[test]
    fn missing_file_is_io_failure() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        let err = TreeFileParser::new().parse(&missing).unwrap_err();
        assert_eq!(err.rule_id(), "io-error");
        assert!(!err.message().is_empty());
    }

    #[test]
    fn reads_file_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.yml");
        fs::write(&path, "title: On disk\n").unwrap();

        let doc = TreeFileParser::new().parse(&path).unwrap();
        assert_eq!(doc.title.as_deref(), Some("On disk"));
        assert_eq!(doc.source, path);
    }
}
