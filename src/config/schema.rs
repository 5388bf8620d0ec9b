//! Rule file schema.
//!
//! These structs map one-to-one onto the YAML/JSON rule file. They are
//! plain data; [`loader`](super::loader) turns them into the validated
//! [`RuleSet`](super::RuleSet).

use serde::{Deserialize, Serialize};

use crate::document::BlockType;
use crate::report::OutputFormat;
use crate::validate::Severity;

/// Root of a rule file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawConfig {
    /// Document structure rules
    pub document: RawDocument,

    /// Report and validation settings
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawDocument {
    pub metadata: RawMetadata,
    pub sections: Vec<RawSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawMetadata {
    pub attributes: Vec<RawAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawAttribute {
    pub name: String,
    pub order: Option<u32>,
    #[serde(default)]
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawSection {
    pub name: String,
    pub level: u32,
    pub order: Option<u32>,
    pub occurrence: Option<RawOccurrence>,
    pub title: Option<RawTitle>,
    #[serde(default)]
    pub allowed_blocks: Vec<RawBlock>,
    pub block_order: Option<RawOrder>,
    #[serde(default)]
    pub subsections: Vec<RawSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawOccurrence {
    pub min: u64,
    pub max: Option<u64>,
    pub order: Option<u32>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawTitle {
    pub pattern: String,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawOrder {
    pub fixed: Vec<String>,
    pub before: Vec<RawPair>,
    pub after: Vec<RawPair>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawPair {
    pub first: String,
    pub second: String,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawCount {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawText {
    pub required: bool,
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawAllowed {
    pub allowed: Vec<String>,
    pub required: bool,
    pub severity: Option<Severity>,
}

/// One allowed block. Which fields are accepted depends on `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawBlock {
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub name: Option<String>,
    pub severity: Option<Severity>,
    pub occurrence: Option<RawOccurrence>,

    // Counts and dimensions
    pub lines: Option<RawCount>,
    pub sentences: Option<RawCount>,
    pub words: Option<RawCount>,
    pub callouts: Option<RawCount>,
    pub columns: Option<RawCount>,
    pub rows: Option<RawCount>,
    pub width: Option<RawCount>,
    pub height: Option<RawCount>,
    pub items: Option<RawCount>,

    // Text fields
    pub content: Option<RawText>,
    pub title: Option<RawText>,
    pub caption: Option<RawText>,
    pub url: Option<RawText>,
    pub alt: Option<RawText>,
    pub author: Option<RawText>,
    pub attribution: Option<RawText>,
    pub citation: Option<RawText>,
    pub reason: Option<RawText>,

    // Enumerations
    pub language: Option<RawAllowed>,
    pub variant: Option<RawAllowed>,

    #[serde(default)]
    pub header: bool,
}

/// Settings that shape validation and reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Report format
    pub format: OutputFormat,

    /// Group similar messages in reports
    pub group: bool,

    /// Show suggestions in human output
    #[serde(default = "default_true")]
    pub suggestions: bool,

    /// Source lines shown around each message (human output)
    pub context_lines: usize,

    /// Lowest severity that fails the run
    #[serde(default = "default_fail_level")]
    pub fail_level: Severity,

    /// Report ambiguous root rules instead of silently taking the first
    pub strict_root: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            group: false,
            suggestions: default_true(),
            context_lines: 0,
            fail_level: default_fail_level(),
            strict_root: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fail_level() -> Severity {
    Severity::Error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let raw: RawConfig = serde_yaml::from_str("{}").unwrap();
        assert!(raw.document.sections.is_empty());
        assert!(raw.settings.suggestions);
        assert_eq!(raw.settings.fail_level, Severity::Error);
        assert_eq!(raw.settings.format, OutputFormat::Human);
    }

    #[test]
    fn parses_nested_sections_and_blocks() {
        let yaml = r#"
document:
  sections:
    - name: intro
      level: 1
      occurrence: { min: 1, max: 1 }
      title: { pattern: "^Intro", severity: WARN }
      allowedBlocks:
        - type: paragraph
          occurrence: { min: 1, max: 3 }
          lines: { max: 10 }
        - type: listing
          language: { allowed: [rust, toml], required: true }
      subsections:
        - name: details
          level: 2
"#;
        let raw: RawConfig = serde_yaml::from_str(yaml).unwrap();
        let intro = &raw.document.sections[0];
        assert_eq!(intro.allowed_blocks.len(), 2);
        assert_eq!(intro.allowed_blocks[1].kind, BlockType::Listing);
        assert_eq!(intro.subsections[0].level, 2);
        assert_eq!(intro.title.as_ref().unwrap().severity, Some(Severity::Warn));
    }

    #[test]
    fn rejects_unknown_keys() {
        let yaml = "document:\n  sectons: []\n";
        assert!(serde_yaml::from_str::<RawConfig>(yaml).is_err());
    }

    #[test]
    fn rejects_unknown_block_type() {
        let yaml = r#"
document:
  sections:
    - name: s
      level: 1
      allowedBlocks:
        - type: diagram
"#;
        assert!(serde_yaml::from_str::<RawConfig>(yaml).is_err());
    }

    #[test]
    fn parses_settings() {
        let yaml = "settings:\n  format: json\n  group: true\n  failLevel: warn\n";
        let raw: RawConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(raw.settings.format, OutputFormat::Json);
        assert!(raw.settings.group);
        assert_eq!(raw.settings.fail_level, Severity::Warn);
    }
}
