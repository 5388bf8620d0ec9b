//! Integration tests for the validation engine through the public API.

use std::fs;
use std::path::{Path, PathBuf};

use docrule::config::{parse_rules, RuleSet};
use docrule::document::{Document, TreeFileParser};
use docrule::report::group_messages;
use docrule::validate::{BatchValidator, Severity, ValidationMessage, Validator};
use tempfile::TempDir;

fn rules(yaml: &str) -> RuleSet {
    parse_rules(Path::new("rules.yml"), yaml).unwrap().rules
}

fn document(yaml: &str) -> Document {
    TreeFileParser::new()
        .parse_str(Path::new("guide.yml"), yaml)
        .unwrap()
}

fn validate(rules: &RuleSet, doc: &Document) -> Vec<ValidationMessage> {
    let validator = Validator::new(rules);
    let mut messages = validator.validate(doc);
    validator.sorter().sort(&mut messages);
    messages
}

#[test]
fn short_title_reports_length() {
    let rules = rules(
        r#"
document:
  metadata:
    attributes:
      - name: title
        required: true
        minLength: 10
"#,
    );
    let doc = document(
        r#"
attributes:
  - name: title
    value: Short
    position: { line: 1 }
"#,
    );

    let messages = validate(&rules, &doc);

    assert_eq!(messages.len(), 1);
    let msg = &messages[0];
    assert_eq!(msg.severity(), Severity::Error);
    assert_eq!(msg.rule_id().as_str(), "length.min");
    assert!(msg.actual().unwrap().contains("Short (5 characters)"));
    assert_eq!(msg.expected(), Some("Minimum 10 characters"));
}

#[test]
fn duplicate_section_reports_too_many() {
    let rules = rules(
        r#"
document:
  sections:
    - name: intro
      level: 1
      title:
        pattern: "^Intro"
      occurrence:
        min: 1
        max: 1
        severity: WARN
"#,
    );
    let doc = document(
        r#"
sections:
  - level: 1
    title: Introduction
    position: { line: 3 }
  - level: 1
    title: Intro, again
    position: { line: 9 }
"#,
    );

    let messages = validate(&rules, &doc);

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].rule_id().as_str(), "section.occurrence.max");
    assert_eq!(messages[0].severity(), Severity::Warn);
    assert_eq!(messages[0].actual(), Some("2 occurrences"));
}

#[test]
fn missing_paragraph_reports_too_few() {
    let rules = rules(
        r#"
document:
  sections:
    - name: body
      level: 1
      allowedBlocks:
        - type: paragraph
          occurrence:
            min: 1
            max: 3
"#,
    );
    let doc = document(
        r#"
sections:
  - level: 1
    title: Body
    position: { line: 4 }
"#,
    );

    let messages = validate(&rules, &doc);

    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].message(),
        "Too few occurrences of block: paragraph"
    );
    assert_eq!(messages[0].location().line, 4);
}

#[test]
fn attribute_order_names_both_lines() {
    let rules = rules(
        r#"
document:
  metadata:
    attributes:
      - name: version
        order: 1
      - name: author
        order: 2
"#,
    );
    let doc = document(
        r#"
attributes:
  - name: author
    value: Jo
    position: { line: 2 }
  - name: version
    value: "1.0"
    position: { line: 3 }
"#,
    );

    let messages = validate(&rules, &doc);

    assert_eq!(messages.len(), 1);
    let msg = &messages[0];
    assert_eq!(msg.message(), "Attribute 'version' should appear before 'author'");
    let actual = msg.actual().unwrap();
    assert!(actual.contains("line 3"));
    assert!(actual.contains("line 2"));
}

#[test]
fn validation_is_idempotent() {
    let rules = rules(
        r#"
document:
  metadata:
    attributes:
      - name: title
        required: true
        pattern: "^[A-Z]"
      - name: version
        order: 1
      - name: author
        order: 2
  sections:
    - name: body
      level: 1
      allowedBlocks:
        - type: paragraph
          occurrence: { min: 1 }
"#,
    );
    let doc = document(
        r#"
attributes:
  - name: title
    value: lowercase title
  - name: author
    value: Jo
    position: { line: 2 }
  - name: version
    value: "2"
    position: { line: 3 }
sections:
  - level: 1
    title: Body
    position: { line: 6 }
  - level: 1
    title: More
    position: { line: 8 }
"#,
    );

    let first = validate(&rules, &doc);
    let second = validate(&rules, &doc);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn reports_are_sorted_by_location() {
    let rules = rules(
        r#"
document:
  sections:
    - name: body
      level: 1
      allowedBlocks:
        - type: paragraph
          occurrence: { min: 1 }
"#,
    );
    let doc = document(
        r#"
sections:
  - level: 1
    title: Late
    position: { line: 20 }
  - level: 1
    title: Early
    position: { line: 5 }
"#,
    );

    let messages = validate(&rules, &doc);

    let lines: Vec<usize> = messages.iter().map(|m| m.location().line).collect();
    assert_eq!(lines, [5, 20]);
}

#[test]
fn similar_messages_are_grouped() {
    let rules = rules(
        r#"
document:
  sections:
    - name: body
      level: 1
      allowedBlocks:
        - type: paragraph
          occurrence: { min: 1 }
"#,
    );
    let doc = document(
        r#"
sections:
  - level: 1
    title: One
    position: { line: 2 }
  - level: 1
    title: Two
    position: { line: 4 }
  - level: 1
    title: Three
    position: { line: 6 }
"#,
    );

    let messages = validate(&rules, &doc);
    let grouping = group_messages(&messages);

    assert_eq!(grouping.groups.len(), 1);
    assert_eq!(grouping.groups[0].len(), 3);
    assert!(grouping.groups[0].fix.is_some());
    assert!(grouping.ungrouped.is_empty());
}

#[test]
fn disallowed_languages_group_regardless_of_value_length() {
    let rules = rules(
        r#"
document:
  sections:
    - name: body
      level: 1
      allowedBlocks:
        - type: listing
          language: { allowed: [rust] }
"#,
    );
    let doc = document(
        r#"
sections:
  - level: 1
    title: Body
    position: { line: 2 }
    blocks:
      - type: listing
        language: c
        position: { line: 3 }
      - type: listing
        language: go
        position: { line: 8 }
"#,
    );

    let messages = validate(&rules, &doc);
    let grouping = group_messages(&messages);

    assert_eq!(messages.len(), 2);
    assert_eq!(grouping.groups.len(), 1);
    assert!(grouping.ungrouped.is_empty());
    assert_eq!(
        grouping.groups[0].pattern,
        "Listing block language '{value}' is not allowed"
    );
}

#[test]
fn batch_keeps_input_order_and_reports_bad_files() {
    let temp = TempDir::new().unwrap();
    let write = |name: &str, content: &str| -> PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    };
    let good = write("good.yml", "attributes:\n  - name: title\n    value: Fine title here\n");
    let broken = write("broken.json", "{ not json");
    let absent = temp.path().join("absent.yml");

    let rules = rules(
        r#"
document:
  metadata:
    attributes:
      - name: title
        required: true
"#,
    );
    let validator = Validator::new(&rules);
    let parser = TreeFileParser::new();

    for parallel in [false, true] {
        let result = BatchValidator::new(&parser, &validator)
            .parallel(parallel)
            .validate(&[good.clone(), broken.clone(), absent.clone()])
            .unwrap();

        assert_eq!(result.files(), [good.clone(), broken.clone(), absent.clone()]);
        let ids: Vec<&str> = result
            .messages()
            .iter()
            .map(|m| m.rule_id().as_str())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"parse-error"));
        assert!(ids.contains(&"io-error"));
        assert_eq!(result.counts().errors, 2);
    }
}

#[test]
fn invalid_rule_pattern_is_rejected_before_validation() {
    let result = parse_rules(
        Path::new("rules.yml"),
        r#"
document:
  metadata:
    attributes:
      - name: title
        pattern: "[unclosed"
"#,
    );

    let err = result.unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("title"));
}
