//! Integration tests for the docrule binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const RULES: &str = r#"
document:
  metadata:
    attributes:
      - name: title
        required: true
        minLength: 10
  sections:
    - name: body
      level: 1
      allowedBlocks:
        - type: paragraph
          occurrence: { min: 1 }
"#;

const CLEAN_DOC: &str = r#"
attributes:
  - name: title
    value: A long enough title
sections:
  - level: 1
    title: Body
    position: { line: 3 }
    blocks:
      - type: paragraph
        text: Hello.
        position: { line: 4 }
"#;

const FAILING_DOC: &str = r#"
attributes:
  - name: title
    value: Short
sections:
  - level: 1
    title: One
    position: { line: 3 }
  - level: 1
    title: Two
    position: { line: 7 }
"#;

fn setup(rules: &str, docs: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("rules.yml"), rules).unwrap();
    for (name, content) in docs {
        fs::write(temp.path().join(name), content).unwrap();
    }
    temp
}

fn docrule(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("docrule"));
    cmd.current_dir(temp.path())
        .env_remove("DOCRULE_RULES")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("docrule"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Validate document structure"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("docrule"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn clean_document_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup(RULES, &[("guide.yml", CLEAN_DOC)]);
    docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "guide.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found in 1 file(s)"));
    Ok(())
}

#[test]
fn failing_document_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup(RULES, &[("guide.yml", FAILING_DOC)]);
    docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "guide.yml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[length.min]"))
        .stdout(predicate::str::contains("Too few occurrences of block: paragraph"))
        .stdout(predicate::str::contains("Found 3 error(s)"));
    Ok(())
}

#[test]
fn missing_rule_file_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup("", &[("guide.yml", CLEAN_DOC)]);
    docrule(&temp)
        .args(["validate", "--rules", "absent.yml", "guide.yml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("absent.yml"));
    Ok(())
}

#[test]
fn invalid_rules_exit_two() -> Result<(), Box<dyn std::error::Error>> {
    let rules = r#"
document:
  metadata:
    attributes:
      - name: title
        minLength: 20
        maxLength: 5
"#;
    let temp = setup(rules, &[("guide.yml", CLEAN_DOC)]);
    docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "guide.yml"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn rules_path_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup(RULES, &[("guide.yml", CLEAN_DOC)]);
    docrule(&temp)
        .env("DOCRULE_RULES", "rules.yml")
        .args(["validate", "guide.yml"])
        .assert()
        .success();
    Ok(())
}

#[test]
fn json_format_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup(RULES, &[("guide.yml", FAILING_DOC)]);
    let output = docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "--format", "json", "guide.yml"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["summary"]["errors"], 3);
    assert_eq!(parsed["messages"][0]["rule_id"], "length.min");
    assert!(parsed["timestamp"].is_string());
    Ok(())
}

#[test]
fn sarif_format_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup(RULES, &[("guide.yml", FAILING_DOC)]);
    let output = docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "--format", "sarif", "guide.yml"])
        .output()?;

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["version"], "2.1.0");
    assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "docrule");
    assert_eq!(parsed["runs"][0]["results"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[test]
fn group_flag_collapses_similar_messages() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup(RULES, &[("guide.yml", FAILING_DOC)]);
    docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "--group", "guide.yml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("(2 occurrences)"));
    Ok(())
}

#[test]
fn fail_level_from_settings() -> Result<(), Box<dyn std::error::Error>> {
    let rules = r#"
document:
  metadata:
    attributes:
      - name: title
        minLength: 10
        severity: WARN
settings:
  failLevel: ERROR
"#;
    let temp = setup(rules, &[("guide.yml", FAILING_DOC)]);
    docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "guide.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARN"));

    docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "--fail-level", "warn", "guide.yml"])
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn unreadable_documents_do_not_stop_the_run() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup(RULES, &[("guide.yml", CLEAN_DOC), ("broken.json", "{")]);
    docrule(&temp)
        .args([
            "validate",
            "--rules",
            "rules.yml",
            "--parallel",
            "guide.yml",
            "broken.json",
            "absent.yml",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[parse-error]"))
        .stdout(predicate::str::contains("[io-error]"))
        .stdout(predicate::str::contains("3 file(s)"));
    Ok(())
}

#[test]
fn no_color_output_has_no_escape_codes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup(RULES, &[("guide.yml", FAILING_DOC)]);
    docrule(&temp)
        .args(["validate", "--rules", "rules.yml", "guide.yml"])
        .assert()
        .stdout(predicate::str::contains("\u{1b}[").not());
    Ok(())
}
