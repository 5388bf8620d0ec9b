//! SARIF 2.1.0 output.
//!
//! One run per report. Rules are listed once per id, sorted, and each
//! result carries the message kind, attribute and block type as SARIF
//! properties so code-scanning dashboards can filter on them.

use std::collections::BTreeMap;
use std::io::Write;

use serde_json::{json, Map, Value};

use super::ReportFormatter;
use crate::validate::{Severity, ValidationMessage, ValidationResult};

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// Formats results as a SARIF log.
pub struct SarifFormatter {
    pub tool_name: String,
    pub tool_version: String,
}

impl SarifFormatter {
    pub fn new(tool_name: impl Into<String>, tool_version: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_version: tool_version.into(),
        }
    }

    fn severity_to_level(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => "note",
            Severity::Warn => "warning",
            Severity::Error => "error",
        }
    }

    fn region(m: &ValidationMessage) -> Value {
        let location = m.location();
        let mut region = Map::new();
        region.insert("startLine".into(), json!(location.line));
        if let Some(col) = location.start_col {
            region.insert("startColumn".into(), json!(col));
        }
        // exclusive in SARIF, inclusive in our locations
        if let Some(col) = location.end_col {
            region.insert("endColumn".into(), json!(col + 1));
        }
        Value::Object(region)
    }

    fn properties(m: &ValidationMessage) -> Option<Value> {
        let mut props = Map::new();
        if let Some(kind) = m.kind() {
            props.insert("kind".into(), json!(kind));
        }
        if let Some(attribute) = m.attribute() {
            props.insert("attribute".into(), json!(attribute));
        }
        if let Some(block_type) = m.block_type() {
            props.insert("blockType".into(), json!(block_type));
        }
        (!props.is_empty()).then_some(Value::Object(props))
    }

    fn result(m: &ValidationMessage) -> Value {
        let text = match (m.actual(), m.expected()) {
            (Some(actual), Some(expected)) => {
                format!("{} (found: {}; expected: {})", m.message(), actual, expected)
            }
            _ => m.message().to_string(),
        };

        let mut result = json!({
            "ruleId": m.rule_id().as_str(),
            "level": Self::severity_to_level(m.severity()),
            "message": { "text": text },
            "locations": [{
                "physicalLocation": {
                    "artifactLocation": { "uri": m.location().file.display().to_string() },
                    "region": Self::region(m),
                }
            }],
        });
        if let Some(props) = Self::properties(m) {
            result["properties"] = props;
        }
        result
    }
}

impl Default for SarifFormatter {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

impl ReportFormatter for SarifFormatter {
    fn format<W: Write>(&self, result: &ValidationResult, writer: &mut W) -> std::io::Result<()> {
        // described by the first message seen for each id
        let mut first_seen: BTreeMap<&str, &ValidationMessage> = BTreeMap::new();
        for m in result.messages() {
            first_seen.entry(m.rule_id().as_str()).or_insert(m);
        }
        let rules: Vec<Value> = first_seen
            .into_iter()
            .map(|(id, m)| {
                json!({
                    "id": id,
                    "shortDescription": { "text": m.message() },
                    "defaultConfiguration": { "level": Self::severity_to_level(m.severity()) },
                })
            })
            .collect();
        let results: Vec<Value> = result.messages().iter().map(Self::result).collect();

        let log = json!({
            "$schema": SARIF_SCHEMA,
            "version": SARIF_VERSION,
            "runs": [{
                "tool": {
                    "driver": {
                        "name": self.tool_name,
                        "version": self.tool_version,
                        "rules": rules,
                    }
                },
                "results": results,
            }],
        });

        serde_json::to_writer_pretty(&mut *writer, &log).map_err(std::io::Error::other)?;
        writeln!(writer)?;

        Ok(())
    }
}
