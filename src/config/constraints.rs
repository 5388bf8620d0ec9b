//! Constraint primitives shared by section, block and attribute rules.
//!
//! Every type here is built through a constructor that rejects
//! inconsistent input (bad regex, `min > max`), so a value that exists is
//! always usable by the validator without further checks.

use regex::Regex;

use crate::error::{DocruleError, Result};
use crate::validate::Severity;

/// A compiled regular expression that remembers its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    partial: Regex,
    full: Regex,
}

impl Pattern {
    /// Compile `source`.
    pub fn new(source: &str) -> Result<Self> {
        let invalid = |e: regex::Error| DocruleError::InvalidPattern {
            pattern: source.to_string(),
            message: e.to_string(),
        };
        let partial = Regex::new(source).map_err(invalid)?;
        let full = Regex::new(&format!("^(?:{})$", source)).map_err(invalid)?;
        Ok(Self {
            source: source.to_string(),
            partial,
            full,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the whole of `value` matches.
    pub fn matches(&self, value: &str) -> bool {
        self.full.is_match(value)
    }

    /// Whether the pattern occurs anywhere in `value`.
    pub fn is_found(&self, value: &str) -> bool {
        self.partial.is_match(value)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

fn check_bounds<T: PartialOrd + std::fmt::Display>(
    min: Option<T>,
    max: Option<T>,
    what: &str,
) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(DocruleError::invalid_config(format!(
            "{}: min ({}) is greater than max ({})",
            what, min, max
        ))),
        _ => Ok(()),
    }
}

/// Which bound a measured value broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min(u64),
    Max(u64),
}

/// Inclusive numeric range for counts and dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRange {
    min: Option<u64>,
    max: Option<u64>,
    severity: Option<Severity>,
}

impl CountRange {
    pub fn new(min: Option<u64>, max: Option<u64>, severity: Option<Severity>) -> Result<Self> {
        check_bounds(min, max, "range")?;
        Ok(Self { min, max, severity })
    }

    /// Range with only a lower bound.
    pub fn at_least(min: u64) -> Self {
        Self {
            min: Some(min),
            max: None,
            severity: None,
        }
    }

    /// Range with only an upper bound.
    pub fn at_most(max: u64) -> Self {
        Self {
            min: None,
            max: Some(max),
            severity: None,
        }
    }

    /// Severity override for this field, if any.
    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    /// The bound `actual` breaks, if any.
    pub fn check(&self, actual: u64) -> Option<Bound> {
        match (self.min, self.max) {
            (Some(min), _) if actual < min => Some(Bound::Min(min)),
            (_, Some(max)) if actual > max => Some(Bound::Max(max)),
            _ => None,
        }
    }
}

/// Constraint on an optional text field.
#[derive(Debug, Clone, Default)]
pub struct TextRule {
    required: bool,
    pattern: Option<Pattern>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    severity: Option<Severity>,
}

impl TextRule {
    pub fn new(
        required: bool,
        pattern: Option<&str>,
        min_length: Option<usize>,
        max_length: Option<usize>,
        severity: Option<Severity>,
    ) -> Result<Self> {
        check_bounds(min_length, max_length, "length")?;
        Ok(Self {
            required,
            pattern: pattern.map(Pattern::new).transpose()?,
            min_length,
            max_length,
            severity,
        })
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }
}

/// Allowed values for an enumerated text field.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    allowed: Vec<String>,
    required: bool,
    severity: Option<Severity>,
}

impl AllowList {
    pub fn new(allowed: Vec<String>, required: bool, severity: Option<Severity>) -> Result<Self> {
        if allowed.iter().any(|v| v.trim().is_empty()) {
            return Err(DocruleError::invalid_config("allowed values must not be empty"));
        }
        Ok(Self {
            allowed,
            required,
            severity,
        })
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    /// Case-insensitive membership. An empty list allows everything.
    pub fn permits(&self, value: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|v| v.eq_ignore_ascii_case(value))
    }
}

/// Outcome of an occurrence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceViolation {
    TooFew { min: u64 },
    TooMany { max: u64 },
}

/// Cardinality constraint on a section or block rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceRule {
    min: u64,
    max: Option<u64>,
    order: Option<u32>,
    severity: Severity,
}

impl Default for OccurrenceRule {
    fn default() -> Self {
        Self {
            min: 0,
            max: None,
            order: None,
            severity: Severity::Error,
        }
    }
}

impl OccurrenceRule {
    pub fn new(min: u64, max: Option<u64>, order: Option<u32>, severity: Severity) -> Result<Self> {
        check_bounds(Some(min), max, "occurrence")?;
        Ok(Self {
            min,
            max,
            order,
            severity,
        })
    }

    /// Exactly `count` occurrences.
    pub fn exactly(count: u64, severity: Severity) -> Self {
        Self {
            min: count,
            max: Some(count),
            order: None,
            severity,
        }
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> Option<u64> {
        self.max
    }

    /// Declared order index, used to derive an implicit fixed order.
    pub fn order(&self) -> Option<u32> {
        self.order
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn check(&self, count: u64) -> Option<OccurrenceViolation> {
        if count < self.min {
            return Some(OccurrenceViolation::TooFew { min: self.min });
        }
        match self.max {
            Some(max) if count > max => Some(OccurrenceViolation::TooMany { max }),
            _ => None,
        }
    }
}

/// Direction of a pairwise order constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// `first` must appear before `second`.
    Before,
    /// `first` must appear after `second`.
    After,
}

/// Relative order between two named entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRule {
    pub kind: PairKind,
    pub first: String,
    pub second: String,
    pub severity: Severity,
}

/// Fixed and pairwise ordering constraints over named entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRule {
    fixed: Vec<String>,
    pairs: Vec<PairRule>,
    severity: Severity,
}

impl OrderRule {
    pub fn new(fixed: Vec<String>, pairs: Vec<PairRule>, severity: Severity) -> Result<Self> {
        for (idx, name) in fixed.iter().enumerate() {
            if fixed[..idx].contains(name) {
                return Err(DocruleError::invalid_config(format!(
                    "fixed order lists '{}' more than once",
                    name
                )));
            }
        }
        if let Some(pair) = pairs.iter().find(|p| p.first == p.second) {
            return Err(DocruleError::invalid_config(format!(
                "order constraint relates '{}' to itself",
                pair.first
            )));
        }
        Ok(Self {
            fixed,
            pairs,
            severity,
        })
    }

    /// Only a fixed sequence.
    pub fn fixed(names: Vec<String>, severity: Severity) -> Result<Self> {
        Self::new(names, Vec::new(), severity)
    }

    pub fn sequence(&self) -> &[String] {
        &self.fixed
    }

    pub fn pairs(&self) -> &[PairRule] {
        &self.pairs
    }

    /// Severity of fixed-order violations.
    pub fn severity(&self) -> Severity {
        self.severity
    }
}
