//! Document validation.
//!
//! - [`attributes`] - Header attribute rules and the per-document session
//! - [`blocks`] - Block field, occurrence and order checks
//! - [`sections`] - Section matching and recursion
//! - [`engine`] - Single-document validation
//! - [`batch`] - Many documents, optionally in parallel
//! - [`result`] - Sorted, counted results

pub mod attributes;
pub mod batch;
pub mod blocks;
pub mod engine;
pub mod message;
pub mod result;
pub mod rule;
pub mod sections;

pub use attributes::{AttributeRule, MetadataSession};
pub use batch::{failure_message, BatchValidator, FileOutcome};
pub use blocks::BlockValidator;
pub use engine::{ValidationOptions, Validator};
pub use message::{ErrorKind, Suggestion, ValidationMessage};
pub use result::{SeverityCounts, ValidationResult, ValidationResultBuilder};
pub use rule::{RuleId, Severity};
pub use sections::{RootPolicy, SectionMatcher};
