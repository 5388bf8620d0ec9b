//! docrule - Document structure validation against declarative rules.
//!
//! docrule checks parsed document trees (header attributes, nested
//! sections, typed content blocks) against a rule file and reports every
//! violation as a located, sorted message.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Rule file loading and the validated rule tree
//! - [`document`] - Document trees and source locations
//! - [`error`] - Error types and result aliases
//! - [`report`] - Message ordering, grouping and output formats
//! - [`validate`] - The validation engine
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use docrule::config::parse_rules;
//! use docrule::document::{Attribute, Document};
//! use docrule::validate::Validator;
//!
//! let yaml = "
//! document:
//!   metadata:
//!     attributes:
//!       - name: title
//!         minLength: 10
//! ";
//! let loaded = parse_rules(Path::new("rules.yml"), yaml).unwrap();
//!
//! let mut doc = Document::new("guide.adoc");
//! doc.attributes.push(Attribute::new("title", "Short", 1));
//!
//! let messages = Validator::new(&loaded.rules).validate(&doc);
//! assert_eq!(messages[0].rule_id().as_str(), "length.min");
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod report;
pub mod validate;

pub use error::{DocruleError, Result};
