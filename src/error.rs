//! Error types for docrule operations.
//!
//! This module defines [`DocruleError`], the error type used outside the
//! validation engine, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Rule violations found in documents are never errors; they are
//!   [`ValidationMessage`](crate::validate::ValidationMessage)s
//! - Use `DocruleError` for configuration and I/O failures that stop work
//! - Use `anyhow::Error` (via `DocruleError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for docrule operations.
#[derive(Debug, Error)]
pub enum DocruleError {
    /// Rule file not found at the given location.
    #[error("Rule file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the rule file.
    #[error("Failed to parse rules at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Rule file parsed but describes an inconsistent rule tree.
    #[error("Invalid rule configuration: {message}")]
    ConfigValidation { message: String },

    /// A configured regular expression does not compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocruleError {
    /// Shorthand for a [`DocruleError::ConfigValidation`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Whether the error comes from the rule configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParse { .. }
                | Self::ConfigValidation { .. }
                | Self::InvalidPattern { .. }
        )
    }
}

/// Result type alias for docrule operations.
pub type Result<T> = std::result::Result<T, DocruleError>;
