//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::report::OutputFormat;
use crate::validate::Severity;

/// docrule - Validate document structure against declarative rules.
#[derive(Debug, Parser)]
#[command(name = "docrule")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate documents against a rule file
    Validate(ValidateArgs),
}

/// Arguments for the `validate` command.
///
/// Options left unset fall back to the rule file's `settings`.
#[derive(Debug, Clone, clap::Args)]
pub struct ValidateArgs {
    /// Rule file (YAML, or JSON with a .json extension)
    #[arg(short, long, env = "DOCRULE_RULES")]
    pub rules: PathBuf,

    /// Document trees to validate
    #[arg(required = true)]
    pub documents: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Group similar messages
    #[arg(long)]
    pub group: bool,

    /// Lowest severity that makes the run fail
    #[arg(long, value_parser = parse_severity)]
    pub fail_level: Option<Severity>,

    /// Hide suggestions
    #[arg(long)]
    pub no_suggestions: bool,

    /// Source lines to show around each message
    #[arg(long, value_name = "LINES")]
    pub context: Option<usize>,

    /// Report ambiguous root rules
    #[arg(long)]
    pub strict_root: bool,

    /// Validate documents in parallel
    #[arg(long)]
    pub parallel: bool,
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_validate_flags() {
        let cli = Cli::try_parse_from([
            "docrule",
            "--no-color",
            "validate",
            "--rules",
            "rules.yml",
            "--format",
            "json",
            "--fail-level",
            "warn",
            "--context",
            "2",
            "guide.json",
            "other.json",
        ])
        .unwrap();

        assert!(cli.no_color);
        let Commands::Validate(args) = cli.command;
        assert_eq!(args.rules, PathBuf::from("rules.yml"));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.fail_level, Some(Severity::Warn));
        assert_eq!(args.context, Some(2));
        assert_eq!(args.documents.len(), 2);
        assert!(!args.group);
    }

    #[test]
    fn documents_are_required() {
        assert!(Cli::try_parse_from(["docrule", "validate", "--rules", "r.yml"]).is_err());
    }

    #[test]
    fn rejects_unknown_severity() {
        let parsed = Cli::try_parse_from([
            "docrule",
            "validate",
            "--rules",
            "r.yml",
            "--fail-level",
            "fatal",
            "a.json",
        ]);
        assert!(parsed.is_err());
    }
}
