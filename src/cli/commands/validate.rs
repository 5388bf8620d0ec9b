//! Validate command implementation.
//!
//! The `docrule validate` command loads a rule file, validates every given
//! document tree and writes one report.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::args::ValidateArgs;
use crate::config::{load_rules, Settings};
use crate::document::TreeFileParser;
use crate::error::Result;
use crate::report::{
    HumanFormatter, JsonFormatter, OutputFormat, ReportFormatter, ReportOptions, SarifFormatter,
};
use crate::validate::{BatchValidator, RootPolicy, ValidationOptions, ValidationResult, Validator};

use super::dispatcher::{Command, CommandResult};

/// The validate command implementation.
pub struct ValidateCommand {
    args: ValidateArgs,
    use_color: bool,
}

impl ValidateCommand {
    /// Create a new validate command.
    pub fn new(args: ValidateArgs, use_color: bool) -> Self {
        Self { args, use_color }
    }

    /// Rule file settings with command-line flags applied on top.
    pub fn resolve_settings(&self, file: &Settings) -> Settings {
        let args = &self.args;
        Settings {
            format: args.format.unwrap_or(file.format),
            group: args.group || file.group,
            suggestions: file.suggestions && !args.no_suggestions,
            context_lines: args.context.unwrap_or(file.context_lines),
            fail_level: args.fail_level.unwrap_or(file.fail_level),
            strict_root: args.strict_root || file.strict_root,
        }
    }

    fn render(
        &self,
        settings: &Settings,
        result: &ValidationResult,
        mut out: &mut dyn Write,
    ) -> std::io::Result<()> {
        let options = ReportOptions {
            group: settings.group,
            suggestions: settings.suggestions,
            context_lines: settings.context_lines,
        };

        match settings.format {
            OutputFormat::Human => {
                let mut formatter = HumanFormatter::new(self.use_color, options);
                if options.context_lines > 0 {
                    for (path, text) in read_sources(result) {
                        formatter.add_source(path, text);
                    }
                }
                formatter.format(result, &mut out)
            }
            OutputFormat::Json => JsonFormatter::new(options).format(result, &mut out),
            OutputFormat::Sarif => SarifFormatter::default().format(result, &mut out),
        }
    }
}

impl Command for ValidateCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let loaded = load_rules(&self.args.rules)?;
        info!(
            "Loaded {} section rule(s) from {}",
            loaded.rules.sections.len(),
            self.args.rules.display()
        );

        let settings = self.resolve_settings(&loaded.settings);
        let root_policy = if settings.strict_root {
            RootPolicy::Strict
        } else {
            RootPolicy::FirstWins
        };

        let validator =
            Validator::new(&loaded.rules).with_options(ValidationOptions { root_policy });
        let parser = TreeFileParser::new();
        let result = BatchValidator::new(&parser, &validator)
            .parallel(self.args.parallel)
            .validate(&self.args.documents)?;

        self.render(&settings, &result, out)?;
        out.flush()?;

        if result.has_failures(settings.fail_level) {
            debug!("Failing at {} or above", settings.fail_level);
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}

/// Read the files messages point into, skipping unreadable ones.
fn read_sources(result: &ValidationResult) -> Vec<(PathBuf, String)> {
    let files: BTreeSet<&Path> = result
        .messages()
        .iter()
        .map(|m| m.location().file.as_path())
        .collect();

    files
        .into_iter()
        .filter_map(|path| match fs::read_to_string(path) {
            Ok(text) => Some((path.to_path_buf(), text)),
            Err(e) => {
                debug!("No source excerpt for {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}
