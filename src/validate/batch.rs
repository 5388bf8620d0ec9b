//! Validation of many documents.
//!
//! Each document gets its own metadata session, so workers share nothing
//! but the rule set. Results keep the order of the input paths.

use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, warn};

use super::engine::Validator;
use super::message::{ErrorKind, Suggestion, ValidationMessage};
use super::result::{ValidationResult, ValidationResultBuilder};
use super::rule::Severity;
use crate::document::{DocumentParser, ParseFailure, SourceLocation};
use crate::error::{DocruleError, Result};

/// Messages produced for one input path.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub messages: Vec<ValidationMessage>,
}

/// Parses and validates a list of documents.
pub struct BatchValidator<'a, P: DocumentParser> {
    parser: &'a P,
    validator: &'a Validator<'a>,
    parallel: bool,
}

impl<'a, P: DocumentParser> BatchValidator<'a, P> {
    pub fn new(parser: &'a P, validator: &'a Validator<'a>) -> Self {
        Self {
            parser,
            validator,
            parallel: false,
        }
    }

    /// Validate on scoped worker threads.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate every path and collect a sorted result. The reported
    /// duration covers parsing and validation.
    pub fn validate(&self, paths: &[PathBuf]) -> Result<ValidationResult> {
        let mut builder = ValidationResultBuilder::new();
        let outcomes = self.run(paths)?;

        for outcome in outcomes {
            builder.add_file(&outcome.path).add_messages(outcome.messages);
        }
        Ok(builder.finish(&self.validator.sorter()))
    }

    /// Per-file messages, unsorted, in input order.
    pub fn run(&self, paths: &[PathBuf]) -> Result<Vec<FileOutcome>> {
        let workers = if self.parallel {
            thread::available_parallelism()
                .map_or(1, |n| n.get())
                .min(paths.len())
        } else {
            1
        };

        if workers <= 1 {
            return Ok(paths.iter().map(|p| self.validate_file(p)).collect());
        }

        debug!("Validating {} documents on {} workers", paths.len(), workers);
        let chunk_size = paths.len().div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = paths
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|p| self.validate_file(p))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut outcomes = Vec::with_capacity(paths.len());
            for handle in handles {
                let chunk = handle.join().map_err(|_| {
                    DocruleError::Other(anyhow::anyhow!("validation worker panicked"))
                })?;
                outcomes.extend(chunk);
            }
            Ok(outcomes)
        })
    }

    fn validate_file(&self, path: &Path) -> FileOutcome {
        let messages = match self.parser.parse(path) {
            Ok(document) => self.validator.validate(&document),
            Err(failure) => {
                warn!("Skipping {}: {}", path.display(), failure.message());
                vec![failure_message(&failure)]
            }
        };
        FileOutcome {
            path: path.to_path_buf(),
            messages,
        }
    }
}

/// The single message reported for a file that could not be parsed.
pub fn failure_message(failure: &ParseFailure) -> ValidationMessage {
    let (text, kind) = match failure {
        ParseFailure::Io { .. } => ("Document could not be read", ErrorKind::Io),
        ParseFailure::Parse { .. } => ("Document could not be parsed", ErrorKind::Parse),
    };
    ValidationMessage::new(
        failure.rule_id(),
        Severity::Error,
        text,
        SourceLocation::line(failure.path(), 1),
    )
    .with_kind(kind)
    .with_cause(failure.message())
    .with_suggestion(Suggestion::new("Check that the file exists and holds a document tree"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttributeConfig, MetadataRules, RuleSet};
    use crate::document::{Attribute, Document};
    use std::time::Duration;

    /// Parser that builds documents from the file name alone.
    struct FakeParser;

    impl DocumentParser for FakeParser {
        fn parse(&self, path: &Path) -> std::result::Result<Document, ParseFailure> {
            let name = path.to_string_lossy();
            if name.starts_with("missing") {
                return Err(ParseFailure::Io {
                    path: path.to_path_buf(),
                    message: "No such file".into(),
                });
            }
            if name.starts_with("broken") {
                return Err(ParseFailure::Parse {
                    path: path.to_path_buf(),
                    message: "expected mapping".into(),
                });
            }
            let mut document = Document::new(path);
            if name.starts_with("titled") {
                document.attributes = vec![Attribute::new("title", "Title", 1)];
            }
            Ok(document)
        }
    }

    fn rules() -> RuleSet {
        RuleSet::new(
            MetadataRules::new(vec![AttributeConfig::new("title").unwrap().required()]).unwrap(),
            vec![],
        )
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn failures_become_single_messages() {
        let rules = rules();
        let validator = Validator::new(&rules);
        let batch = BatchValidator::new(&FakeParser, &validator);

        let outcomes = batch
            .run(&paths(&["missing.json", "broken.json", "titled.json"]))
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].messages[0].rule_id().as_str(), "io-error");
        assert_eq!(outcomes[0].messages[0].cause(), Some("No such file"));
        assert_eq!(outcomes[1].messages[0].rule_id().as_str(), "parse-error");
        assert_eq!(outcomes[1].messages[0].severity(), Severity::Error);
        assert!(outcomes[2].messages.is_empty());
    }

    #[test]
    fn parallel_keeps_input_order() {
        let rules = rules();
        let validator = Validator::new(&rules);
        let names: Vec<String> = (0..24)
            .map(|i| if i % 3 == 0 { format!("titled-{i}.json") } else { format!("plain-{i}.json") })
            .collect();
        let input: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();

        let serial = BatchValidator::new(&FakeParser, &validator).run(&input).unwrap();
        let parallel = BatchValidator::new(&FakeParser, &validator)
            .parallel(true)
            .run(&input)
            .unwrap();

        let order: Vec<&PathBuf> = parallel.iter().map(|o| &o.path).collect();
        assert_eq!(order, input.iter().collect::<Vec<_>>());
        for (a, b) in serial.iter().zip(&parallel) {
            assert_eq!(a.messages, b.messages);
        }
    }

    #[test]
    fn validate_builds_sorted_result() {
        let rules = rules();
        let validator = Validator::new(&rules);
        let result = BatchValidator::new(&FakeParser, &validator)
            .validate(&paths(&["plain-b.json", "plain-a.json"]))
            .unwrap();

        assert_eq!(result.files().len(), 2);
        let files: Vec<String> = result
            .messages()
            .iter()
            .map(|m| m.location().file.display().to_string())
            .collect();
        assert_eq!(files, ["plain-a.json", "plain-b.json"]);
        assert_eq!(result.counts().errors, 2);
    }

    /// Parser that takes a while per file.
    struct SlowParser(Duration);

    impl DocumentParser for SlowParser {
        fn parse(&self, path: &Path) -> std::result::Result<Document, ParseFailure> {
            thread::sleep(self.0);
            Ok(Document::new(path))
        }
    }

    #[test]
    fn duration_covers_validation() {
        let rules = rules();
        let validator = Validator::new(&rules);
        let parser = SlowParser(Duration::from_millis(50));

        let result = BatchValidator::new(&parser, &validator)
            .validate(&paths(&["a.json", "b.json"]))
            .unwrap();

        assert!(result.duration() >= Duration::from_millis(100));
    }

    #[test]
    fn empty_input() {
        let rules = rules();
        let validator = Validator::new(&rules);
        let outcomes = BatchValidator::new(&FakeParser, &validator)
            .parallel(true)
            .run(&[])
            .unwrap();
        assert!(outcomes.is_empty());
    }
}
