use super::identifier::{IDENTIFIER_PATTERN, is_reserved_table_name, is_safe_identifier};
use super::loader::parse;
use super::metric_definition::{REQUIRED_FIELDS, scalar_text};
use crate::error::PipelineError;
use camino::Utf8Path;
use serde_yaml::Value;

/// Query forms a metric body may start with.
const READ_ONLY_PREFIXES: [&str; 2] = ["select", "with"];

/// The outcome of validating one definition document.
///
/// Every rule is checked independently, so `errors` lists every problem in the document
/// rather than the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    fn single(error: String) -> Self {
        Self { errors: vec![error] }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Validates a parsed definition document.
#[must_use]
pub fn validate(document: &Value) -> ValidationReport {
    if !document.is_mapping() {
        return ValidationReport::single("YAML root must be a mapping/object".to_string());
    }

    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if document.get(field).is_none() {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    if let Some(value) = document.get("metric_name") {
        let name = scalar_text(value).unwrap_or_default();
        if name.trim().is_empty() {
            errors.push("metric_name cannot be empty".to_string());
        } else if !is_safe_identifier(&name) {
            errors.push(format!("metric_name '{name}' must match {IDENTIFIER_PATTERN}"));
        } else if is_reserved_table_name(&name) {
            errors.push(format!("metric_name '{name}' is reserved for a pipeline table"));
        }
    }

    if let Some(value) = document.get("sql") {
        let sql = scalar_text(value).unwrap_or_default();
        let sql = sql.trim();
        if sql.is_empty() {
            errors.push("sql cannot be empty".to_string());
        }

        let lowered = sql.to_lowercase();
        if !READ_ONLY_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
            errors.push("sql should start with SELECT or WITH".to_string());
        }
    }

    ValidationReport { errors }
}

/// Parses and validates the document at `path`.
///
/// Parse failures are reported as a validation error instead of aborting, so a batch of
/// documents can be checked in one pass.
#[must_use]
pub fn validate_file(path: &Utf8Path) -> ValidationReport {
    let document = match parse(path) {
        Ok(document) => document,
        Err(PipelineError::Parse { path, message }) => {
            return ValidationReport::single(format!("YAML parse error in {path}: {message}"));
        }
        Err(e) => return ValidationReport::single(e.to_string()),
    };

    if !document.is_mapping() {
        return ValidationReport::single(format!("YAML root must be a mapping/object in {path}"));
    }

    validate(&document)
}
