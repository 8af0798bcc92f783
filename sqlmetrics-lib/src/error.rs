//! Error taxonomy for the metrics pipeline.

use camino::Utf8PathBuf;

/// Failures raised while loading, gating, or executing metric definitions.
///
/// The execution pipeline is fail-fast: the first of these aborts the run. The batch
/// validator never produces them for individual documents; it folds parse failures into
/// its per-file error list instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A definition document is not well-formed YAML, or could not be read.
    #[error("YAML parse error in {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    /// A required field is absent or blank.
    #[error("{file} is missing required field: {field}")]
    MissingField { file: String, field: &'static str },

    /// A definition has every field but fails the full validation rules.
    #[error("{file} failed validation: {}", errors.join("; "))]
    InvalidDefinition { file: String, errors: Vec<String> },

    /// A metric name cannot be used as a table identifier.
    #[error(
        "invalid metric_name '{name}': use letters, numbers, and underscores only, starting with a letter or underscore"
    )]
    UnsafeIdentifier { name: String },

    /// A metric name refers to a table the pipeline itself owns.
    #[error("invalid metric_name '{name}': the name is reserved for a pipeline table")]
    ReservedTableName { name: String },

    /// The engine rejected the SQL body of a metric.
    #[error("metric '{metric}' failed to execute: {message}")]
    QueryExecution { metric: String, message: String },

    /// A base table source file is missing or cannot be read by the engine.
    #[error("unable to load base table '{table}' from '{path}': {message}")]
    SourceUnavailable {
        table: &'static str,
        path: Utf8PathBuf,
        message: String,
    },

    /// The definitions directory contains no documents.
    #[error("No metric YAML files found in {dir}")]
    NoDefinitionsFound { dir: Utf8PathBuf },

    /// The database could not be opened, or a bookkeeping statement failed.
    #[error("database error while {context}: {source}")]
    Database {
        context: String,
        #[source]
        source: duckdb::Error,
    },
}

impl PipelineError {
    pub(crate) fn database(context: impl Into<String>, source: duckdb::Error) -> Self {
        Self::Database {
            context: context.into(),
            source,
        }
    }
}
