//! Metric definition discovery, parsing, and validation
//!
//! A metric definition is a YAML document with five required keys: `metric_name`,
//! `description`, `owner`, `schedule`, and `sql`. Definitions live as `*.yaml` files in a
//! single directory and are always processed in file-name order.
//!
//! # Implementation Model
//!
//! Two consumers read definitions, with different tolerance for problems:
//!
//! - The batch validator ([`validate_file`]) reports every problem in every document and
//!   never stops early. It is a diagnostic tool.
//! - The execution pipeline ([`load_all`] followed by [`MetricDefinition::from_document`])
//!   stops at the first malformed document or missing field.
//!
//! The metric name doubles as a table name, so it must match [`IDENTIFIER_PATTERN`]. The
//! execution engine re-checks this with [`is_safe_identifier`] immediately before building
//! any SQL, independent of whether validation ran. Names that collide with the pipeline's
//! own tables ([`RESERVED_TABLE_NAMES`]) are rejected the same way.

mod identifier;
mod loader;
mod metric_definition;
mod validator;

pub use identifier::{IDENTIFIER_PATTERN, RESERVED_TABLE_NAMES, is_reserved_table_name, is_safe_identifier};
pub use loader::{DefinitionDocument, discover, load_all, parse};
pub use metric_definition::{MetricDefinition, REQUIRED_FIELDS};
pub use validator::{ValidationReport, validate, validate_file};
