use regex::Regex;
use std::sync::LazyLock;

/// The allow-list a metric name must match before it is used as a table name.
pub const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(IDENTIFIER_PATTERN).expect("invalid regex"));

/// Tables the pipeline itself owns: the base tables and the metric registry.
///
/// A metric named after one of these would replace it.
pub const RESERVED_TABLE_NAMES: [&str; 4] = ["customers", "orders", "order_items", "metric_registry"];

/// Returns `true` if `name` can be interpolated into SQL as a bare identifier.
#[must_use]
pub fn is_safe_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// Returns `true` if `name` refers to one of [`RESERVED_TABLE_NAMES`].
///
/// The engine resolves identifiers without regard to case, so neither does this.
#[must_use]
pub fn is_reserved_table_name(name: &str) -> bool {
    RESERVED_TABLE_NAMES.iter().any(|reserved| reserved.eq_ignore_ascii_case(name))
}
