use crate::error::PipelineError;
use serde_yaml::Value;

/// The fields every metric definition document must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 5] = ["metric_name", "description", "owner", "schedule", "sql"];

/// A metric definition that passed the execution pre-flight check.
///
/// Values are kept exactly as written in the document. `schedule` is opaque: it is stored
/// in the registry and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDefinition {
    pub metric_name: String,
    pub description: String,
    pub owner: String,
    pub schedule: String,
    pub sql: String,
}

impl MetricDefinition {
    /// Builds a definition from a parsed document, requiring every field to be present and
    /// non-blank.
    ///
    /// `file` names the source document in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingField`] for the first required field that is absent,
    /// null, or blank, and [`PipelineError::InvalidDefinition`] if the root is not a mapping.
    pub fn from_document(file: &str, document: &Value) -> Result<Self, PipelineError> {
        if !document.is_mapping() {
            return Err(PipelineError::InvalidDefinition {
                file: file.to_string(),
                errors: vec!["YAML root must be a mapping/object".to_string()],
            });
        }

        let field = |name: &'static str| {
            document
                .get(name)
                .and_then(scalar_text)
                .filter(|text| !text.trim().is_empty())
                .ok_or_else(|| PipelineError::MissingField {
                    file: file.to_string(),
                    field: name,
                })
        };

        Ok(Self {
            metric_name: field("metric_name")?,
            description: field("description")?,
            owner: field("owner")?,
            schedule: field("schedule")?,
            sql: field("sql")?,
        })
    }
}

/// Renders a scalar YAML value as text.
///
/// Numbers and booleans are stringified the way they appear in the document; null and
/// collections have no scalar text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_complete_document() {
        let document = doc(
            r"
metric_name: total_revenue
description: Sum of all order totals
owner: finance
schedule: daily
sql: SELECT SUM(amount) AS revenue FROM orders
",
        );

        let definition = MetricDefinition::from_document("total_revenue.yaml", &document).unwrap();
        assert_eq!(definition.metric_name, "total_revenue");
        assert_eq!(definition.description, "Sum of all order totals");
        assert_eq!(definition.owner, "finance");
        assert_eq!(definition.schedule, "daily");
        assert_eq!(definition.sql, "SELECT SUM(amount) AS revenue FROM orders");
    }

    #[test]
    fn test_reports_first_missing_field() {
        let document = doc(
            r"
metric_name: total_revenue
description: Sum of all order totals
sql: SELECT 1
",
        );

        let err = MetricDefinition::from_document("total_revenue.yaml", &document).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField { field: "owner", .. }), "{err:?}");
        assert_eq!(err.to_string(), "total_revenue.yaml is missing required field: owner");
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let document = doc(
            r#"
metric_name: total_revenue
description: "   "
owner: finance
schedule: daily
sql: SELECT 1
"#,
        );

        let err = MetricDefinition::from_document("x.yaml", &document).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField { field: "description", .. }), "{err:?}");
    }

    #[test]
    fn test_null_field_counts_as_missing() {
        let document = doc(
            r"
metric_name: total_revenue
description: revenue
owner: finance
schedule:
sql: SELECT 1
",
        );

        let err = MetricDefinition::from_document("x.yaml", &document).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField { field: "schedule", .. }), "{err:?}");
    }

    #[test]
    fn test_numeric_scalars_are_stringified() {
        let document = doc(
            r"
metric_name: total_revenue
description: revenue
owner: 42
schedule: true
sql: SELECT 1
",
        );

        let definition = MetricDefinition::from_document("x.yaml", &document).unwrap();
        assert_eq!(definition.owner, "42");
        assert_eq!(definition.schedule, "true");
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let document = doc("- just\n- a\n- list\n");
        let err = MetricDefinition::from_document("list.yaml", &document).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDefinition { .. }), "{err:?}");
    }
}
