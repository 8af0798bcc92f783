use super::Database;
use super::database::LOG_TARGET;
use super::registry::{self, RegistryEntry};
use crate::definitions::{MetricDefinition, is_reserved_table_name, is_safe_identifier};
use crate::error::PipelineError;

/// Materializes one metric as a table named after it and records it in the registry.
///
/// The metric name is checked against the identifier allow-list and the reserved table
/// names here, right before it is interpolated, whether or not the definition was
/// validated earlier. The name is quoted, so keywords such as `order` work as metric
/// names. The SQL body is trusted input belonging to the definition author and is used
/// verbatim.
///
/// The registry is only touched once the table exists, so a failing query never leaves a
/// registry row behind.
///
/// # Errors
///
/// Returns [`PipelineError::UnsafeIdentifier`] for a name that is not a plain identifier,
/// [`PipelineError::ReservedTableName`] for the name of a base table or the registry,
/// [`PipelineError::QueryExecution`] if the engine rejects the SQL body, and
/// [`PipelineError::Database`] if the registry cannot be updated.
pub fn run_metric(db: &Database, definition: &MetricDefinition) -> Result<(), PipelineError> {
    let name = &definition.metric_name;
    if !is_safe_identifier(name) {
        return Err(PipelineError::UnsafeIdentifier { name: name.clone() });
    }

    if is_reserved_table_name(name) {
        return Err(PipelineError::ReservedTableName { name: name.clone() });
    }

    // a safe identifier never contains '"'
    let statement = format!("CREATE OR REPLACE TABLE \"{name}\" AS {}", definition.sql);
    let _ = db.execute(&statement, &[]).map_err(|e| PipelineError::QueryExecution {
        metric: name.clone(),
        message: e.to_string(),
    })?;

    registry::ensure_registry(db)?;
    registry::upsert(db, &RegistryEntry::from(definition))?;

    log::info!(target: LOG_TARGET, "Materialized metric '{name}'");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn definition(name: &str, sql: &str) -> MetricDefinition {
        MetricDefinition {
            metric_name: name.to_string(),
            description: "test metric".to_string(),
            owner: "tests".to_string(),
            schedule: "hourly".to_string(),
            sql: sql.to_string(),
        }
    }

    #[test]
    fn test_materializes_table_and_registry_row() {
        let db = Database::open_in_memory().unwrap();
        run_metric(&db, &definition("five_numbers", "SELECT * FROM range(5)")).unwrap();

        assert_eq!(db.row_count("five_numbers").unwrap(), 5);
        let entries = registry::entries(&db).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].metric_name, "five_numbers");
        assert_eq!(entries[0].schedule, "hourly");
    }

    #[test]
    fn test_rerun_replaces_table() {
        let db = Database::open_in_memory().unwrap();
        run_metric(&db, &definition("numbers", "SELECT * FROM range(5)")).unwrap();
        run_metric(&db, &definition("numbers", "SELECT * FROM range(2)")).unwrap();

        assert_eq!(db.row_count("numbers").unwrap(), 2);
        assert_eq!(registry::entries(&db).unwrap().len(), 1);
    }

    #[test]
    fn test_unsafe_name_touches_nothing() {
        let db = Database::open_in_memory().unwrap();
        let err = run_metric(&db, &definition("x AS SELECT 1; DROP TABLE y; --", "SELECT 1")).unwrap_err();

        assert!(matches!(err, PipelineError::UnsafeIdentifier { .. }), "{err:?}");
        assert!(!db.table_exists(registry::REGISTRY_TABLE).unwrap());
    }

    #[test]
    fn test_reserved_names_touch_nothing() {
        let db = Database::open_in_memory().unwrap();
        run_metric(&db, &definition("first", "SELECT 1 AS one")).unwrap();

        for name in ["metric_registry", "customers", "Orders", "order_items"] {
            let err = run_metric(&db, &definition(name, "SELECT 1 AS v")).unwrap_err();
            assert!(matches!(err, PipelineError::ReservedTableName { .. }), "{name}: {err:?}");
        }

        assert!(!db.table_exists("customers").unwrap());
        let names: Vec<_> = registry::entries(&db).unwrap().into_iter().map(|e| e.metric_name).collect();
        assert_eq!(names, ["first"]);
    }

    #[test]
    fn test_keyword_names_are_quoted() {
        let db = Database::open_in_memory().unwrap();
        run_metric(&db, &definition("order", "SELECT 1 AS one")).unwrap();
        run_metric(&db, &definition("select", "SELECT * FROM range(3)")).unwrap();

        assert_eq!(db.row_count("order").unwrap(), 1);
        assert_eq!(db.row_count("select").unwrap(), 3);
        assert_eq!(registry::entries(&db).unwrap().len(), 2);
    }

    #[test]
    fn test_case_variant_replaces_table_and_registry_row() {
        let db = Database::open_in_memory().unwrap();
        run_metric(&db, &definition("Revenue", "SELECT 1 AS v")).unwrap();
        run_metric(&db, &definition("revenue", "SELECT 2 AS v")).unwrap();

        let v: i64 = db
            .connection()
            .query_row("SELECT v FROM revenue", [], |row| row.get(0))
            .unwrap();
        assert_eq!(v, 2);

        let names: Vec<_> = registry::entries(&db).unwrap().into_iter().map(|e| e.metric_name).collect();
        assert_eq!(names, ["revenue"]);
    }

    #[test]
    fn test_leading_digit_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let err = run_metric(&db, &definition("7day_revenue", "SELECT 1")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsafeIdentifier { .. }), "{err:?}");
        assert!(!db.table_exists("7day_revenue").unwrap());
    }

    #[test]
    fn test_query_failure_leaves_no_registry_row() {
        let db = Database::open_in_memory().unwrap();
        run_metric(&db, &definition("first", "SELECT 1 AS one")).unwrap();

        let err = run_metric(&db, &definition("broken", "SELECT * FROM table_that_does_not_exist")).unwrap_err();
        match err {
            PipelineError::QueryExecution { metric, message } => {
                assert_eq!(metric, "broken");
                assert!(message.contains("table_that_does_not_exist"), "{message}");
            }
            other => panic!("expected QueryExecution, got {other:?}"),
        }

        assert!(!db.table_exists("broken").unwrap());
        let names: Vec<_> = registry::entries(&db).unwrap().into_iter().map(|e| e.metric_name).collect();
        assert_eq!(names, ["first"]);
    }

    #[test]
    fn test_later_metric_reads_earlier_table() {
        let db = Database::open_in_memory().unwrap();
        run_metric(&db, &definition("base_numbers", "SELECT * FROM range(10) t(n)")).unwrap();
        run_metric(&db, &definition("even_numbers", "SELECT n FROM base_numbers WHERE n % 2 = 0")).unwrap();

        assert_eq!(db.row_count("even_numbers").unwrap(), 5);
    }
}
