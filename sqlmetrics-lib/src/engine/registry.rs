use super::Database;
use crate::definitions::MetricDefinition;
use crate::error::PipelineError;

/// Name of the table holding one metadata row per metric.
pub const REGISTRY_TABLE: &str = "metric_registry";

const CREATE_REGISTRY: &str = "
    CREATE TABLE IF NOT EXISTS metric_registry (
        metric_name TEXT PRIMARY KEY,
        description TEXT,
        owner TEXT,
        schedule TEXT
    )";

const DELETE_CASE_VARIANTS: &str = "DELETE FROM metric_registry WHERE lower(metric_name) = lower(?) AND metric_name <> ?";

const UPSERT_ENTRY: &str = "INSERT OR REPLACE INTO metric_registry VALUES (?, ?, ?, ?)";

const SELECT_ENTRIES: &str = "SELECT metric_name, description, owner, schedule FROM metric_registry ORDER BY metric_name";

/// One row of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub metric_name: String,
    pub description: String,
    pub owner: String,
    pub schedule: String,
}

impl From<&MetricDefinition> for RegistryEntry {
    fn from(definition: &MetricDefinition) -> Self {
        Self {
            metric_name: definition.metric_name.clone(),
            description: definition.description.clone(),
            owner: definition.owner.clone(),
            schedule: definition.schedule.clone(),
        }
    }
}

/// Creates the registry table unless it already exists.
///
/// # Errors
///
/// Returns [`PipelineError::Database`] if the table cannot be created.
pub fn ensure_registry(db: &Database) -> Result<(), PipelineError> {
    let _ = db
        .execute(CREATE_REGISTRY, &[])
        .map_err(|e| PipelineError::database("creating the metric registry", e))?;
    Ok(())
}

/// Inserts the entry, replacing any existing row with the same metric name.
///
/// Table names are matched without regard to case, so `Revenue` and `revenue` name the
/// same metric table. Rows that differ from the entry's name only in case are removed
/// first, leaving one row per table.
///
/// # Errors
///
/// Returns [`PipelineError::Database`] if the row cannot be written.
pub fn upsert(db: &Database, entry: &RegistryEntry) -> Result<(), PipelineError> {
    let _ = db
        .execute(DELETE_CASE_VARIANTS, duckdb::params![entry.metric_name, entry.metric_name])
        .map_err(|e| PipelineError::database(format!("replacing '{}' in the metric registry", entry.metric_name), e))?;

    let _ = db
        .execute(
            UPSERT_ENTRY,
            duckdb::params![entry.metric_name, entry.description, entry.owner, entry.schedule],
        )
        .map_err(|e| PipelineError::database(format!("recording '{}' in the metric registry", entry.metric_name), e))?;
    Ok(())
}

/// Reads every registry row, ordered by metric name.
///
/// A database that has never run a metric has no registry and yields no entries.
///
/// # Errors
///
/// Returns [`PipelineError::Database`] if the registry cannot be read.
pub fn entries(db: &Database) -> Result<Vec<RegistryEntry>, PipelineError> {
    if !db.table_exists(REGISTRY_TABLE)? {
        return Ok(Vec::new());
    }

    let read_error = |e| PipelineError::database("reading the metric registry", e);

    let mut stmt = db.connection().prepare(SELECT_ENTRIES).map_err(read_error)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RegistryEntry {
                metric_name: row.get(0)?,
                description: row.get(1)?,
                owner: row.get(2)?,
                schedule: row.get(3)?,
            })
        })
        .map_err(read_error)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(read_error)
}
