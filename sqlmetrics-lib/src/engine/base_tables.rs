use super::Database;
use super::database::LOG_TARGET;
use crate::error::PipelineError;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// The source relations every metric may query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum BaseTable {
    Customers,
    Orders,
    OrderItems,
}

impl BaseTable {
    #[must_use]
    pub fn table_name(self) -> &'static str {
        self.into()
    }

    /// The delimited file this table is loaded from.
    #[must_use]
    pub fn source_path(self, data_dir: &Utf8Path) -> Utf8PathBuf {
        data_dir.join(format!("{}.csv", self.table_name()))
    }
}

/// Drops and reloads every base table from `data_dir`.
///
/// All sources are checked before any table is touched, so a missing file leaves the
/// previous base tables in place.
///
/// # Errors
///
/// Returns [`PipelineError::SourceUnavailable`] if a source is missing, unreadable, or
/// rejected by the engine's reader.
pub fn load_base_tables(db: &Database, data_dir: &Utf8Path) -> Result<(), PipelineError> {
    let sources: Vec<_> = BaseTable::iter().map(|table| (table, table.source_path(data_dir))).collect();

    for (table, path) in &sources {
        check_source(*table, path)?;
    }

    for (table, path) in &sources {
        // the file path is bound as a parameter, only the fixed table name is interpolated
        let statement = format!("CREATE OR REPLACE TABLE {table} AS SELECT * FROM read_csv_auto(?)");
        let _ = db
            .execute(&statement, duckdb::params![path.as_str()])
            .map_err(|e| PipelineError::SourceUnavailable {
                table: table.table_name(),
                path: path.clone(),
                message: e.to_string(),
            })?;

        log::info!(target: LOG_TARGET, "Loaded base table '{table}' from '{path}'");
    }

    Ok(())
}

fn check_source(table: BaseTable, path: &Utf8Path) -> Result<(), PipelineError> {
    let unavailable = |message: String| PipelineError::SourceUnavailable {
        table: table.table_name(),
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| unavailable(e.to_string()))?;
    let metadata = file.metadata().map_err(|e| unavailable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unavailable("not a regular file".to_string()));
    }

    Ok(())
}
