use crate::definitions::is_safe_identifier;
use crate::error::PipelineError;
use camino::Utf8Path;
use core::fmt;
use duckdb::{Connection, ToSql};

/// Log target for engine statements
pub(super) const LOG_TARGET: &str = "  engine";

/// Display name used for databases that live only in memory.
const IN_MEMORY: &str = ":memory:";

/// An open connection to the metrics database.
///
/// Every component that touches the engine borrows this handle; the connection closes
/// when the handle is dropped.
pub struct Database {
    conn: Connection,
    location: String,
}

impl Database {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Database`] if the engine cannot open the file.
    pub fn open(path: &Utf8Path) -> Result<Self, PipelineError> {
        let conn = Connection::open(path).map_err(|e| PipelineError::database(format!("opening '{path}'"), e))?;
        log::debug!(target: LOG_TARGET, "Opened database at '{path}'");

        Ok(Self {
            conn,
            location: path.to_string(),
        })
    }

    /// Opens a private database that disappears when the handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Database`] if the engine cannot be started.
    pub fn open_in_memory() -> Result<Self, PipelineError> {
        let conn = Connection::open_in_memory().map_err(|e| PipelineError::database("opening an in-memory database", e))?;

        Ok(Self {
            conn,
            location: IN_MEMORY.to_string(),
        })
    }

    /// Where the database lives: a file path, or `:memory:`.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Executes a single statement with positional parameters bound to `?` placeholders.
    pub(crate) fn execute(&self, statement: &str, params: &[&dyn ToSql]) -> duckdb::Result<usize> {
        log::debug!(target: LOG_TARGET, "Executing: {}", statement.trim());
        self.conn.execute(statement, params)
    }

    pub(crate) const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns `true` if a table called `name` exists in the main schema.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Database`] if the catalog cannot be queried.
    pub fn table_exists(&self, name: &str) -> Result<bool, PipelineError> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'main' AND table_name = ?",
                duckdb::params![name],
                |row| row.get(0),
            )
            .map_err(|e| PipelineError::database(format!("looking up table '{name}'"), e))?;

        Ok(count > 0)
    }

    /// Counts the rows of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsafeIdentifier`] if `table` is not a plain identifier, or
    /// [`PipelineError::Database`] if the table cannot be read.
    pub fn row_count(&self, table: &str) -> Result<u64, PipelineError> {
        if !is_safe_identifier(table) {
            return Err(PipelineError::UnsafeIdentifier { name: table.to_string() });
        }

        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| row.get(0))
            .map_err(|e| PipelineError::database(format!("counting rows of '{table}'"), e))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").field("location", &self.location).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_in_memory_location() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.location(), ":memory:");
        assert!(format!("{db:?}").contains("Database"));
    }

    #[test]
    fn test_table_exists_and_row_count() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.table_exists("numbers").unwrap());

        let _ = db.execute("CREATE TABLE numbers AS SELECT * FROM range(5) t(n)", &[]).unwrap();
        assert!(db.table_exists("numbers").unwrap());
        assert_eq!(db.row_count("numbers").unwrap(), 5);
    }

    #[test]
    fn test_row_count_rejects_unsafe_names() {
        let db = Database::open_in_memory().unwrap();
        let err = db.row_count("numbers; DROP TABLE x").unwrap_err();
        assert!(matches!(err, PipelineError::UnsafeIdentifier { .. }), "{err:?}");
    }

    #[test]
    fn test_row_count_missing_table() {
        let db = Database::open_in_memory().unwrap();
        let err = db.row_count("missing").unwrap_err();
        assert!(matches!(err, PipelineError::Database { .. }), "{err:?}");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_file_database_persists_between_handles() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("metrics.duckdb")).unwrap();

        {
            let db = Database::open(&path).unwrap();
            assert_eq!(db.location(), path.as_str());
            let _ = db.execute("CREATE TABLE kept AS SELECT 1 AS one", &[]).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert!(db.table_exists("kept").unwrap());
    }
}
