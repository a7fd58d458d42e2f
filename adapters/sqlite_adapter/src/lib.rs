use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use sentiment_core::domain::{RawDataset, RawRecord};
use sentiment_core::error::{EtlError, Result};
use sentiment_core::ports::{SourceRepository, EXTRACT_QUERY};
use std::path::PathBuf;
use tracing::debug;

/// SQLite implementation of the SourceRepository trait
pub struct SqliteSourceRepository {
    db_path: PathBuf,
}

impl SqliteSourceRepository {
    /// Creates a new SqliteSourceRepository with the given database path
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Renders a column value as text, NULL as absent
    fn value_to_text(value: ValueRef<'_>) -> Option<String> {
        match value {
            ValueRef::Null => None,
            ValueRef::Integer(i) => Some(i.to_string()),
            ValueRef::Real(f) => Some(f.to_string()),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Some(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }

    fn read_row(row: &Row, column_count: usize) -> rusqlite::Result<RawRecord> {
        let values = (0..column_count)
            .map(|i| row.get_ref(i).map(Self::value_to_text))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(RawRecord::new(values))
    }
}

impl SourceRepository for SqliteSourceRepository {
    fn fetch_all(&self) -> Result<RawDataset> {
        // Read-only so a wrong path fails instead of creating an empty database
        let conn = Connection::open_with_flags(&self.db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| {
                EtlError::connection(format!("cannot open {}: {}", self.db_path.display(), e))
            })?;

        let mut stmt = conn
            .prepare(EXTRACT_QUERY)
            .map_err(|e| EtlError::query(e.to_string()))?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let column_count = columns.len();
        debug!(?columns, "sqlite source columns");

        let rows = stmt
            .query_map([], |row| Self::read_row(row, column_count))
            .and_then(|mapped| mapped.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| EtlError::query(e.to_string()))?;

        Ok(RawDataset::new(columns, rows))
    }
}
