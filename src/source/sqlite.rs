use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

use super::{MetadataRow, MetadataSource, MetadataTable, QueryDialect, QueryError};
use crate::schema::ColumnCategory;

/// Metadata source backed by a SQLite database
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open an existing database file read-only
    pub fn open(db_path: &Path) -> Result<Self, QueryError> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, QueryError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Underlying connection, e.g. for creating tables
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl MetadataSource for SqliteSource {
    fn dialect(&self) -> QueryDialect {
        QueryDialect::Sqlite
    }

    fn execute(&self, statement: &str, label: &str) -> Result<MetadataTable, QueryError> {
        debug!(label, "Running metadata query against SQLite");

        let mut stmt = self.conn.prepare(statement)?;
        let rows = stmt.query_map([], |row| {
            let is_nullable: String = row.get("is_nullable")?;
            let category: String = row.get("column_category")?;
            Ok(MetadataRow {
                column_name: row.get("column_name")?,
                data_type: row.get("data_type")?,
                is_nullable: is_nullable.eq_ignore_ascii_case("YES"),
                column_default: row.get("column_default")?,
                column_category: ColumnCategory::from_label(&category),
            })
        })?;

        let rows = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(MetadataTable::new(rows))
    }
}
