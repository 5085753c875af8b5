//! Metadata query boundary
//!
//! A [`MetadataSource`] executes a discovery statement and returns one
//! [`MetadataRow`] per column in catalog order. The registry only ever talks
//! to a source through this trait.

pub mod failover;
pub mod query;
pub mod sqlite;

pub use failover::FailoverSource;
pub use query::{discovery_query, QueryDialect};
pub use sqlite::SqliteSource;

use thiserror::Error;

use crate::schema::{ColumnCategory, ColumnDescriptor};

/// Errors raised while running a metadata query
#[derive(Error, Debug)]
pub enum QueryError {
    /// The SQLite backend rejected or failed the statement
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The source cannot run queries at all
    #[error("Metadata source unavailable: {0}")]
    Unavailable(String),

    /// A returned row is missing a required field
    #[error("Malformed metadata row: {0}")]
    Malformed(String),

    /// Both primary and secondary sources failed
    #[error("Primary source failed ({primary}); secondary source failed ({secondary})")]
    Exhausted {
        primary: Box<QueryError>,
        secondary: Box<QueryError>,
    },
}

/// One column of a discovery result
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRow {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub column_default: Option<String>,
    pub column_category: ColumnCategory,
}

impl From<MetadataRow> for ColumnDescriptor {
    fn from(row: MetadataRow) -> Self {
        ColumnDescriptor {
            name: row.column_name,
            data_type: row.data_type,
            nullable: row.is_nullable,
            default: row.column_default,
            category: row.column_category,
        }
    }
}

/// Tabular result of a discovery statement, ordered by ordinal position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTable {
    pub rows: Vec<MetadataRow>,
}

impl MetadataTable {
    pub fn new(rows: Vec<MetadataRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.column_name.as_str()).collect()
    }

    pub fn into_descriptors(self) -> Vec<ColumnDescriptor> {
        self.rows.into_iter().map(ColumnDescriptor::from).collect()
    }
}

/// Executes discovery statements against some catalog
pub trait MetadataSource {
    /// SQL flavour the statement must be rendered in
    fn dialect(&self) -> QueryDialect;

    /// Run `statement`. `label` names the query for logging only.
    fn execute(&self, statement: &str, label: &str) -> Result<MetadataTable, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_into_descriptor() {
        let row = MetadataRow {
            column_name: "hire_date".to_string(),
            data_type: "DATE".to_string(),
            is_nullable: false,
            column_default: Some("CURRENT_DATE".to_string()),
            column_category: ColumnCategory::Date,
        };
        let table = MetadataTable::new(vec![row]);
        assert_eq!(table.column_names(), vec!["hire_date"]);

        let descriptors = table.into_descriptors();
        assert_eq!(descriptors[0].name, "hire_date");
        assert!(!descriptors[0].nullable);
        assert_eq!(descriptors[0].default.as_deref(), Some("CURRENT_DATE"));
        assert_eq!(descriptors[0].category, ColumnCategory::Date);
    }

    #[test]
    fn test_exhausted_error_message() {
        let err = QueryError::Exhausted {
            primary: Box::new(QueryError::Unavailable("no session".to_string())),
            secondary: Box::new(QueryError::Malformed("column_name".to_string())),
        };
        let msg = err.to_string();
        assert!(msg.contains("no session"));
        assert!(msg.contains("column_name"));
    }
}
