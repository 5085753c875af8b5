//! JSON configuration file
//!
//! ```json
//! {
//!   "catalog": "acme-prod",
//!   "dataset": "banking",
//!   "sample_dataset": "banking_sample_data",
//!   "tables": [
//!     {
//!       "table": "customers",
//!       "columns": ["customer_id", "first_name", "last_name", "address"],
//!       "mappings": { "email": "address" },
//!       "name_fields": { "full_name": "last_name" }
//!     }
//!   ]
//! }
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::registry::{SchemaRegistry, SAMPLE_DATASET};
use crate::schema::{ColumnDescriptor, NameRole, TableIdentifier, TableSchema};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Table {0} needs a catalog and dataset, in the entry or as defaults")]
    Unqualified(String),
}

/// A table whose columns are known up front instead of discovered
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub catalog: Option<String>,
    pub dataset: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    /// Logical field -> column overrides applied after derivation
    pub mappings: HashMap<String, String>,
    /// Name role -> column overrides applied after derivation
    pub name_fields: HashMap<NameRole, String>,
}

impl TableConfig {
    /// Classify the configured columns and apply the explicit mappings and
    /// name roles. Overrides naming a column the table does not have are
    /// skipped.
    pub fn to_schema(&self) -> TableSchema {
        let descriptors = self
            .columns
            .iter()
            .map(|c| ColumnDescriptor::new(c.as_str(), ""))
            .collect();
        let mut schema = TableSchema::from_columns(descriptors);
        if schema.is_fallback() {
            return schema;
        }

        for (field, column) in &self.mappings {
            if let Some(actual) = self.existing_column(&schema, field, column) {
                schema.mappings.insert(field.clone(), actual);
            }
        }
        for (role, column) in &self.name_fields {
            if let Some(actual) = self.existing_column(&schema, &role.to_string(), column) {
                schema.name_fields.insert(*role, actual);
            }
        }

        schema
    }

    /// The table's spelling of `column`, or `None` (with a warning) when
    /// the table has no such column
    fn existing_column(&self, schema: &TableSchema, field: &str, column: &str) -> Option<String> {
        let actual = schema
            .columns
            .iter()
            .find(|c| c.eq_ignore_ascii_case(column))
            .cloned();
        if actual.is_none() {
            warn!(
                table = %self.table,
                field = %field,
                column = %column,
                "Ignoring override naming a column the table does not have"
            );
        }
        actual
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub catalog: Option<String>,
    pub dataset: Option<String>,
    pub sample_dataset: String,
    pub tables: Vec<TableConfig>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            dataset: None,
            sample_dataset: SAMPLE_DATASET.to_string(),
            tables: Vec::new(),
        }
    }
}

impl DiscoveryConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `config.json` in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "column-discovery")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load `explicit` if given, else the default file if it exists, else
    /// the built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Seed the registry with every configured table. Entries without their
    /// own catalog/dataset use the registry's defaults.
    pub fn seed(&self, registry: &mut SchemaRegistry) -> Result<usize, ConfigError> {
        for table in &self.tables {
            let catalog = table
                .catalog
                .as_deref()
                .or(registry.catalog())
                .ok_or_else(|| ConfigError::Unqualified(table.table.clone()))?
                .to_string();
            let dataset = table
                .dataset
                .as_deref()
                .or(registry.dataset())
                .ok_or_else(|| ConfigError::Unqualified(table.table.clone()))?
                .to_string();

            let id = TableIdentifier::new(catalog, dataset, table.table.as_str());
            registry.register(&id, table.to_schema());
        }
        Ok(self.tables.len())
    }
}
