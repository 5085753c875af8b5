use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::analysis::{analyze_derivation_logic, DerivationAnalysis};
use super::expression::{resolve_full_name, NameContext};
use super::scenario::{scenario_tables, Scenario};
use super::summary::{SchemaSummary, TableDescription};
use crate::schema::{NameRole, TableIdentifier, TableSchema};
use crate::source::{discovery_query, MetadataSource, QueryError};

/// Dataset used for scenario discovery when neither the registry nor the
/// scenarios name one
pub const SAMPLE_DATASET: &str = "banking_sample_data";

/// Label attached to discovery queries
const DISCOVERY_LABEL: &str = "schema_discovery";

/// Why a table's schema could not be discovered
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("metadata query failed: {0}")]
    Query(#[from] QueryError),

    #[error("metadata query returned no columns")]
    EmptyResult,
}

/// Cache of discovered table schemas, keyed by `<catalog>.<dataset>.<table>`.
///
/// Entries are never evicted; only [`SchemaRegistry::clear`] or building a
/// new registry empties the cache. Not synchronised: callers sharing a
/// registry across threads must serialise access themselves.
pub struct SchemaRegistry {
    source: Rc<dyn MetadataSource>,
    catalog: Option<String>,
    dataset: Option<String>,
    sample_dataset: String,
    table_schemas: HashMap<String, Rc<TableSchema>>,
}

impl SchemaRegistry {
    pub fn new(source: Rc<dyn MetadataSource>) -> Self {
        Self {
            source,
            catalog: None,
            dataset: None,
            sample_dataset: SAMPLE_DATASET.to_string(),
            table_schemas: HashMap::new(),
        }
    }

    /// Registry with default catalog/dataset used for implicit discovery
    pub fn with_defaults(
        source: Rc<dyn MetadataSource>,
        catalog: Option<String>,
        dataset: Option<String>,
    ) -> Self {
        Self {
            catalog,
            dataset,
            ..Self::new(source)
        }
    }

    /// Dataset used by scenario discovery when nothing else names one
    pub fn set_sample_dataset(&mut self, sample_dataset: impl Into<String>) {
        self.sample_dataset = sample_dataset.into();
    }

    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    /// Number of cached tables
    pub fn len(&self) -> usize {
        self.table_schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table_schemas.is_empty()
    }

    pub fn cache_keys(&self) -> impl Iterator<Item = &str> {
        self.table_schemas.keys().map(String::as_str)
    }

    /// Drop every cached schema
    pub fn clear(&mut self) {
        self.table_schemas.clear();
    }

    pub(crate) fn schemas(&self) -> impl Iterator<Item = (&str, &TableSchema)> {
        self.table_schemas
            .iter()
            .map(|(key, schema)| (key.as_str(), schema.as_ref()))
    }

    /// Cached schema for a canonical key
    pub fn schema(&self, key: &str) -> Option<&Rc<TableSchema>> {
        self.table_schemas.get(key)
    }

    /// Insert or replace a schema explicitly
    pub fn register(&mut self, table: &TableIdentifier, schema: TableSchema) -> Rc<TableSchema> {
        let schema = Rc::new(schema);
        self.table_schemas.insert(table.key(), Rc::clone(&schema));
        schema
    }

    /// Discover a table's schema, or explain why it could not be.
    ///
    /// A cached schema is returned without querying. A successful discovery
    /// is cached forever; a failure is never cached.
    pub fn try_discover(
        &mut self,
        table: &TableIdentifier,
    ) -> Result<Rc<TableSchema>, DiscoveryError> {
        let key = table.key();
        if let Some(schema) = self.table_schemas.get(&key) {
            debug!(table = %key, "Schema cache hit");
            return Ok(Rc::clone(schema));
        }

        let statement = discovery_query(self.source.dialect(), table);
        let result = self.source.execute(&statement, DISCOVERY_LABEL)?;
        if result.is_empty() {
            return Err(DiscoveryError::EmptyResult);
        }

        let schema = Rc::new(TableSchema::from_columns(result.into_descriptors()));
        info!(
            table = %key,
            columns = schema.columns.len(),
            "Discovered schema"
        );
        self.table_schemas.insert(key, Rc::clone(&schema));
        Ok(schema)
    }

    /// Discover a table's schema, degrading to the wildcard fallback schema
    /// when discovery fails. Never fails.
    pub fn discover(&mut self, catalog: &str, dataset: &str, table: &str) -> Rc<TableSchema> {
        let id = TableIdentifier::new(catalog, dataset, table);
        match self.try_discover(&id) {
            Ok(schema) => schema,
            Err(err) => {
                warn!(table = %id, error = %err, "Could not discover schema, using wildcard fallback");
                Rc::new(TableSchema::fallback())
            }
        }
    }

    /// Cache key whose table part is `table`.
    ///
    /// When the same table name is cached under several catalog/dataset
    /// pairs, which key is returned is unspecified.
    pub fn lookup(&self, table: &str) -> Option<&str> {
        let suffix = format!(".{}", table);
        self.table_schemas
            .keys()
            .find(|key| key.ends_with(&suffix))
            .map(String::as_str)
    }

    /// Columns of a cached table, empty when not cached
    pub fn get_table_columns(&self, key: &str) -> &[String] {
        self.table_schemas
            .get(key)
            .map(|s| s.columns.as_slice())
            .unwrap_or(&[])
    }

    /// Logical mappings of a cached table, empty when not cached
    pub fn get_column_mapping(&self, key: &str) -> HashMap<String, String> {
        self.table_schemas
            .get(key)
            .map(|s| s.mappings.clone())
            .unwrap_or_default()
    }

    /// Name roles of a cached table, empty when not cached
    pub fn get_name_fields(&self, key: &str) -> HashMap<NameRole, String> {
        self.table_schemas
            .get(key)
            .map(|s| s.name_fields.clone())
            .unwrap_or_default()
    }

    /// Physical column for a logical field. Unknown tables and unmapped
    /// fields return `field` unchanged; nothing is discovered implicitly.
    pub fn map_column(&self, table: &str, field: &str) -> String {
        self.lookup(table)
            .and_then(|key| self.table_schemas.get(key))
            .and_then(|schema| schema.mappings.get(field))
            .cloned()
            .unwrap_or_else(|| field.to_string())
    }

    /// Whether the cached table `key` has `column` (case-insensitive).
    /// Uncached tables have no columns; fallback schemas have every column.
    pub fn has_column(&self, key: &str, column: &str) -> bool {
        self.table_schemas
            .get(key)
            .map(|schema| schema.has_column(column))
            .unwrap_or(false)
    }

    /// SQL expression yielding a person's full name from `table`.
    ///
    /// An uncached table is discovered first when the registry has a default
    /// catalog and dataset.
    pub fn full_name_expression(&mut self, table: &str) -> String {
        if self.lookup(table).is_none() {
            if let (Some(catalog), Some(dataset)) = (self.catalog.clone(), self.dataset.clone()) {
                self.discover(&catalog, &dataset, table);
            }
        }

        let key = self.lookup(table);
        let ctx = NameContext::new(self, key);
        resolve_full_name(&ctx)
    }

    /// Lexical analysis of a derivation expression against `table`'s columns
    pub fn analyze_derivation_logic(&self, logic: &str, table: &str) -> DerivationAnalysis {
        let columns = self
            .lookup(table)
            .map(|key| self.get_table_columns(key))
            .unwrap_or(&[]);
        analyze_derivation_logic(logic, columns)
    }

    /// Discover every table named by the scenarios, keyed by table name.
    ///
    /// Uses the registry's catalog/dataset when set, otherwise the first
    /// scenario's `source_dataset_id`, otherwise [`SAMPLE_DATASET`].
    pub fn discover_all_from_scenarios(
        &mut self,
        scenarios: &[Scenario],
    ) -> HashMap<String, Rc<TableSchema>> {
        let scenario_dataset = scenarios
            .first()
            .and_then(|s| s.source_dataset_id.clone())
            .unwrap_or_else(|| self.sample_dataset.clone());
        let catalog = self
            .catalog
            .clone()
            .unwrap_or_else(|| scenario_dataset.clone());
        let dataset = self.dataset.clone().unwrap_or(scenario_dataset);

        scenario_tables(scenarios)
            .into_iter()
            .map(|table| {
                let schema = self.discover(&catalog, &dataset, &table);
                (table, schema)
            })
            .collect()
    }

    /// Description of the cached table named `table`, if any
    pub fn describe(&self, table: &str) -> Option<TableDescription<'_>> {
        let key = self.lookup(table)?;
        let schema = self.table_schemas.get(key)?;
        Some(TableDescription { key, schema })
    }

    /// Registry-wide report of cached tables and shared patterns
    pub fn summarize(&self) -> SchemaSummary {
        SchemaSummary::from_registry(self)
    }
}
