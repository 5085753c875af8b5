use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use super::schema_registry::SchemaRegistry;
use crate::schema::{ColumnCategory, TableSchema};

/// Per-table line of a [`SchemaSummary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub column_count: usize,
    pub has_name_fields: bool,
    pub has_id_fields: bool,
    pub categories: BTreeSet<ColumnCategory>,
}

impl From<&TableSchema> for TableSummary {
    fn from(schema: &TableSchema) -> Self {
        Self {
            column_count: schema.columns.len(),
            has_name_fields: !schema.name_fields.is_empty(),
            has_id_fields: schema
                .column_categories
                .values()
                .any(|c| *c == ColumnCategory::Id),
            categories: schema.column_categories.values().copied().collect(),
        }
    }
}

/// Patterns shared across cached tables
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommonPatterns {
    /// Column names present in more than one table
    pub common_column_names: BTreeSet<String>,
    /// Every category seen in any table
    pub common_categories: BTreeSet<ColumnCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaSummary {
    pub total_tables: usize,
    pub tables: BTreeMap<String, TableSummary>,
    pub common_patterns: CommonPatterns,
}

impl SchemaSummary {
    pub fn from_registry(registry: &SchemaRegistry) -> Self {
        let mut tables = BTreeMap::new();
        let mut column_counts: HashMap<&str, usize> = HashMap::new();
        let mut patterns = CommonPatterns::default();

        for (key, schema) in registry.schemas() {
            tables.insert(key.to_string(), TableSummary::from(schema));

            for column in &schema.columns {
                *column_counts.entry(column.as_str()).or_default() += 1;
            }
            patterns
                .common_categories
                .extend(schema.column_categories.values().copied());
        }

        patterns.common_column_names = column_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(column, _)| column.to_string())
            .collect();

        Self {
            total_tables: tables.len(),
            tables,
            common_patterns: patterns,
        }
    }
}

/// Human-readable view of one cached table
#[derive(Debug, Clone, Copy)]
pub struct TableDescription<'a> {
    pub key: &'a str,
    pub schema: &'a TableSchema,
}

impl fmt::Display for TableDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = &self.schema.columns;
        writeln!(f, "Table: {}", self.key)?;
        writeln!(f, "Columns ({}): {}", columns.len(), columns.join(", "))?;

        let name_fields: BTreeMap<String, &str> = self
            .schema
            .name_fields
            .iter()
            .map(|(role, column)| (role.to_string(), column.as_str()))
            .collect();
        writeln!(f, "Name fields: {}", join_pairs(&name_fields))?;

        let mappings: BTreeMap<String, &str> = self
            .schema
            .mappings
            .iter()
            .map(|(field, column)| (field.clone(), column.as_str()))
            .collect();
        write!(f, "Mappings: {}", join_pairs(&mappings))
    }
}

fn join_pairs(pairs: &BTreeMap<String, &str>) -> String {
    if pairs.is_empty() {
        return "(none)".to_string();
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDescriptor, TableIdentifier};
    use crate::source::{MetadataSource, MetadataTable, QueryDialect, QueryError};
    use std::rc::Rc;

    struct NoSource;

    impl MetadataSource for NoSource {
        fn dialect(&self) -> QueryDialect {
            QueryDialect::Sqlite
        }

        fn execute(&self, _statement: &str, _label: &str) -> Result<MetadataTable, QueryError> {
            Err(QueryError::Unavailable("offline".to_string()))
        }
    }

    fn schema(columns: &[&str]) -> TableSchema {
        TableSchema::from_columns(
            columns
                .iter()
                .map(|c| ColumnDescriptor::new(*c, "TEXT"))
                .collect(),
        )
    }

    #[test]
    fn test_empty_registry() {
        let registry = SchemaRegistry::new(Rc::new(NoSource));
        let summary = registry.summarize();
        assert_eq!(summary.total_tables, 0);
        assert!(summary.tables.is_empty());
        assert_eq!(summary.common_patterns, CommonPatterns::default());
    }

    #[test]
    fn test_summary_across_tables() {
        let mut registry = SchemaRegistry::new(Rc::new(NoSource));
        registry.register(
            &TableIdentifier::new("p", "d", "customers"),
            schema(&["customer_id", "first_name", "last_name", "status"]),
        );
        registry.register(
            &TableIdentifier::new("p", "d", "accounts"),
            schema(&["account_id", "customer_id", "balance", "status"]),
        );
        registry.register(
            &TableIdentifier::new("p", "d", "notes"),
            schema(&["body"]),
        );

        let summary = registry.summarize();
        assert_eq!(summary.total_tables, 3);

        let customers = &summary.tables["p.d.customers"];
        assert_eq!(customers.column_count, 4);
        assert!(customers.has_name_fields);
        assert!(customers.has_id_fields);

        let accounts = &summary.tables["p.d.accounts"];
        assert!(!accounts.has_name_fields);
        assert!(accounts.categories.contains(&ColumnCategory::Numeric));

        let notes = &summary.tables["p.d.notes"];
        assert!(!notes.has_id_fields);
        assert_eq!(
            notes.categories.iter().copied().collect::<Vec<_>>(),
            vec![ColumnCategory::Other]
        );

        let common: Vec<_> = summary
            .common_patterns
            .common_column_names
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(common, vec!["customer_id", "status"]);
        assert_eq!(
            summary.common_patterns.common_categories,
            [
                ColumnCategory::Id,
                ColumnCategory::Name,
                ColumnCategory::Numeric,
                ColumnCategory::Other
            ]
            .into_iter()
            .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_table_description() {
        let schema = schema(&["customer_id", "first_name", "last_name"]);
        let text = TableDescription {
            key: "p.d.customers",
            schema: &schema,
        }
        .to_string();

        assert!(text.starts_with("Table: p.d.customers\n"));
        assert!(text.contains("Columns (3): customer_id, first_name, last_name"));
        assert!(text.contains("Name fields: first_name=first_name, last_name=last_name"));
        assert!(text.contains("customer_id=customer_id"));
    }

    #[test]
    fn test_table_description_of_fallback() {
        let schema = TableSchema::fallback();
        let text = TableDescription {
            key: "p.d.gone",
            schema: &schema,
        }
        .to_string();
        assert!(text.contains("Columns (1): *"));
        assert!(text.ends_with("Mappings: (none)"));
    }
}
