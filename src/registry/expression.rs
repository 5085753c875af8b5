//! Full-name expression synthesis
//!
//! Resolvers are tried in order and the first one that produces an
//! expression wins. When none does, [`UNKNOWN_NAME`] is returned.

use tracing::debug;

use super::schema_registry::SchemaRegistry;
use crate::schema::NameRole;

/// SQL string literal used when a table has no usable name column
pub const UNKNOWN_NAME: &str = "\"Unknown Name\"";

/// Column names probed as a last resort, in order
pub const COMMON_NAME_COLUMNS: &[&str] = &[
    "full_name",
    "name",
    "employee_name",
    "customer_name",
    "first_name",
    "fname",
];

/// A named step of the full-name fallback chain
pub type NameResolver = fn(&NameContext<'_>) -> Option<String>;

pub const NAME_RESOLVERS: &[(&str, NameResolver)] = &[
    ("first_last_concat", concat_first_last),
    ("full_name_field", full_name_field),
    ("name_like_column", name_like_column),
    ("common_name_guess", common_name_guess),
];

/// What the resolvers can see of one (possibly unresolved) table
pub struct NameContext<'a> {
    registry: &'a SchemaRegistry,
    key: Option<&'a str>,
}

impl<'a> NameContext<'a> {
    pub fn new(registry: &'a SchemaRegistry, key: Option<&'a str>) -> Self {
        Self { registry, key }
    }

    fn name_field(&self, role: NameRole) -> Option<&'a str> {
        let key = self.key?;
        self.registry
            .schema(key)
            .and_then(|schema| schema.name_fields.get(&role))
            .map(String::as_str)
    }

    fn columns(&self) -> &'a [String] {
        match self.key {
            Some(key) => self.registry.get_table_columns(key),
            None => &[],
        }
    }

    fn has_column(&self, column: &str) -> bool {
        self.key
            .map(|key| self.registry.has_column(key, column))
            .unwrap_or(false)
    }

    /// Name-role column, provided the table still reports it
    fn present_name_field(&self, role: NameRole) -> Option<&'a str> {
        self.name_field(role).filter(|col| self.has_column(col))
    }
}

fn concat_first_last(ctx: &NameContext<'_>) -> Option<String> {
    let first = ctx.present_name_field(NameRole::FirstName)?;
    let last = ctx.present_name_field(NameRole::LastName)?;
    Some(format!("CONCAT({}, \" \", {})", first, last))
}

fn full_name_field(ctx: &NameContext<'_>) -> Option<String> {
    ctx.present_name_field(NameRole::FullName).map(str::to_string)
}

fn name_like_column(ctx: &NameContext<'_>) -> Option<String> {
    ctx.columns()
        .iter()
        .find(|col| col.to_lowercase().contains("name"))
        .cloned()
}

fn common_name_guess(ctx: &NameContext<'_>) -> Option<String> {
    COMMON_NAME_COLUMNS
        .iter()
        .find(|col| ctx.has_column(col))
        .map(|col| col.to_string())
}

/// First resolver that produces an expression, with its name
fn first_resolution(ctx: &NameContext<'_>) -> Option<(&'static str, String)> {
    NAME_RESOLVERS
        .iter()
        .find_map(|(name, resolve)| resolve(ctx).map(|expr| (*name, expr)))
}

/// Run the resolver chain
pub fn resolve_full_name(ctx: &NameContext<'_>) -> String {
    match first_resolution(ctx) {
        Some((resolver, expr)) => {
            debug!(table = ?ctx.key, resolver, expression = %expr, "Resolved full name");
            expr
        }
        None => {
            debug!(table = ?ctx.key, "No name column, using placeholder");
            UNKNOWN_NAME.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDescriptor, TableIdentifier, TableSchema};
    use crate::source::{MetadataSource, MetadataTable, QueryDialect, QueryError};
    use std::rc::Rc;

    struct NoSource;

    impl MetadataSource for NoSource {
        fn dialect(&self) -> QueryDialect {
            QueryDialect::InformationSchema
        }

        fn execute(&self, _statement: &str, _label: &str) -> Result<MetadataTable, QueryError> {
            Err(QueryError::Unavailable("offline".to_string()))
        }
    }

    fn registry_with(columns: &[&str]) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new(Rc::new(NoSource));
        let id = TableIdentifier::new("proj", "ds", "t");
        let schema = TableSchema::from_columns(
            columns
                .iter()
                .map(|c| ColumnDescriptor::new(*c, "STRING"))
                .collect(),
        );
        registry.register(&id, schema);
        registry
    }

    fn expression_for(columns: &[&str]) -> String {
        registry_with(columns).full_name_expression("t")
    }

    fn resolver_for(columns: &[&str]) -> Option<&'static str> {
        let registry = registry_with(columns);
        let ctx = NameContext::new(&registry, registry.lookup("t"));
        first_resolution(&ctx).map(|(name, _)| name)
    }

    #[test]
    fn test_first_and_last_concat() {
        assert_eq!(
            expression_for(&["first_name", "last_name"]),
            "CONCAT(first_name, \" \", last_name)"
        );
    }

    #[test]
    fn test_concat_wins_over_full_name() {
        assert_eq!(
            expression_for(&["full_name", "fname", "lname"]),
            "CONCAT(fname, \" \", lname)"
        );
    }

    #[test]
    fn test_full_name_field() {
        assert_eq!(expression_for(&["customer_name"]), "customer_name");
        assert_eq!(expression_for(&["id", "first_name", "full_name"]), "full_name");
    }

    #[test]
    fn test_name_category_fallback() {
        // No explicit role, so the first Name-category column is used
        assert_eq!(expression_for(&["id", "job_title"]), "job_title");
    }

    #[test]
    fn test_name_like_column() {
        // Only a first name: no concat, no full name role
        assert_eq!(expression_for(&["id", "first_name"]), "first_name");
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(expression_for(&["id", "amount"]), UNKNOWN_NAME);
    }

    #[test]
    fn test_fallback_schema_guesses_first_common_name() {
        let mut registry = SchemaRegistry::new(Rc::new(NoSource));
        registry.register(&TableIdentifier::new("p", "d", "wild"), TableSchema::fallback());
        assert_eq!(registry.full_name_expression("wild"), "full_name");
    }

    #[test]
    fn test_unresolved_table() {
        let registry = SchemaRegistry::new(Rc::new(NoSource));
        let ctx = NameContext::new(&registry, None);
        assert_eq!(resolve_full_name(&ctx), UNKNOWN_NAME);
    }

    #[test]
    fn test_resolver_names_are_unique() {
        let mut names: Vec<_> = NAME_RESOLVERS.iter().map(|(n, _)| *n).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), NAME_RESOLVERS.len());
    }

    #[test]
    fn test_winning_resolver_is_reported() {
        assert_eq!(
            resolver_for(&["first_name", "last_name"]),
            Some("first_last_concat")
        );
        assert_eq!(resolver_for(&["customer_name"]), Some("full_name_field"));
        assert_eq!(resolver_for(&["id", "first_name"]), Some("name_like_column"));
        assert_eq!(resolver_for(&["id", "amount"]), None);
    }
}
