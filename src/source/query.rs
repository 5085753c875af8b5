use crate::schema::{category_case_sql, TableIdentifier};

/// SQL flavour used to render the discovery statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDialect {
    /// Warehouse-style `<catalog>.<dataset>.INFORMATION_SCHEMA.COLUMNS` view
    InformationSchema,
    /// SQLite `pragma_table_info`; the dataset is the attached schema name
    Sqlite,
}

/// Quote a value for use inside a single-quoted SQL string literal
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render the column discovery statement for `table` in `dialect`.
///
/// Every dialect returns the same five columns: `column_name`, `data_type`,
/// `is_nullable` (`YES`/`NO`), `column_default` and `column_category`,
/// ordered by ordinal position.
pub fn discovery_query(dialect: QueryDialect, table: &TableIdentifier) -> String {
    match dialect {
        QueryDialect::InformationSchema => format!(
            "SELECT\n\
             column_name,\n\
             data_type,\n\
             is_nullable,\n\
             column_default,\n\
             {} AS column_category\n\
             FROM `{}.{}.INFORMATION_SCHEMA.COLUMNS`\n\
             WHERE table_name = {}\n\
             ORDER BY ordinal_position",
            category_case_sql("column_name"),
            table.catalog,
            table.dataset,
            literal(&table.table),
        ),
        QueryDialect::Sqlite => format!(
            "SELECT\n\
             name AS column_name,\n\
             type AS data_type,\n\
             CASE WHEN \"notnull\" = 0 THEN 'YES' ELSE 'NO' END AS is_nullable,\n\
             dflt_value AS column_default,\n\
             {} AS column_category\n\
             FROM pragma_table_info({}, {})\n\
             ORDER BY cid",
            category_case_sql("name"),
            literal(&table.table),
            literal(&table.dataset),
        ),
    }
}
