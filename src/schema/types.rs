use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::derive::{derive_mappings, detect_name_fields};

/// Column name used by the fallback schema
pub const WILDCARD: &str = "*";

/// Fully-qualified table identifier `(catalog, dataset, table)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableIdentifier {
    pub catalog: String,
    pub dataset: String,
    pub table: String,
}

impl TableIdentifier {
    pub fn new(
        catalog: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            dataset: dataset.into(),
            table: table.into(),
        }
    }

    /// Canonical `<catalog>.<dataset>.<table>` form, used as the cache key
    pub fn key(&self) -> String {
        format!("{}.{}.{}", self.catalog, self.dataset, self.table)
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.dataset, self.table)
    }
}

/// Semantic category inferred for a column from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnCategory {
    Id,
    Name,
    Email,
    Date,
    Numeric,
    Address,
    Phone,
    Other,
}

impl ColumnCategory {
    pub const ALL: [ColumnCategory; 8] = [
        ColumnCategory::Id,
        ColumnCategory::Name,
        ColumnCategory::Email,
        ColumnCategory::Date,
        ColumnCategory::Numeric,
        ColumnCategory::Address,
        ColumnCategory::Phone,
        ColumnCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnCategory::Id => "id",
            ColumnCategory::Name => "name",
            ColumnCategory::Email => "email",
            ColumnCategory::Date => "date",
            ColumnCategory::Numeric => "numeric",
            ColumnCategory::Address => "address",
            ColumnCategory::Phone => "phone",
            ColumnCategory::Other => "other",
        }
    }

    /// Decode a category label reported by a metadata source.
    /// Unrecognised labels decode to `Other`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(ColumnCategory::Other)
    }
}

impl fmt::Display for ColumnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical column as reported by the metadata source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub category: ColumnCategory,
}

impl ColumnDescriptor {
    /// Create a nullable column, classifying it by name
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let name = name.into();
        let category = ColumnCategory::classify(&name);
        Self {
            name,
            data_type: data_type.into(),
            nullable: true,
            default: None,
            category,
        }
    }

    pub fn required(self) -> Self {
        Self {
            nullable: false,
            ..self
        }
    }
}

/// Logical role a column can play when building a person's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameRole {
    FirstName,
    LastName,
    FullName,
}

impl fmt::Display for NameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameRole::FirstName => write!(f, "first_name"),
            NameRole::LastName => write!(f, "last_name"),
            NameRole::FullName => write!(f, "full_name"),
        }
    }
}

/// Discovered (or degraded) schema for one table.
///
/// A fallback schema has `columns == ["*"]` and every other field empty.
/// Every value in `name_fields` and `mappings` is an element of `columns`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TableSchema {
    pub columns: Vec<String>,
    pub column_types: HashMap<String, String>,
    pub column_categories: HashMap<String, ColumnCategory>,
    pub name_fields: HashMap<NameRole, String>,
    pub mappings: HashMap<String, String>,
}

impl TableSchema {
    /// The degraded wildcard schema returned when discovery fails
    pub fn fallback() -> Self {
        Self {
            columns: vec![WILDCARD.to_string()],
            ..Self::default()
        }
    }

    /// Build a schema from columns in catalog order.
    /// An empty column list yields the fallback schema.
    pub fn from_columns(descriptors: Vec<ColumnDescriptor>) -> Self {
        if descriptors.is_empty() {
            return Self::fallback();
        }

        let mut columns = Vec::with_capacity(descriptors.len());
        let mut column_types = HashMap::with_capacity(descriptors.len());
        let mut column_categories = HashMap::with_capacity(descriptors.len());

        for col in descriptors {
            column_types.insert(col.name.clone(), col.data_type);
            column_categories.insert(col.name.clone(), col.category);
            columns.push(col.name);
        }

        let name_fields = detect_name_fields(&columns, &column_categories);
        let mappings = derive_mappings(&column_categories);

        Self {
            columns,
            column_types,
            column_categories,
            name_fields,
            mappings,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.columns.len() == 1 && self.columns[0] == WILDCARD
    }

    /// Case-insensitive column membership. A fallback schema accepts any name.
    pub fn has_column(&self, column: &str) -> bool {
        if self.is_fallback() {
            return true;
        }
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(column))
    }

    pub fn name_field(&self, role: NameRole) -> Option<&str> {
        self.name_fields.get(&role).map(String::as_str)
    }
}
