//! Name-field detection and logical mapping derivation

use std::collections::HashMap;

use super::types::{ColumnCategory, NameRole};

/// Exact column names that are taken as a complete person name
const FULL_NAME_COLUMNS: &[&str] = &["name", "employee_name", "customer_name"];

/// Name role a single column fills, checked first-name, last-name, full-name
fn name_role(column: &str) -> Option<NameRole> {
    let lowered = column.to_lowercase();

    if lowered.contains("first_name") || lowered.contains("fname") {
        Some(NameRole::FirstName)
    } else if lowered.contains("last_name") || lowered.contains("lname") {
        Some(NameRole::LastName)
    } else if lowered.contains("full_name") || FULL_NAME_COLUMNS.contains(&lowered.as_str()) {
        Some(NameRole::FullName)
    } else {
        None
    }
}

/// Scan columns in catalog order for first/last/full name columns.
///
/// A later column filling the same role replaces an earlier one. When no
/// role is filled at all, the first `Name`-category column becomes the
/// full name.
pub fn detect_name_fields(
    columns: &[String],
    categories: &HashMap<String, ColumnCategory>,
) -> HashMap<NameRole, String> {
    let mut fields = HashMap::new();

    for column in columns {
        if let Some(role) = name_role(column) {
            fields.insert(role, column.clone());
        }
    }

    if fields.is_empty() {
        let first_name_like = columns
            .iter()
            .find(|c| categories.get(c.as_str()) == Some(&ColumnCategory::Name));
        if let Some(column) = first_name_like {
            fields.insert(NameRole::FullName, column.clone());
        }
    }

    fields
}

/// Derive logical field -> physical column mappings from categories.
///
/// Iteration over `categories` is unordered and each write overwrites the
/// previous one, so when several columns qualify for the same logical field
/// the winner is unspecified. Callers must not rely on which one it is.
pub fn derive_mappings(categories: &HashMap<String, ColumnCategory>) -> HashMap<String, String> {
    let mut mappings = HashMap::new();

    for (column, category) in categories {
        let lowered = column.to_lowercase();
        let mut set = |field: &str| {
            mappings.insert(field.to_string(), column.clone());
        };

        match category {
            ColumnCategory::Id => {
                set("id");
                if lowered.contains("customer") {
                    set("customer_id");
                } else if lowered.contains("employee") {
                    set("employee_id");
                } else if lowered.contains("project") {
                    set("project_id");
                }
            }
            ColumnCategory::Name => {
                set("name");
                set("full_name");
                if lowered.contains("first") {
                    set("first_name");
                } else if lowered.contains("last") {
                    set("last_name");
                }
            }
            ColumnCategory::Email => set("email"),
            ColumnCategory::Date => {
                set("date");
                if lowered.contains("transaction") {
                    set("transaction_date");
                } else if lowered.contains("hire") {
                    set("hire_date");
                }
            }
            ColumnCategory::Numeric => {
                if lowered.contains("amount") {
                    set("amount");
                } else if lowered.contains("balance") {
                    set("balance");
                } else if lowered.contains("salary") {
                    set("salary");
                }
            }
            ColumnCategory::Address | ColumnCategory::Phone | ColumnCategory::Other => {}
        }
    }

    mappings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(names: &[&str]) -> (Vec<String>, HashMap<String, ColumnCategory>) {
        let columns: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let categories = columns
            .iter()
            .map(|c| (c.clone(), ColumnCategory::classify(c)))
            .collect();
        (columns, categories)
    }

    #[test]
    fn test_detect_first_and_last() {
        let (columns, categories) = classified(&["emp_id", "first_name", "last_name", "email"]);
        let fields = detect_name_fields(&columns, &categories);
        assert_eq!(fields[&NameRole::FirstName], "first_name");
        assert_eq!(fields[&NameRole::LastName], "last_name");
        assert!(!fields.contains_key(&NameRole::FullName));
    }

    #[test]
    fn test_detect_short_forms_and_exact_full_name() {
        let (columns, categories) = classified(&["FName", "LName", "Customer_Name"]);
        let fields = detect_name_fields(&columns, &categories);
        assert_eq!(fields[&NameRole::FirstName], "FName");
        assert_eq!(fields[&NameRole::LastName], "LName");
        assert_eq!(fields[&NameRole::FullName], "Customer_Name");
    }

    #[test]
    fn test_column_fills_only_first_matching_role() {
        // Matches both the first-name and full-name rules
        let (columns, categories) = classified(&["first_name_full_name"]);
        let fields = detect_name_fields(&columns, &categories);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[&NameRole::FirstName], "first_name_full_name");
    }

    #[test]
    fn test_fallback_to_first_name_category_column() {
        let (columns, categories) = classified(&["id", "product_title", "brand_name"]);
        let fields = detect_name_fields(&columns, &categories);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[&NameRole::FullName], "product_title");
    }

    #[test]
    fn test_no_name_columns() {
        let (columns, categories) = classified(&["id", "amount"]);
        assert!(detect_name_fields(&columns, &categories).is_empty());
    }

    #[test]
    fn test_mappings_per_category() {
        let (_, categories) = classified(&[
            "customer_id",
            "first_name",
            "email",
            "transaction_date",
            "amount",
            "home_address",
            "phone",
            "status",
        ]);
        let mappings = derive_mappings(&categories);

        assert_eq!(mappings["id"], "customer_id");
        assert_eq!(mappings["customer_id"], "customer_id");
        assert_eq!(mappings["name"], "first_name");
        assert_eq!(mappings["full_name"], "first_name");
        assert_eq!(mappings["first_name"], "first_name");
        assert_eq!(mappings["email"], "email");
        assert_eq!(mappings["date"], "transaction_date");
        assert_eq!(mappings["transaction_date"], "transaction_date");
        assert_eq!(mappings["amount"], "amount");
        assert!(!mappings.contains_key("numeric"));
        assert!(!mappings.contains_key("employee_id"));
        assert_eq!(mappings.len(), 9);
    }

    #[test]
    fn test_numeric_sub_patterns() {
        let (_, categories) = classified(&["current_balance"]);
        let mappings = derive_mappings(&categories);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings["balance"], "current_balance");

        let (_, categories) = classified(&["base_salary"]);
        assert_eq!(derive_mappings(&categories)["salary"], "base_salary");
    }

    #[test]
    fn test_hire_date_and_project_id() {
        let (_, categories) = classified(&["hire_date", "project_key"]);
        let mappings = derive_mappings(&categories);
        assert_eq!(mappings["hire_date"], "hire_date");
        assert_eq!(mappings["project_id"], "project_key");
        assert_eq!(mappings["id"], "project_key");
    }

    #[test]
    fn test_duplicate_candidates_map_to_one_of_them() {
        let (columns, categories) = classified(&["customer_id", "customer_key"]);
        let mappings = derive_mappings(&categories);
        assert!(columns.contains(&mappings["customer_id"]));
        assert!(columns.contains(&mappings["id"]));
    }
}
