use serde::Deserialize;
use std::collections::BTreeSet;

/// A derivation scenario record. Only the table fields matter here;
/// any other fields in the record are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub source_table: Option<String>,
    pub target_table: Option<String>,
    pub source_dataset_id: Option<String>,
}

/// Distinct non-empty table names referenced by the scenarios
pub fn scenario_tables(scenarios: &[Scenario]) -> BTreeSet<String> {
    scenarios
        .iter()
        .flat_map(|s| [s.source_table.as_deref(), s.target_table.as_deref()])
        .flatten()
        .filter(|table| !table.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let json = r#"[
            {"source_table": "customers", "target_table": "accounts",
             "source_dataset_id": "bank", "derivation_logic": "CONCAT(a, b)"},
            {"scenario_id": 7}
        ]"#;
        let scenarios: Vec<Scenario> = serde_json::from_str(json).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].source_dataset_id.as_deref(), Some("bank"));
        assert_eq!(scenarios[1], Scenario::default());
    }

    #[test]
    fn test_scenario_tables_are_distinct_and_non_empty() {
        let scenarios = vec![
            Scenario {
                source_table: Some("customers".to_string()),
                target_table: Some("accounts".to_string()),
                ..Scenario::default()
            },
            Scenario {
                source_table: Some("accounts".to_string()),
                target_table: Some(String::new()),
                ..Scenario::default()
            },
            Scenario::default(),
        ];
        let tables: Vec<_> = scenario_tables(&scenarios).into_iter().collect();
        assert_eq!(tables, vec!["accounts", "customers"]);
    }
}
