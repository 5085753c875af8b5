use super::types::ColumnCategory;

/// Lexical rule: a column whose lower-cased name contains any of
/// `patterns` belongs to `category`
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub patterns: &'static [&'static str],
    pub category: ColumnCategory,
}

impl CategoryRule {
    pub const fn new(patterns: &'static [&'static str], category: ColumnCategory) -> Self {
        Self { patterns, category }
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.patterns.iter().any(|p| lowered.contains(p))
    }
}

/// Classification rules in priority order. First match wins, anything
/// unmatched is `Other`.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule::new(&["id", "key"], ColumnCategory::Id),
    CategoryRule::new(&["name", "title"], ColumnCategory::Name),
    CategoryRule::new(&["email", "mail"], ColumnCategory::Email),
    CategoryRule::new(&["date", "time"], ColumnCategory::Date),
    CategoryRule::new(&["amount", "balance", "salary"], ColumnCategory::Numeric),
    CategoryRule::new(&["address", "location"], ColumnCategory::Address),
    CategoryRule::new(&["phone", "mobile"], ColumnCategory::Phone),
];

impl ColumnCategory {
    /// Classify a column name with [`CATEGORY_RULES`].
    ///
    /// Only ASCII letters are folded, matching SQL `LOWER`.
    pub fn classify(column_name: &str) -> Self {
        let lowered = column_name.to_ascii_lowercase();
        CATEGORY_RULES
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.category)
            .unwrap_or(ColumnCategory::Other)
    }
}

/// Render [`CATEGORY_RULES`] as a SQL `CASE` expression over `column_expr`,
/// so a metadata query classifies columns exactly like [`ColumnCategory::classify`]
pub fn category_case_sql(column_expr: &str) -> String {
    let mut sql = String::from("CASE\n");

    for rule in CATEGORY_RULES {
        let conditions: Vec<String> = rule
            .patterns
            .iter()
            .map(|p| format!("LOWER({}) LIKE '%{}%'", column_expr, p))
            .collect();
        sql.push_str(&format!(
            "    WHEN {} THEN '{}'\n",
            conditions.join(" OR "),
            rule.category
        ));
    }

    sql.push_str(&format!("    ELSE '{}'\nEND", ColumnCategory::Other));
    sql
}
