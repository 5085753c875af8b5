use serde::Serialize;

/// Kind of operation spotted in a derivation expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Concatenation,
    Aggregation,
    Conditional,
}

/// Keywords that reveal each operation, checked in this order
const OPERATION_KEYWORDS: &[(Operation, &[&str])] = &[
    (Operation::Concatenation, &["concat"]),
    (Operation::Aggregation, &["sum", "count", "avg", "max", "min"]),
    (Operation::Conditional, &["case when"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    fn from_operation_count(count: usize) -> Self {
        match count {
            0 => Complexity::Simple,
            1 => Complexity::Moderate,
            _ => Complexity::Complex,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivationAnalysis {
    pub referenced_columns: Vec<String>,
    pub operations: Vec<Operation>,
    pub complexity: Complexity,
}

/// Lexical scan of a free-text derivation expression.
///
/// Matching is plain case-insensitive substring containment, so a column
/// named `id` is "referenced" by any text containing `id`.
pub fn analyze_derivation_logic(logic: &str, columns: &[String]) -> DerivationAnalysis {
    let lowered = logic.to_lowercase();

    let referenced_columns = columns
        .iter()
        .filter(|col| lowered.contains(&col.to_lowercase()))
        .cloned()
        .collect();

    let operations: Vec<Operation> = OPERATION_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(op, _)| *op)
        .collect();

    DerivationAnalysis {
        referenced_columns,
        complexity: Complexity::from_operation_count(operations.len()),
        operations,
    }
}
