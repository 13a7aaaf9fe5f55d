use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::source::CellValue;

/// One income line from the monthly sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeEntry {
    #[schemars(description = "Free-text label of the income line (e.g. 'Salary')")]
    pub description: String,

    #[schemars(description = "Monthly amount. Unparsable source cells coerce to 0.")]
    pub amount: f64,
}

/// One expense line from the monthly sheet.
///
/// The source layout writes a category label once per block of rows; after
/// extraction every row carries its resolved category (fill-forward), except
/// rows that precede the first label in the block, which stay blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseEntry {
    #[schemars(description = "Resolved category label for this row (may be blank if the block never named one)")]
    pub category: String,

    pub description: String,

    #[schemars(description = "Monthly amount. Unparsable source cells coerce to 0.")]
    pub amount: f64,
}

/// One row of the debts table. Rows without a description are dropped at
/// extraction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DebtEntry {
    pub description: String,

    #[schemars(description = "Outstanding amount. Non-numeric source cells coerce to 0.")]
    pub amount: f64,

    #[serde(default)]
    #[schemars(description = "Remaining columns of the source table, keyed by header")]
    pub extra: BTreeMap<String, CellValue>,
}

/// One row of the goals table. Rows without a description are dropped at
/// extraction time; goals with a non-positive amount are kept in the table
/// but excluded from progress computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GoalEntry {
    pub description: String,

    #[schemars(description = "Target amount. Non-numeric source cells coerce to 0.")]
    pub amount: f64,

    #[serde(default)]
    #[schemars(description = "Remaining columns of the source table, keyed by header")]
    pub extra: BTreeMap<String, CellValue>,
}

/// The four typed tables produced by one extraction pass.
///
/// Tables are rebuilt wholesale on every extraction; rows carry no identity
/// across refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetTables {
    pub income: Vec<IncomeEntry>,
    pub expenses: Vec<ExpenseEntry>,
    pub debts: Vec<DebtEntry>,
    pub goals: Vec<GoalEntry>,
}

impl BudgetTables {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(BudgetTables)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = BudgetTables::schema_as_json().unwrap();
        assert!(schema_json.contains("income"));
        assert!(schema_json.contains("expenses"));
        assert!(schema_json.contains("debts"));
        assert!(schema_json.contains("goals"));
    }

    #[test]
    fn test_serialization() {
        let tables = BudgetTables {
            income: vec![IncomeEntry {
                description: "Salary".to_string(),
                amount: 5000.0,
            }],
            expenses: vec![ExpenseEntry {
                category: "ESSENTIALS".to_string(),
                description: "Rent".to_string(),
                amount: 1500.0,
            }],
            debts: vec![DebtEntry {
                description: "Car loan".to_string(),
                amount: 12000.0,
                extra: BTreeMap::new(),
            }],
            goals: vec![GoalEntry {
                description: "Emergency fund".to_string(),
                amount: 10000.0,
                extra: BTreeMap::from([(
                    "DEADLINE".to_string(),
                    CellValue::Text("2027".to_string()),
                )]),
            }],
        };

        let json = tables.to_json().unwrap();
        assert!(json.contains("Salary"));
        assert!(json.contains("DEADLINE"));

        let deserialized: BudgetTables = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, tables);
    }
}
