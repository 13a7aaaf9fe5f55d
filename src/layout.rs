use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{BudgetModelError, Result};

/// Where the income block lives on the monthly sheet. All offsets are
/// zero-based absolute sheet coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeBlock {
    pub start_row: usize,
    pub row_count: usize,
    pub description_col: usize,
    pub amount_col: usize,
}

/// Where the expense block lives on the monthly sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseBlock {
    pub start_row: usize,
    pub row_count: usize,
    pub category_col: usize,
    pub description_col: usize,
    pub amount_col: usize,
}

/// The monthly worksheet: two side-by-side fixed-offset blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlySheetLayout {
    pub sheet_name: String,
    pub income: IncomeBlock,
    pub expenses: ExpenseBlock,
}

/// A header-driven worksheet addressed by column names rather than offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NamedTableLayout {
    pub sheet_name: String,
    pub description_column: String,
    pub value_column: String,
}

/// The full configuration contract between the workbook and the extractor.
///
/// Changing the spreadsheet layout means changing this value, not the
/// extraction code. Validated once before any extraction runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkbookLayout {
    pub monthly: MonthlySheetLayout,
    pub debts: NamedTableLayout,
    pub goals: NamedTableLayout,

    #[schemars(description = "Canonical category label that marks a row as essential spending. Compared exactly; every other label is non-essential.")]
    pub essential_category: String,
}

impl Default for WorkbookLayout {
    /// Layout of the stock budget workbook: nine income rows and nineteen
    /// expense rows starting at row 5, with the expense block to the right
    /// of the income block.
    fn default() -> Self {
        Self {
            monthly: MonthlySheetLayout {
                sheet_name: "Monthly Budget".to_string(),
                income: IncomeBlock {
                    start_row: 5,
                    row_count: 9,
                    description_col: 1,
                    amount_col: 2,
                },
                expenses: ExpenseBlock {
                    start_row: 5,
                    row_count: 19,
                    category_col: 4,
                    description_col: 5,
                    amount_col: 6,
                },
            },
            debts: NamedTableLayout {
                sheet_name: "debts".to_string(),
                description_column: "DESCRIPTION".to_string(),
                value_column: "VALUE".to_string(),
            },
            goals: NamedTableLayout {
                sheet_name: "goals".to_string(),
                description_column: "DESCRIPTION".to_string(),
                value_column: "VALUE".to_string(),
            },
            essential_category: "ESSENTIALS".to_string(),
        }
    }
}

impl WorkbookLayout {
    pub fn validate(&self) -> Result<()> {
        if self.monthly.sheet_name.trim().is_empty() {
            return Err(BudgetModelError::InvalidLayout(
                "monthly sheet name is empty".to_string(),
            ));
        }

        if self.monthly.income.row_count == 0 {
            return Err(BudgetModelError::InvalidLayout(
                "income block has zero rows".to_string(),
            ));
        }
        if self.monthly.expenses.row_count == 0 {
            return Err(BudgetModelError::InvalidLayout(
                "expense block has zero rows".to_string(),
            ));
        }

        let inc = &self.monthly.income;
        if inc.description_col == inc.amount_col {
            return Err(BudgetModelError::InvalidLayout(format!(
                "income block maps description and amount to the same column {}",
                inc.amount_col
            )));
        }

        let exp = &self.monthly.expenses;
        if exp.category_col == exp.description_col
            || exp.category_col == exp.amount_col
            || exp.description_col == exp.amount_col
        {
            return Err(BudgetModelError::InvalidLayout(
                "expense block maps two fields to the same column".to_string(),
            ));
        }

        for table in [&self.debts, &self.goals] {
            if table.sheet_name.trim().is_empty() {
                return Err(BudgetModelError::InvalidLayout(
                    "named table sheet name is empty".to_string(),
                ));
            }
            if table.description_column.trim().is_empty() || table.value_column.trim().is_empty() {
                return Err(BudgetModelError::InvalidLayout(format!(
                    "named table '{}' has an empty column name",
                    table.sheet_name
                )));
            }
        }

        if self.essential_category.trim().is_empty() {
            return Err(BudgetModelError::InvalidLayout(
                "essential category label is empty".to_string(),
            ));
        }

        Ok(())
    }
}
