//! # Budget Model Builder
//!
//! A library for turning a personal-finance workbook (monthly income and
//! expense blocks, a debts table, a goals table) into typed tables and the
//! derived metrics behind a budget dashboard.
//!
//! ## Core Concepts
//!
//! - **Raw workbook**: the untyped cell content of the configured sheets, a
//!   positional grid for the monthly sheet plus two header-driven tables
//! - **Layout**: an explicit configuration struct saying where each block and
//!   column lives; changing the spreadsheet means changing the layout, not
//!   the code
//! - **Extraction**: one pass that materializes the four typed tables,
//!   absorbing cell-level noise (unparsable amounts coerce to 0, blank
//!   expense categories fill forward) and failing only on structural problems
//! - **Aggregation**: pure, stateless recomputation of the summary metrics
//!   and per-goal progress on every request
//!
//! ## Example
//!
//! ```rust,ignore
//! use budget_model_builder::*;
//!
//! let layout = WorkbookLayout::default();
//! let model = build_budget_model("budget.xlsx", &layout)?;
//!
//! println!("free balance: {:.2}", model.summary.free_balance);
//! for goal in &model.goal_progress {
//!     println!("{}: {:.0}%", goal.description, goal.coverage_fraction * 100.0);
//! }
//! ```

pub mod cache;
pub mod error;
pub mod extract;
pub mod layout;
pub mod schema;
pub mod source;
pub mod summary;
pub mod workbook;

pub use cache::{TtlCache, DEFAULT_TTL_SECONDS};
pub use error::{BudgetModelError, Result};
pub use extract::{extract_tables, fill_forward};
pub use layout::{
    ExpenseBlock, IncomeBlock, MonthlySheetLayout, NamedTableLayout, WorkbookLayout,
};
pub use schema::{BudgetTables, DebtEntry, ExpenseEntry, GoalEntry, IncomeEntry};
pub use source::{coerce_amount, CellValue, NamedTable, SheetGrid};
pub use summary::{goal_progress, summarize, FinancialSummary, GoalProgress};
pub use workbook::{load_workbook, RawWorkbook};

use chrono::{DateTime, Utc};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The complete derived view handed to a presentation layer: the four typed
/// tables, the summary metrics, and per-goal progress, stamped with the
/// extraction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetModel {
    pub tables: BudgetTables,
    pub summary: FinancialSummary,
    pub goal_progress: Vec<GoalProgress>,
    pub refreshed_at: DateTime<Utc>,
}

impl BudgetModel {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(BudgetModel)
    }

    pub fn schema_as_json() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::generate_json_schema())?)
    }
}

pub struct BudgetModelProcessor;

impl BudgetModelProcessor {
    /// Opens the workbook at `path` and builds the full model.
    pub fn from_path(path: &Path, layout: &WorkbookLayout) -> Result<BudgetModel> {
        layout.validate()?;

        info!("Extracting budget model from {}", path.display());
        let raw = workbook::load_workbook(path, layout)?;
        Self::build(&raw, layout)
    }

    /// Builds the model from already-loaded sheet content. This is the entry
    /// point for non-file sources and for tests.
    pub fn from_raw(raw: &RawWorkbook, layout: &WorkbookLayout) -> Result<BudgetModel> {
        layout.validate()?;
        Self::build(raw, layout)
    }

    fn build(raw: &RawWorkbook, layout: &WorkbookLayout) -> Result<BudgetModel> {
        let tables = extract_tables(raw, layout)?;
        let summary = summarize(&tables.income, &tables.expenses, &layout.essential_category);
        let progress = goal_progress(&tables.goals, summary.free_balance);

        debug!(
            "Summary: income {:.2}, expenses {:.2}, free balance {:.2}, essential ratio {:.1}%",
            summary.total_income,
            summary.total_expenses,
            summary.free_balance,
            summary.essential_ratio
        );

        Ok(BudgetModel {
            tables,
            summary,
            goal_progress: progress,
            refreshed_at: Utc::now(),
        })
    }
}

pub fn build_budget_model(path: impl AsRef<Path>, layout: &WorkbookLayout) -> Result<BudgetModel> {
    BudgetModelProcessor::from_path(path.as_ref(), layout)
}

pub fn build_budget_model_from_raw(
    raw: &RawWorkbook,
    layout: &WorkbookLayout,
) -> Result<BudgetModel> {
    BudgetModelProcessor::from_raw(raw, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn n(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn small_layout() -> WorkbookLayout {
        WorkbookLayout {
            monthly: MonthlySheetLayout {
                sheet_name: "Monthly Budget".to_string(),
                income: IncomeBlock {
                    start_row: 0,
                    row_count: 2,
                    description_col: 0,
                    amount_col: 1,
                },
                expenses: ExpenseBlock {
                    start_row: 0,
                    row_count: 3,
                    category_col: 3,
                    description_col: 4,
                    amount_col: 5,
                },
            },
            ..WorkbookLayout::default()
        }
    }

    fn raw_workbook() -> RawWorkbook {
        let monthly = SheetGrid::from_rows(vec![
            vec![t("Salary"), n(4000.0), CellValue::Empty, t("ESSENTIALS"), t("Rent"), n(1500.0)],
            vec![t("Side gig"), n(1000.0), CellValue::Empty, CellValue::Empty, t("Groceries"), n(1700.0)],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty, t("LEISURE"), t("Streaming"), CellValue::Empty],
        ]);

        let debts = NamedTable::new(
            "debts",
            vec!["DESCRIPTION".to_string(), "VALUE".to_string()],
            vec![vec![t("Car loan"), n(9000.0)]],
        );
        let goals = NamedTable::new(
            "goals",
            vec!["DESCRIPTION".to_string(), "VALUE".to_string()],
            vec![
                vec![t("New car"), n(2000.0)],
                vec![t("Someday"), n(0.0)],
            ],
        );

        RawWorkbook {
            monthly,
            debts,
            goals,
        }
    }

    #[test]
    fn test_end_to_end_processing() {
        let model = BudgetModelProcessor::from_raw(&raw_workbook(), &small_layout()).unwrap();

        assert_eq!(model.summary.total_income, 5000.0);
        assert_eq!(model.summary.total_expenses, 3200.0);
        assert_eq!(model.summary.free_balance, 1800.0);
        assert_eq!(model.summary.annual_projection, 21600.0);
        assert_eq!(model.summary.essential_expenses, 3200.0);

        // the zero-amount goal is skipped, not zero-filled
        assert_eq!(model.goal_progress.len(), 1);
        assert_eq!(model.goal_progress[0].coverage_fraction, 0.9);
        assert_eq!(model.goal_progress[0].shortfall, 200.0);

        assert_eq!(model.tables.debts.len(), 1);
        assert_eq!(model.tables.expenses[1].category, "ESSENTIALS");
    }

    #[test]
    fn test_invalid_layout_rejected_before_extraction() {
        let mut layout = small_layout();
        layout.monthly.income.row_count = 0;

        let err = BudgetModelProcessor::from_raw(&raw_workbook(), &layout).unwrap_err();
        assert!(matches!(err, BudgetModelError::InvalidLayout(_)));
    }

    #[test]
    fn test_model_serializes() {
        let model = BudgetModelProcessor::from_raw(&raw_workbook(), &small_layout()).unwrap();
        let json = model.to_json().unwrap();
        assert!(json.contains("free_balance"));
        assert!(json.contains("refreshed_at"));

        let schema = BudgetModel::schema_as_json().unwrap();
        assert!(schema.contains("goal_progress"));
    }
}
