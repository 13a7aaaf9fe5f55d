use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::{ExpenseEntry, GoalEntry, IncomeEntry};

/// Headline metrics for one budget period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,

    #[schemars(description = "Sum of expense rows whose category equals the configured essential label")]
    pub essential_expenses: f64,

    #[schemars(description = "total_income - total_expenses; negative means the month runs a deficit")]
    pub free_balance: f64,

    #[schemars(description = "free_balance projected over twelve months")]
    pub annual_projection: f64,

    #[schemars(description = "essential_expenses as a percentage of total_income; 0 when there is no income")]
    pub essential_ratio: f64,
}

/// How far the current free balance goes toward one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GoalProgress {
    pub description: String,
    pub target_amount: f64,

    #[schemars(description = "Fraction of the target the free balance covers, clamped to [0, 1]")]
    pub coverage_fraction: f64,

    #[schemars(description = "target_amount - free_balance; negative means the goal is already exceeded")]
    pub shortfall: f64,
}

/// Computes the summary metrics from the typed tables.
///
/// Stateless and cheap; callers re-run it on every metric request rather
/// than caching the result. Totals sum over every row, zero-valued ones
/// included. The essential match is an exact comparison against the single
/// configured label; any other category counts as non-essential.
pub fn summarize(
    income: &[IncomeEntry],
    expenses: &[ExpenseEntry],
    essential_category: &str,
) -> FinancialSummary {
    let total_income: f64 = income.iter().map(|e| e.amount).sum();
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let essential_expenses: f64 = expenses
        .iter()
        .filter(|e| e.category == essential_category)
        .map(|e| e.amount)
        .sum();

    let free_balance = total_income - total_expenses;
    let essential_ratio = if total_income > 0.0 {
        essential_expenses / total_income * 100.0
    } else {
        0.0
    };

    FinancialSummary {
        total_income,
        total_expenses,
        essential_expenses,
        free_balance,
        annual_projection: free_balance * 12.0,
        essential_ratio,
    }
}

/// Per-goal coverage, order-preserving. Goals with a non-positive target are
/// skipped entirely rather than reported as zero progress.
pub fn goal_progress(goals: &[GoalEntry], free_balance: f64) -> Vec<GoalProgress> {
    goals
        .iter()
        .filter(|g| g.amount > 0.0)
        .map(|g| GoalProgress {
            description: g.description.clone(),
            target_amount: g.amount,
            coverage_fraction: if free_balance > 0.0 {
                (free_balance / g.amount).min(1.0)
            } else {
                0.0
            },
            shortfall: g.amount - free_balance,
        })
        .collect()
}
