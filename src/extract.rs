use log::debug;
use std::collections::BTreeMap;

use crate::error::{BudgetModelError, Result};
use crate::layout::{ExpenseBlock, IncomeBlock, NamedTableLayout, WorkbookLayout};
use crate::schema::{BudgetTables, DebtEntry, ExpenseEntry, GoalEntry, IncomeEntry};
use crate::source::{coerce_amount, CellValue, NamedTable, SheetGrid};
use crate::workbook::RawWorkbook;

/// Materializes the four typed tables from one raw workbook.
///
/// Cell-level anomalies (unparsable amounts, stray blanks) degrade to
/// defaults row by row. Only structural problems, like a required column
/// missing from a named table, fail the extraction, and then no tables are
/// returned at all.
pub fn extract_tables(raw: &RawWorkbook, layout: &WorkbookLayout) -> Result<BudgetTables> {
    let income = slice_income_block(&raw.monthly, &layout.monthly.income);
    let expenses = slice_expense_block(&raw.monthly, &layout.monthly.expenses);

    let debts: Vec<DebtEntry> = read_named_rows(&raw.debts, &layout.debts)?
        .into_iter()
        .map(|row| DebtEntry {
            description: row.description,
            amount: row.amount,
            extra: row.extra,
        })
        .collect();

    let goals: Vec<GoalEntry> = read_named_rows(&raw.goals, &layout.goals)?
        .into_iter()
        .map(|row| GoalEntry {
            description: row.description,
            amount: row.amount,
            extra: row.extra,
        })
        .collect();

    debug!(
        "Extracted {} income rows, {} expense rows, {} debts, {} goals",
        income.len(),
        expenses.len(),
        debts.len(),
        goals.len()
    );

    Ok(BudgetTables {
        income,
        expenses,
        debts,
        goals,
    })
}

/// Propagates the last non-blank label into subsequent blanks. Labels before
/// the first non-blank entry stay `None`.
pub fn fill_forward(labels: &[Option<String>]) -> Vec<Option<String>> {
    let mut last: Option<String> = None;
    labels
        .iter()
        .map(|label| {
            if let Some(value) = label {
                last = Some(value.clone());
            }
            last.clone()
        })
        .collect()
}

fn slice_income_block(grid: &SheetGrid, block: &IncomeBlock) -> Vec<IncomeEntry> {
    (block.start_row..block.start_row + block.row_count)
        .map(|row| IncomeEntry {
            description: cell_text(grid.cell(row, block.description_col)),
            amount: coerce_amount(grid.cell(row, block.amount_col)),
        })
        .collect()
}

fn slice_expense_block(grid: &SheetGrid, block: &ExpenseBlock) -> Vec<ExpenseEntry> {
    let rows = block.start_row..block.start_row + block.row_count;

    let raw_categories: Vec<Option<String>> = rows
        .clone()
        .map(|row| {
            let cell = grid.cell(row, block.category_col);
            if cell.is_blank() {
                None
            } else {
                Some(cell_text(cell))
            }
        })
        .collect();
    let categories = fill_forward(&raw_categories);

    rows.zip(categories)
        .map(|(row, category)| ExpenseEntry {
            category: category.unwrap_or_default(),
            description: cell_text(grid.cell(row, block.description_col)),
            amount: coerce_amount(grid.cell(row, block.amount_col)),
        })
        .collect()
}

#[derive(Debug)]
struct NamedRow {
    description: String,
    amount: f64,
    extra: BTreeMap<String, CellValue>,
}

/// Reads a header-driven table, dropping rows with blank descriptions and
/// carrying every column beyond description/value as extra fields.
fn read_named_rows(table: &NamedTable, layout: &NamedTableLayout) -> Result<Vec<NamedRow>> {
    let desc_col = table
        .column_index(&layout.description_column)
        .ok_or_else(|| BudgetModelError::ColumnMissing {
            table: layout.sheet_name.clone(),
            column: layout.description_column.clone(),
        })?;
    let value_col = table
        .column_index(&layout.value_column)
        .ok_or_else(|| BudgetModelError::ColumnMissing {
            table: layout.sheet_name.clone(),
            column: layout.value_column.clone(),
        })?;

    let mut entries = Vec::new();
    for row_idx in 0..table.rows.len() {
        let desc_cell = table.cell(row_idx, desc_col);
        if desc_cell.is_blank() {
            continue;
        }

        let mut extra = BTreeMap::new();
        for (col_idx, header) in table.headers.iter().enumerate() {
            if col_idx == desc_col || col_idx == value_col {
                continue;
            }
            let header = header.trim();
            let cell = table.cell(row_idx, col_idx);
            if header.is_empty() || cell.is_blank() {
                continue;
            }
            extra.insert(header.to_string(), cell.clone());
        }

        entries.push(NamedRow {
            description: cell_text(desc_cell),
            amount: coerce_amount(table.cell(row_idx, value_col)),
            extra,
        });
    }

    Ok(entries)
}

fn cell_text(cell: &CellValue) -> String {
    cell.to_text().trim().to_string()
}
