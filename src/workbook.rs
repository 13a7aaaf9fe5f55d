use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use log::debug;

use crate::error::{BudgetModelError, Result};
use crate::layout::{NamedTableLayout, WorkbookLayout};
use crate::source::{CellValue, NamedTable, SheetGrid};

/// The untyped content of the three configured worksheets. Tests and
/// alternative data sources can build this directly and skip file I/O.
#[derive(Debug, Clone)]
pub struct RawWorkbook {
    pub monthly: SheetGrid,
    pub debts: NamedTable,
    pub goals: NamedTable,
}

/// Opens the workbook at `path` and materializes the sheets named by the
/// layout. Fails on unreadable files and missing sheets; cell-level oddities
/// survive as `CellValue`s for the extractor to deal with.
pub fn load_workbook(path: &Path, layout: &WorkbookLayout) -> Result<RawWorkbook> {
    let mut workbook =
        open_workbook_auto(path).map_err(|source| BudgetModelError::WorkbookOpen {
            path: path.display().to_string(),
            source,
        })?;

    let monthly_range = read_range(&mut workbook, &layout.monthly.sheet_name)?;
    let debts_range = read_range(&mut workbook, &layout.debts.sheet_name)?;
    let goals_range = read_range(&mut workbook, &layout.goals.sheet_name)?;

    let raw = RawWorkbook {
        monthly: grid_from_range(&monthly_range),
        debts: table_from_range(&debts_range, &layout.debts),
        goals: table_from_range(&goals_range, &layout.goals),
    };

    debug!(
        "Loaded workbook {}: {} monthly rows, {} debt rows, {} goal rows",
        path.display(),
        raw.monthly.row_count(),
        raw.debts.rows.len(),
        raw.goals.rows.len()
    );

    Ok(raw)
}

fn read_range<RS>(workbook: &mut Sheets<RS>, sheet: &str) -> Result<Range<Data>>
where
    RS: Read + Seek,
{
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(BudgetModelError::SheetMissing(sheet.to_string()));
    }

    workbook
        .worksheet_range(sheet)
        .map_err(|e| BudgetModelError::SheetRead {
            sheet: sheet.to_string(),
            detail: e.to_string(),
        })
}

/// Rebuilds the sheet at absolute coordinates. The layout's fixed offsets
/// refer to sheet positions, so the reader's trimmed used-range must not
/// shift them.
fn grid_from_range(range: &Range<Data>) -> SheetGrid {
    let Some((end_row, end_col)) = range.end() else {
        return SheetGrid::default();
    };

    let mut rows = Vec::with_capacity(end_row as usize + 1);
    for row in 0..=end_row {
        let mut cells = Vec::with_capacity(end_col as usize + 1);
        for col in 0..=end_col {
            let cell = range
                .get_value((row, col))
                .map(convert_cell)
                .unwrap_or(CellValue::Empty);
            cells.push(cell);
        }
        rows.push(cells);
    }

    SheetGrid::from_rows(rows)
}

/// First used row is the header; everything below is data.
fn table_from_range(range: &Range<Data>, layout: &NamedTableLayout) -> NamedTable {
    let mut rows_iter = range.rows();

    let headers: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(|c| convert_cell(c).to_text()).collect())
        .unwrap_or_default();

    let rows: Vec<Vec<CellValue>> = rows_iter
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    NamedTable::new(layout.sheet_name.clone(), headers, rows)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{e:?}")),
        Data::Empty => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_preserves_absolute_positions() {
        let mut range = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("Salary".to_string()));
        range.set_value((3, 2), Data::Float(1200.0));

        let grid = grid_from_range(&range);
        assert_eq!(grid.cell(2, 1), &CellValue::Text("Salary".to_string()));
        assert_eq!(grid.cell(3, 2), &CellValue::Number(1200.0));
        assert_eq!(grid.cell(0, 0), &CellValue::Empty);
    }

    #[test]
    fn test_empty_range_yields_empty_grid() {
        let range: Range<Data> = Range::empty();
        assert_eq!(grid_from_range(&range).row_count(), 0);
    }

    #[test]
    fn test_table_splits_header_and_data() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("DESCRIPTION".to_string()));
        range.set_value((0, 1), Data::String("VALUE".to_string()));
        range.set_value((1, 0), Data::String("Car loan".to_string()));
        range.set_value((1, 1), Data::Float(12000.0));
        range.set_value((2, 0), Data::String("Credit card".to_string()));
        range.set_value((2, 1), Data::Float(800.0));

        let layout = NamedTableLayout {
            sheet_name: "debts".to_string(),
            description_column: "DESCRIPTION".to_string(),
            value_column: "VALUE".to_string(),
        };
        let table = table_from_range(&range, &layout);

        assert_eq!(table.headers, vec!["DESCRIPTION", "VALUE"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.column_index("value"), Some(1));
    }

    #[test]
    fn test_cell_conversion_covers_variants() {
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_cell(&Data::Bool(false)), CellValue::Bool(false));
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_cell(&Data::String("x".to_string())),
            CellValue::Text("x".to_string())
        );
    }
}
