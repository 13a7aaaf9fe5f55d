use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell after format-specific decoding.
///
/// Conversion from the underlying workbook reader happens at the `workbook`
/// boundary; everything past that point sees only this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// True for empty cells and for text cells containing only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as display text. Whole numbers drop the trailing
    /// fractional part so a `1500.0` cell reads as "1500".
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(v) => {
                if v.is_finite() && v.fract() == 0.0 {
                    format!("{}", *v as i64)
                } else {
                    v.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Numeric reading of the cell, if it has one. Text cells are parsed
    /// after trimming and stripping thousands separators.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Coerces a cell expected to hold a monetary amount.
///
/// Missing or non-numeric cells default to 0 rather than failing the row;
/// legitimately negative values pass through unchanged.
pub fn coerce_amount(cell: &CellValue) -> f64 {
    cell.as_number().unwrap_or(0.0)
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// An untyped worksheet grid addressed by absolute row/column indices.
///
/// Out-of-range reads yield empty cells, so a sheet shorter than the
/// configured block degrades to blank rows instead of a fault.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A header-driven table: one header row followed by data rows.
#[derive(Debug, Clone)]
pub struct NamedTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl NamedTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Finds a column by header, trimming and ignoring ASCII case.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}
