use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetModelError {
    #[error("Failed to open workbook '{path}': {source}")]
    WorkbookOpen {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Worksheet not found: {0}")]
    SheetMissing(String),

    #[error("Failed to read worksheet '{sheet}': {detail}")]
    SheetRead { sheet: String, detail: String },

    #[error("Required column '{column}' missing from table '{table}'")]
    ColumnMissing { table: String, column: String },

    #[error("Invalid workbook layout: {0}")]
    InvalidLayout(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BudgetModelError>;
