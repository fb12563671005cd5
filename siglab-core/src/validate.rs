//! Input validation: the loaded table must be non-empty and carry a
//! numeric `close` column.

use thiserror::Error;

use crate::table::{Table, TableError};

/// Column the signal is computed from.
pub const CLOSE_COLUMN: &str = "close";

/// Errors from validating a loaded table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("CSV file is empty")]
    EmptyInput,

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Non-numeric value in column '{column}' at row {row}")]
    NonNumeric { column: String, row: usize },
}

/// Check a freshly loaded table and hand it back unchanged.
pub fn validate(table: Table) -> Result<Table, ValidationError> {
    if table.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    if !table.has_column(CLOSE_COLUMN) {
        return Err(ValidationError::MissingColumn(CLOSE_COLUMN.to_string()));
    }
    if let Err(TableError::NonNumeric { column, row }) = table.numeric_column(CLOSE_COLUMN) {
        return Err(ValidationError::NonNumeric { column, row });
    }
    Ok(table)
}
