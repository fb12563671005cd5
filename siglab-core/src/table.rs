//! Column-major table of named, equal-length columns.
//!
//! Rows keep their load order; the rolling computations downstream are
//! order-dependent. Tables are never mutated after construction: deriving
//! a column produces a new `Table`.

use serde::{Deserialize, Serialize};

/// Cell texts read as missing values, as spreadsheet and dataframe
/// exports write them.
pub const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Parse a raw text cell: empty or an NA marker → `Missing`, parseable
    /// float → `Number`, anything else → `Text`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || NA_MARKERS.contains(&trimmed) {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    /// Numeric view of the cell. `Missing` maps to NaN, `Text` to `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Missing => Some(f64::NAN),
            Value::Text(_) => None,
        }
    }

    /// Inverse of `as_f64` for derived columns: NaN is stored as `Missing`.
    pub fn from_f64(n: f64) -> Self {
        if n.is_nan() {
            Value::Missing
        } else {
            Value::Number(n)
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a numeric column; NaN entries become `Missing`.
    pub fn numeric(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().map(|&v| Value::from_f64(v)).collect())
    }
}

/// Errors from building or reading a table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Non-numeric value in column '{column}' at row {row}")]
    NonNumeric { column: String, row: usize },
}

/// Ordered collection of equal-length columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Table with the given column names and no rows.
    pub fn empty(names: &[&str]) -> Self {
        Self {
            columns: names.iter().map(|n| Column::new(*n, Vec::new())).collect(),
            row_count: 0,
        }
    }

    /// Build a table from columns, checking lengths and name uniqueness.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, |c| c.values.len());
        for (i, col) in columns.iter().enumerate() {
            if col.values.len() != row_count {
                return Err(TableError::LengthMismatch {
                    name: col.name.clone(),
                    expected: row_count,
                    actual: col.values.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(TableError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Self { columns, row_count })
    }

    /// Build a table from a header and row-major records.
    pub fn from_rows(header: &[String], rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        let mut columns: Vec<Column> = header
            .iter()
            .map(|name| Column::new(name.clone(), Vec::with_capacity(rows.len())))
            .collect();
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::LengthMismatch {
                    name: format!("row {}", i + 1),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.values.push(value);
            }
        }
        Self::from_columns(columns)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when there are no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Read a column as `f64`s. Missing cells become NaN; a textual cell
    /// is an error naming its 1-based row.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let col = self
            .column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;
        col.values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().ok_or_else(|| TableError::NonNumeric {
                    column: name.to_string(),
                    row: i + 1,
                })
            })
            .collect()
    }

    /// Return a new table with `column` added. A column with the same name
    /// is replaced at its existing position.
    pub fn with_column(&self, column: Column) -> Result<Self, TableError> {
        if column.values.len() != self.row_count && !self.columns.is_empty() {
            return Err(TableError::LengthMismatch {
                name: column.name,
                expected: self.row_count,
                actual: column.values.len(),
            });
        }
        let mut columns = self.columns.clone();
        match columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => columns.push(column),
        }
        Self::from_columns(columns)
    }
}
