//! Table loading for the runner.
//!
//! CSV files are read with a header row into a column-major `Table`.
//! Cells are typed per value (`Value::parse`), so a `close` column with a
//! stray text cell still loads and is rejected later by validation, not
//! here. This layer fails only on a missing file or unparseable content.

use std::io::Read;
use std::path::PathBuf;

use siglab_core::{Table, Value};
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input file not found")]
    NotFound(PathBuf),

    #[error("Invalid CSV format")]
    Format(#[source] Option<csv::Error>),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can produce the input table.
pub trait TableSource {
    /// Short description for log lines.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Table, LoadError>;
}

/// CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    path: PathBuf,
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for CsvTableSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Table, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::NotFound(self.path.clone()));
        }
        let file = std::fs::File::open(&self.path)?;
        read_csv(file)
    }
}

/// Parse CSV text from any reader into a `Table`.
///
/// A file with no header line is a format error; a header with no data
/// rows yields an empty table.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let header: Vec<String> = rdr
        .headers()
        .map_err(|e| LoadError::Format(Some(e)))?
        .iter()
        .map(str::to_string)
        .collect();
    if header.is_empty() || header.iter().all(String::is_empty) {
        return Err(LoadError::Format(None));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| LoadError::Format(Some(e)))?;
        rows.push(record.iter().map(Value::parse).collect());
    }

    Table::from_rows(&header, rows).map_err(|_| LoadError::Format(None))
}

/// In-memory source, for callers that already hold a table.
#[derive(Debug, Clone)]
pub struct InMemoryTable(pub Table);

impl TableSource for InMemoryTable {
    fn describe(&self) -> String {
        format!("in-memory table ({} rows)", self.0.row_count())
    }

    fn load(&self) -> Result<Table, LoadError> {
        Ok(self.0.clone())
    }
}
