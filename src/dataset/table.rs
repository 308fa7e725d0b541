//! In-memory tabular structures for raw and canonical dataset forms.

use serde::{Deserialize, Serialize};

/// Canonical column name for the model input
pub const QUESTION: &str = "question";
/// Canonical column name for the reference answer
pub const TARGET: &str = "target";

/// A raw dataset table: ordered column names plus row-major cells.
///
/// Cells are `Option<String>`; `None` marks a missing value. Non-string
/// payload values are stringified at import time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Create a table from column names and rows.
    ///
    /// Rows shorter than the column list are right-filled with `None`;
    /// longer rows are truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Cell at (row, column name)
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }
}

/// The two-field canonical record: (question, target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    /// Model input text
    pub question: String,
    /// Reference answer
    pub target: String,
}

impl QaRecord {
    /// Create a record
    pub fn new(question: impl Into<String>, target: impl Into<String>) -> Self {
        Self { question: question.into(), target: target.into() }
    }
}

/// The preprocessed dataset: exactly the canonical columns, contiguous
/// zero-based row index (the `Vec` position).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTable {
    records: Vec<QaRecord>,
}

impl CanonicalTable {
    /// Create from records
    pub fn new(records: Vec<QaRecord>) -> Self {
        Self { records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in row order
    pub fn records(&self) -> &[QaRecord] {
        &self.records
    }

    /// Consume into records
    pub fn into_records(self) -> Vec<QaRecord> {
        self.records
    }

    /// Column names of the canonical schema
    pub fn columns() -> [&'static str; 2] {
        [QUESTION, TARGET]
    }
}
