//! Dataset analysis and canonicalization.

use std::collections::HashSet;

use crate::error::{Error, Result};

use super::table::{CanonicalTable, QaRecord, RawTable};

/// Raw column holding the model input
const INSTRUCTION: &str = "instruction";
/// Raw column holding the reference answer
const RESPONSE: &str = "response";
/// Raw columns dropped during canonicalization
const DROPPED: [&str; 4] = ["index", "context", "category", "text"];

/// Descriptive statistics over the raw table.
///
/// Length statistics cover the `instruction` field of complete rows only
/// (rows with any missing value are excluded from the length scan).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetStats {
    /// Total number of rows
    pub num_samples: usize,
    /// Number of columns
    pub num_columns: usize,
    /// Rows identical to an earlier row
    pub duplicates: usize,
    /// Missing cells across the whole table
    pub empty_cells: usize,
    /// Shortest instruction, in characters
    pub min_len: usize,
    /// Longest instruction, in characters
    pub max_len: usize,
}

/// Analyzes and canonicalizes a raw dataset.
pub struct RawDataPreprocessor {
    raw: RawTable,
}

impl RawDataPreprocessor {
    /// Wrap a raw table
    pub fn new(raw: RawTable) -> Self {
        Self { raw }
    }

    /// The wrapped raw table
    pub fn raw_data(&self) -> &RawTable {
        &self.raw
    }

    /// Compute dataset key properties.
    ///
    /// Pure: the raw table is never mutated. Incomplete rows are skipped
    /// for the length statistics but still counted in `num_samples` and
    /// `empty_cells`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingColumn`] when the table has no `instruction` column.
    pub fn analyze(&self) -> Result<DatasetStats> {
        let instruction_idx = self
            .raw
            .column_index(INSTRUCTION)
            .ok_or_else(|| Error::MissingColumn { column: INSTRUCTION.to_string() })?;

        let mut seen: HashSet<&Vec<Option<String>>> = HashSet::new();
        let mut duplicates = 0;
        let mut empty_cells = 0;
        let mut min_len = usize::MAX;
        let mut max_len = 0;

        for row in self.raw.rows() {
            if !seen.insert(row) {
                duplicates += 1;
            }
            let missing = row.iter().filter(|cell| cell.is_none()).count();
            empty_cells += missing;

            if missing == 0 {
                if let Some(Some(instruction)) = row.get(instruction_idx) {
                    let len = instruction.chars().count();
                    min_len = min_len.min(len);
                    max_len = max_len.max(len);
                }
            }
        }

        if min_len == usize::MAX {
            min_len = 0;
        }

        Ok(DatasetStats {
            num_samples: self.raw.num_rows(),
            num_columns: self.raw.num_columns(),
            duplicates,
            empty_cells,
            min_len,
            max_len,
        })
    }

    /// Canonicalize: drop auxiliary columns, rename `instruction` to
    /// `question` and `response` to `target`, drop rows missing either
    /// field, and reset the row index to a contiguous zero-based range.
    ///
    /// Completeness here is weaker than in [`analyze`](Self::analyze): a
    /// row missing only auxiliary cells is excluded from the length
    /// statistics but still canonicalized, since the dropped columns
    /// cannot invalidate a (question, target) pair.
    ///
    /// Deterministic; source row order is preserved.
    ///
    /// # Errors
    ///
    /// [`Error::MissingColumn`] when either essential column is absent.
    pub fn transform(&self) -> Result<CanonicalTable> {
        let instruction_idx = self
            .raw
            .column_index(INSTRUCTION)
            .ok_or_else(|| Error::MissingColumn { column: INSTRUCTION.to_string() })?;
        let response_idx = self
            .raw
            .column_index(RESPONSE)
            .ok_or_else(|| Error::MissingColumn { column: RESPONSE.to_string() })?;

        let records = self
            .raw
            .rows()
            .iter()
            .filter_map(|row| {
                let question = row.get(instruction_idx)?.as_deref()?;
                let target = row.get(response_idx)?.as_deref()?;
                Some(QaRecord::new(question, target))
            })
            .collect();

        Ok(CanonicalTable::new(records))
    }

    /// Raw columns the transform removes
    pub fn dropped_columns() -> &'static [&'static str] {
        &DROPPED
    }
}
