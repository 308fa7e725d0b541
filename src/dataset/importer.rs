//! Raw dataset importer.
//!
//! Materializes the `test` split of a dataset as a [`RawTable`]. Resolution
//! is snapshot-based: the split is read from an explicit data directory or
//! from the user cache (`<cache>/evaluar/datasets/<id>/test.jsonl`, with
//! `/` in the dataset ID mapped to `--`). A missing snapshot is an explicit
//! error; there is no retry policy.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Error, Result};

use super::table::RawTable;

/// Imports a question-answering dataset split.
///
/// Two-phase lifecycle: construction stores the identifier only, [`obtain`]
/// performs the fetch. A constructed-but-unobtained importer holds no data.
///
/// [`obtain`]: RawDataImporter::obtain
pub struct RawDataImporter {
    dataset: String,
    data_dir: Option<PathBuf>,
    raw: Option<RawTable>,
}

impl RawDataImporter {
    /// Create an importer for the given dataset identifier
    pub fn new(dataset: impl Into<String>) -> Self {
        Self { dataset: dataset.into(), data_dir: None, raw: None }
    }

    /// Read the split from an explicit directory instead of the user cache
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Dataset identifier
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Path the test split is resolved from
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.join("test.jsonl"),
            None => dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("evaluar")
                .join("datasets")
                .join(self.dataset.replace('/', "--"))
                .join("test.jsonl"),
        }
    }

    /// Fetch the test split and hold it as a tabular structure.
    ///
    /// # Errors
    ///
    /// [`Error::DatasetNotFound`] when no snapshot exists,
    /// [`Error::NotTabular`] when the payload cannot be coerced to a table.
    pub fn obtain(&mut self) -> Result<&RawTable> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Err(Error::DatasetNotFound { dataset: self.dataset.clone(), path });
        }

        let text = std::fs::read_to_string(&path)?;
        let table = parse_tabular(&self.dataset, &text)?;
        Ok(self.raw.insert(table))
    }

    /// The fetched raw table, if [`obtain`](RawDataImporter::obtain) succeeded
    pub fn raw_data(&self) -> Option<&RawTable> {
        self.raw.as_ref()
    }

    /// Consume the importer, yielding the raw table
    pub fn into_raw_data(self) -> Option<RawTable> {
        self.raw
    }
}

/// Parse a snapshot payload (JSON lines, or a single JSON array) into a table.
///
/// The first record fixes the column set; later records fill by name and
/// unknown keys are ignored. A record that is not a JSON object fails the
/// coercion.
pub(crate) fn parse_tabular(dataset: &str, text: &str) -> Result<RawTable> {
    let values = collect_values(dataset, text)?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();

    for (line_no, value) in values.into_iter().enumerate() {
        let object = value.as_object().ok_or_else(|| Error::NotTabular {
            dataset: dataset.to_string(),
            message: format!("record {line_no} is not an object"),
        })?;

        if columns.is_empty() {
            columns = object.keys().cloned().collect();
        }

        let row: Vec<Option<String>> =
            columns.iter().map(|c| object.get(c).and_then(cell_text)).collect();
        rows.push(row);
    }

    if columns.is_empty() {
        return Err(Error::NotTabular {
            dataset: dataset.to_string(),
            message: "payload contains no records".to_string(),
        });
    }

    Ok(RawTable::new(columns, rows))
}

fn collect_values(dataset: &str, text: &str) -> Result<Vec<Value>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed)?;
        return match value {
            Value::Array(items) => Ok(items),
            _ => Err(Error::NotTabular {
                dataset: dataset.to_string(),
                message: "top-level payload is not an array of records".to_string(),
            }),
        };
    }

    let mut values = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        values.push(serde_json::from_str(line)?);
    }
    Ok(values)
}

/// Stringify a JSON cell: null becomes a missing value, strings pass
/// through, numbers and booleans render as their JSON text.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
