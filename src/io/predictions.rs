//! Predictions table and its CSV persistence.
//!
//! The flat two-column file (`target,prediction`) is the sole persisted
//! artifact of a run and the sole handoff between inference and
//! evaluation. Row position is the key; a round-trip preserves pairs and
//! order exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One (target, prediction) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Reference answer
    pub target: String,
    /// Generated answer
    pub prediction: String,
}

/// Predictions paired with their targets, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionsTable {
    rows: Vec<PredictionRecord>,
}

impl PredictionsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair
    pub fn push(&mut self, target: String, prediction: String) {
        self.rows.push(PredictionRecord { target, prediction });
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in order
    pub fn rows(&self) -> &[PredictionRecord] {
        &self.rows
    }

    /// Target column as parallel sequence
    pub fn targets(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.target.as_str()).collect()
    }

    /// Prediction column as parallel sequence
    pub fn predictions(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.prediction.as_str()).collect()
    }

    /// Write the table as CSV, creating parent directories as needed.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table back from CSV.
    ///
    /// A malformed row anywhere fails the whole read.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<PredictionRecord>, _>>()?;
        Ok(Self { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> PredictionsTable {
        let mut table = PredictionsTable::new();
        table.push("blue".into(), "the sky is blue".into());
        table.push("eight".into(), "a spider has eight legs".into());
        table.push("four".into(), "four".into());
        table
    }

    #[test]
    fn test_csv_roundtrip_preserves_pairs_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dist").join("predictions.csv");

        let table = sample_table();
        table.write_csv(&path).unwrap();
        let loaded = PredictionsTable::read_csv(&path).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_csv_roundtrip_special_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");

        let mut table = PredictionsTable::new();
        table.push("a, b".into(), "line one\nline two".into());
        table.push("\"quoted\"".into(), "".into());

        table.write_csv(&path).unwrap();
        assert_eq!(PredictionsTable::read_csv(&path).unwrap(), table);
    }

    #[test]
    fn test_empty_table_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");

        PredictionsTable::new().write_csv(&path).unwrap();
        assert!(PredictionsTable::read_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn test_column_extraction() {
        let table = sample_table();
        assert_eq!(table.targets(), vec!["blue", "eight", "four"]);
        assert_eq!(table.predictions()[2], "four");
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PredictionsTable::read_csv(&dir.path().join("absent.csv")).is_err());
    }
}
