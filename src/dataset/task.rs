//! Read-only dataset adapter for batched consumption.

use super::table::{CanonicalTable, QaRecord};

/// Read-only view over the canonical table, exposing item count and
/// per-index retrieval for batched inference.
///
/// Retrieval returns the full canonical record, question and target both;
/// the evaluator pairs predictions with targets by row position, so the
/// target travels with the item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDataset {
    records: Vec<QaRecord>,
}

impl TaskDataset {
    /// Wrap a canonical table
    pub fn new(table: CanonicalTable) -> Self {
        Self { records: table.into_records() }
    }

    /// Number of items; always equals the wrapped table's row count
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Retrieve an item by index
    pub fn get(&self, index: usize) -> Option<&QaRecord> {
        self.records.get(index)
    }

    /// All records in dataset order
    pub fn records(&self) -> &[QaRecord] {
        &self.records
    }

    /// Keep only the first `n` items
    #[must_use]
    pub fn head(mut self, n: usize) -> Self {
        self.records.truncate(n);
        self
    }

    /// Iterate contiguous fixed-size batches in dataset order.
    ///
    /// The final batch may be shorter. A zero `batch_size` is treated as one.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = &[QaRecord]> {
        self.records.chunks(batch_size.max(1))
    }
}
