//! Dataset import, preprocessing, and the task-dataset adapter
//!
//! The raw split is materialized as a [`RawTable`], analyzed and
//! canonicalized by [`RawDataPreprocessor`] into the two-column
//! (question, target) form, then wrapped read-only by [`TaskDataset`]
//! for batched inference.

mod importer;
mod preprocessor;
mod table;
mod task;


pub use importer::RawDataImporter;
pub use preprocessor::{DatasetStats, RawDataPreprocessor};
pub use table::{CanonicalTable, QaRecord, RawTable, QUESTION, TARGET};
pub use task::TaskDataset;
