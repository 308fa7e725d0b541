//! Persistence for run artifacts
//!
//! The predictions CSV is the only file a run writes and the only file the
//! evaluator reads.

mod predictions;

pub use predictions::{PredictionRecord, PredictionsTable};
