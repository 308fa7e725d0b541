//! Crate-wide error types
//!
//! Explicit error variants per failure boundary so callers can distinguish
//! a missing snapshot from a malformed one, and a missing model from a
//! constructed-but-unloaded pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the evaluation pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// No local snapshot for the requested dataset
    #[error("Dataset snapshot not found for '{dataset}': {path:?}")]
    DatasetNotFound { dataset: String, path: PathBuf },

    /// Fetched payload could not be coerced to a tabular form
    #[error("Dataset '{dataset}' is not tabular: {message}")]
    NotTabular { dataset: String, message: String },

    /// A required column is absent from the raw table
    #[error("Required column missing: {column}")]
    MissingColumn { column: String },

    /// Expected file is absent from a model directory
    #[error("File not found in {dir:?}: {file}")]
    FileNotFound { dir: PathBuf, file: String },

    /// SafeTensors payload could not be parsed
    #[error("Failed to parse model.safetensors: {message}")]
    SafeTensorsParse { message: String },

    /// No token-embedding matrix could be located in the checkpoint
    #[error("No embedding tensor found in model (tried {candidates:?})")]
    MissingEmbedding { candidates: Vec<String> },

    /// Tensor stored in a dtype the loader does not handle
    #[error("Unsupported dtype for tensor '{tensor}': {dtype}")]
    UnsupportedDtype { tensor: String, dtype: String },

    /// Inference requested before a model was loaded
    #[error("No model loaded; call load() before inference")]
    ModelNotLoaded,

    /// Predictions file parsed but contained zero rows
    #[error("Predictions file has no rows: {path:?}")]
    EmptyPredictions { path: PathBuf },

    /// Metric name not recognized by the evaluator
    #[error("Unknown metric: '{name}' (expected 'bleu' or 'rouge')")]
    UnknownMetric { name: String },

    /// Tokenizer failure
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] crate::tokenizer::TokenizerError),

    /// CSV read/write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse failure (settings, snapshots, model config)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
