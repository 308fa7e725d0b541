//! # evaluar
//!
//! A question-answering evaluation pipeline for causal language models:
//! import a dataset split, canonicalize it to (question, target) pairs,
//! generate answers in fixed-size batches, persist the predictions, and
//! score them with BLEU and ROUGE-L.
//!
//! The stages run in strict sequence and hand off through one artifact,
//! the predictions CSV:
//!
//! ```text
//! importer → preprocessor → task dataset → pipeline → predictions.csv → evaluator
//! ```
//!
//! # Example
//!
//! ```ignore
//! use evaluar::config::Settings;
//! use evaluar::dataset::{RawDataImporter, RawDataPreprocessor, TaskDataset};
//! use evaluar::eval::TaskEvaluator;
//! use evaluar::pipeline::{Device, LlmPipeline};
//!
//! let settings = Settings::from_path("settings.json".as_ref())?;
//!
//! let mut importer = RawDataImporter::new(&settings.parameters.dataset);
//! importer.obtain()?;
//!
//! let preprocessor = RawDataPreprocessor::new(importer.into_raw_data().unwrap());
//! let stats = preprocessor.analyze()?;
//! let dataset = TaskDataset::new(preprocessor.transform()?).head(100);
//!
//! let mut pipeline = LlmPipeline::new(dataset, 120, 1, Device::Cpu);
//! pipeline.load(&model_dir)?;
//! pipeline.infer_dataset()?.write_csv("dist/predictions.csv".as_ref())?;
//!
//! let evaluator = TaskEvaluator::from_names("dist/predictions.csv", &settings.parameters.metrics)?;
//! let results = evaluator.run()?;
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod io;
pub mod pipeline;
pub mod tokenizer;

pub use error::{Error, Result};
