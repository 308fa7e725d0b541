//! The run command: the full import → infer → evaluate sequence.

use std::path::PathBuf;

use crate::cli::logging::{log, LogLevel};
use crate::config::{RunArgs, RunOptions, Settings};
use crate::dataset::{RawDataImporter, RawDataPreprocessor, TaskDataset};
use crate::eval::TaskEvaluator;
use crate::pipeline::{model_cache_dir, LlmPipeline};

/// Default predictions output path
const PREDICTIONS_PATH: &str = "dist/predictions.csv";

/// Execute the pipeline in strict sequence:
/// obtain → analyze → transform → head → load → analyze_model →
/// infer_dataset → write CSV → evaluate.
pub fn run_run(args: RunArgs, level: LogLevel) -> Result<(), String> {
    let settings = Settings::from_path(&args.settings).map_err(|e| e.to_string())?;

    let defaults = RunOptions::default();
    let options = RunOptions {
        batch_size: args.batch_size.unwrap_or(defaults.batch_size),
        max_length: args.max_length.unwrap_or(defaults.max_length),
        num_samples: args.num_samples.unwrap_or(defaults.num_samples),
        device: defaults.device,
    };

    // Import
    let mut importer = RawDataImporter::new(settings.parameters.dataset.clone());
    if let Some(dir) = &args.data_dir {
        importer = importer.with_data_dir(dir);
    }
    log(
        level,
        LogLevel::Normal,
        &format!("Importing dataset '{}'", settings.parameters.dataset),
    );
    importer.obtain().map_err(|e| e.to_string())?;
    let raw = importer
        .into_raw_data()
        .ok_or_else(|| "importer yielded no data".to_string())?;

    // Preprocess
    let preprocessor = RawDataPreprocessor::new(raw);
    let stats = preprocessor.analyze().map_err(|e| e.to_string())?;
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Dataset: {} rows, {} columns, {} duplicates, {} empty cells, instruction length {}..{}",
            stats.num_samples,
            stats.num_columns,
            stats.duplicates,
            stats.empty_cells,
            stats.min_len,
            stats.max_len
        ),
    );
    let canonical = preprocessor.transform().map_err(|e| e.to_string())?;
    let dataset = TaskDataset::new(canonical).head(options.num_samples);
    log(
        level,
        LogLevel::Normal,
        &format!("Inferring {} samples on {}", dataset.len(), options.device),
    );

    // Load pipeline
    let mut pipeline = LlmPipeline::new(
        dataset,
        options.max_length,
        options.batch_size,
        options.device,
    );
    let model_dir = args
        .model_dir
        .clone()
        .unwrap_or_else(|| model_cache_dir(&settings.parameters.model));
    pipeline.load(&model_dir).map_err(|e| e.to_string())?;

    for (key, value) in pipeline.analyze_model() {
        log(level, LogLevel::Verbose, &format!("model.{key} = {value}"));
    }

    // Infer and persist
    let predictions = pipeline.infer_dataset().map_err(|e| e.to_string())?;
    let predictions_path = args
        .predictions
        .clone()
        .unwrap_or_else(|| PathBuf::from(PREDICTIONS_PATH));
    predictions
        .write_csv(&predictions_path)
        .map_err(|e| e.to_string())?;
    log(
        level,
        LogLevel::Normal,
        &format!("Wrote {} predictions to {}", predictions.len(), predictions_path.display()),
    );

    // Evaluate
    let evaluator = TaskEvaluator::from_names(&predictions_path, &settings.parameters.metrics)
        .map_err(|e| e.to_string())?;
    let results = evaluator.run().map_err(|e| e.to_string())?;

    if results.is_empty() {
        return Err("evaluation produced no result".to_string());
    }
    for (metric, score) in &results {
        log(level, LogLevel::Normal, &format!("{metric}: {score:.4}"));
    }

    Ok(())
}
