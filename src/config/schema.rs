//! Settings file schema and run options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::Device;

/// The settings.json document.
///
/// ```json
/// {"parameters": {"dataset": "org/name", "model": "org/name", "metrics": ["bleu"]}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Run parameters
    pub parameters: Parameters,
}

/// The `parameters` block of settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// Dataset identifier
    pub dataset: String,
    /// Model identifier
    pub model: String,
    /// Metric names for the evaluator
    #[serde(default)]
    pub metrics: Vec<String>,
}

impl Settings {
    /// Load and parse a settings file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Fixed inference knobs of a run, overridable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Batch size for dataset inference
    pub batch_size: usize,
    /// Maximum sequence length (input truncation and generation cap)
    pub max_length: usize,
    /// Number of canonical records kept for inference
    pub num_samples: usize,
    /// Inference device
    pub device: Device,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { batch_size: 1, max_length: 120, num_samples: 100, device: Device::Cpu }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_parse() {
        let json = r#"{
            "parameters": {
                "dataset": "demo/qa",
                "model": "demo/causal-lm",
                "metrics": ["bleu", "rouge"]
            }
        }"#;

        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.parameters.dataset, "demo/qa");
        assert_eq!(settings.parameters.model, "demo/causal-lm");
        assert_eq!(settings.parameters.metrics, vec!["bleu", "rouge"]);
    }

    #[test]
    fn test_settings_metrics_default_empty() {
        let json = r#"{"parameters": {"dataset": "d", "model": "m"}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(settings.parameters.metrics.is_empty());
    }

    #[test]
    fn test_settings_missing_parameters_is_error() {
        assert!(serde_json::from_str::<Settings>("{}").is_err());
    }

    #[test]
    fn test_settings_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"parameters": {"dataset": "d", "model": "m", "metrics": []}}"#,
        )
        .unwrap();

        let settings = Settings::from_path(&path).unwrap();
        assert_eq!(settings.parameters.model, "m");
    }

    #[test]
    fn test_run_options_defaults() {
        let options = RunOptions::default();
        assert_eq!(options.batch_size, 1);
        assert_eq!(options.max_length, 120);
        assert_eq!(options.num_samples, 100);
        assert_eq!(options.device, Device::Cpu);
    }
}
