//! Inference pipeline
//!
//! Loads a pretrained causal LM plus tokenizer, reports static model
//! properties, and generates text predictions per batch. Generation is
//! greedy and strictly sequential; there is no gradient path anywhere.
//!
//! # Example
//!
//! ```ignore
//! use evaluar::pipeline::{Device, LlmPipeline};
//!
//! let mut pipeline = LlmPipeline::new(dataset, 120, 1, Device::Cpu);
//! pipeline.load(&model_dir)?;
//! let predictions = pipeline.infer_dataset()?;
//! ```

mod collate;
mod llm;
mod model;
mod safetensors_lm;

#[cfg(test)]
mod tests;

pub use collate::{Batch, Collator};
pub use llm::{LlmPipeline, PostProcess};
pub use model::{CausalModel, Device, EchoModel};
pub use safetensors_lm::SafeTensorsLm;

use std::path::PathBuf;

/// Default checkpoint directory for a model identifier:
/// `<cache>/evaluar/models/<id>`, with `/` in the ID mapped to `--`.
pub fn model_cache_dir(model_id: &str) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("evaluar")
        .join("models")
        .join(model_id.replace('/', "--"))
}
