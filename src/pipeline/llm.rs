//! The inference pipeline: model loading, property introspection, and
//! batched greedy generation over a task dataset.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Value};

use crate::dataset::{QaRecord, TaskDataset};
use crate::error::{Error, Result};
use crate::io::PredictionsTable;
use crate::tokenizer::{BpeTokenizer, Tokenizer};

use super::collate::Collator;
use super::model::{CausalModel, Device};
use super::safetensors_lm::SafeTensorsLm;

/// Post-processing applied to each decoded string.
///
/// Decoding returns the full sequence, prompt included, so models that
/// answer after echoing the prompt need the leading line removed. The
/// stripping is configuration, not a hardcoded transformation: models that
/// reply without echoing use [`PostProcess::Verbatim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostProcess {
    /// Drop everything up to and including the first newline
    #[default]
    StripEchoLine,
    /// Keep the decoded string unchanged
    Verbatim,
}

impl PostProcess {
    /// Apply the step to a decoded string
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::StripEchoLine => text
                .split_once('\n')
                .map_or(text, |(_, rest)| rest)
                .to_string(),
            Self::Verbatim => text.to_string(),
        }
    }
}

/// Initializes a model, analyzes its properties, and infers over a dataset.
///
/// Two-phase lifecycle: [`new`](LlmPipeline::new) performs no expensive
/// work; [`load`](LlmPipeline::load) reads the checkpoint and tokenizer.
/// Before loading, property queries return an empty mapping and sample
/// inference returns `None`.
pub struct LlmPipeline {
    model: Option<Box<dyn CausalModel>>,
    tokenizer: Option<BpeTokenizer>,
    dataset: TaskDataset,
    max_length: usize,
    batch_size: usize,
    device: Device,
    post: PostProcess,
}

impl LlmPipeline {
    /// Create an unloaded pipeline over a dataset
    pub fn new(dataset: TaskDataset, max_length: usize, batch_size: usize, device: Device) -> Self {
        Self {
            model: None,
            tokenizer: None,
            dataset,
            max_length,
            batch_size: batch_size.max(1),
            device,
            post: PostProcess::default(),
        }
    }

    /// Override the decoded-string post-processing step
    #[must_use]
    pub fn with_post_process(mut self, post: PostProcess) -> Self {
        self.post = post;
        self
    }

    /// Load model and tokenizer from a checkpoint directory containing
    /// `model.safetensors` and `tokenizer.json`.
    pub fn load(&mut self, model_dir: &Path) -> Result<()> {
        let tokenizer_path = model_dir.join("tokenizer.json");
        if !tokenizer_path.exists() {
            return Err(Error::FileNotFound {
                dir: model_dir.to_path_buf(),
                file: "tokenizer.json".to_string(),
            });
        }

        let model = SafeTensorsLm::load(model_dir)?;
        let tokenizer = BpeTokenizer::load(&tokenizer_path)?;

        self.model = Some(Box::new(model));
        self.tokenizer = Some(tokenizer);
        Ok(())
    }

    /// Attach an already constructed model and tokenizer. Seam for test
    /// doubles and dry runs.
    pub fn attach(&mut self, model: Box<dyn CausalModel>, tokenizer: BpeTokenizer) {
        self.model = Some(model);
        self.tokenizer = Some(tokenizer);
    }

    /// Whether a model is loaded
    pub fn is_loaded(&self) -> bool {
        self.model.is_some() && self.tokenizer.is_some()
    }

    /// Configured inference device
    pub fn device(&self) -> Device {
        self.device
    }

    /// The dataset under inference
    pub fn dataset(&self) -> &TaskDataset {
        &self.dataset
    }

    /// Analyze model computing properties.
    ///
    /// Runs one forward pass with synthetic all-ones input at the model's
    /// maximum position length and reports a fixed-key mapping. Returns an
    /// empty mapping when no model is loaded.
    pub fn analyze_model(&self) -> BTreeMap<String, Value> {
        let mut properties = BTreeMap::new();

        let Some(model) = self.model.as_deref() else {
            return properties;
        };

        let max_positions = model.max_position_embeddings().max(1);
        let ids = ndarray::Array2::from_elem((1, max_positions), 1u32);
        let mask = ndarray::Array2::from_elem((1, max_positions), 1u8);

        let output_shape: Vec<usize> = match model.next_token_logits(&ids, &mask) {
            Ok(logits) => logits.shape().to_vec(),
            Err(_) => vec![],
        };

        properties.insert("input_shape".to_string(), json!([1, max_positions]));
        properties.insert("embedding_size".to_string(), json!(model.hidden_size()));
        properties.insert("output_shape".to_string(), json!(output_shape));
        properties.insert("vocab_size".to_string(), json!(model.vocab_size()));
        properties.insert("max_context_length".to_string(), json!(max_positions));
        properties.insert("num_parameters".to_string(), json!(model.param_count()));
        properties.insert("size_bytes".to_string(), json!(model.size_bytes()));
        properties
    }

    /// Infer the model on a single sample.
    ///
    /// Returns `Ok(None)` when no model is loaded or generation yields an
    /// empty string.
    pub fn infer_sample(&self, sample: &QaRecord) -> Result<Option<String>> {
        if !self.is_loaded() {
            return Ok(None);
        }

        let predictions = self.infer_batch(std::slice::from_ref(sample))?;
        Ok(predictions.into_iter().next().filter(|p| !p.is_empty()))
    }

    /// Infer the model on the whole dataset, pairing each target with its
    /// prediction in dataset order.
    pub fn infer_dataset(&self) -> Result<PredictionsTable> {
        let mut table = PredictionsTable::new();

        for batch in self.dataset.batches(self.batch_size) {
            let predictions = self.infer_batch(batch)?;
            for (record, prediction) in batch.iter().zip(predictions) {
                table.push(record.target.clone(), prediction);
            }
        }

        Ok(table)
    }

    /// Infer the model on a single batch: tokenize with truncation and
    /// left padding to the configured maximum length, generate greedily up
    /// to that length, decode with special tokens stripped, post-process.
    pub fn infer_batch(&self, samples: &[QaRecord]) -> Result<Vec<String>> {
        let model = self.model.as_deref().ok_or(Error::ModelNotLoaded)?;
        let tokenizer = self.tokenizer.as_ref().ok_or(Error::ModelNotLoaded)?;

        let sequences: Vec<Vec<u32>> = samples
            .iter()
            .map(|s| tokenizer.encode(&s.question))
            .collect::<std::result::Result<_, _>>()?;

        let collator = Collator::new(tokenizer.pad_id(), self.max_length);
        let batch = collator.collate(&sequences);

        let continuations = model.generate(&batch, self.max_length, tokenizer.eos_id())?;

        let mut decoded = Vec::with_capacity(samples.len());
        for (i, continuation) in continuations.into_iter().enumerate() {
            let mut full = batch.unpadded_row(i);
            full.extend(continuation);
            let text = tokenizer.decode(&full)?;
            decoded.push(self.post.apply(&text));
        }

        Ok(decoded)
    }
}
