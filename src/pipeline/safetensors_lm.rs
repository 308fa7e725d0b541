//! SafeTensors-backed causal language model.
//!
//! Loads a checkpoint directory containing `model.safetensors` (and an
//! optional `config.json` for the maximum context length) and scores next
//! tokens with the tied token-embedding matrix. This is the smallest model
//! shape that exercises the full tokenize/generate/decode path; anything
//! richer plugs in behind [`CausalModel`].

use std::path::Path;

use ndarray::{Array1, Array2};
use safetensors::SafeTensors;

use crate::error::{Error, Result};
use crate::tokenizer::TokenId;

use super::model::CausalModel;

/// Tensor names probed for the token-embedding matrix, most specific first.
const EMBEDDING_CANDIDATES: [&str; 3] = [
    "model.embed_tokens.weight",
    "transformer.wte.weight",
    "embeddings.word_embeddings.weight",
];

/// Default maximum context when the checkpoint carries no config.json
const DEFAULT_MAX_POSITIONS: usize = 512;

/// Tied-embedding causal LM loaded from a SafeTensors checkpoint.
pub struct SafeTensorsLm {
    /// Token embeddings [vocab_size, hidden_size]
    embedding: Array2<f32>,
    max_positions: usize,
    param_count: u64,
    size_bytes: u64,
}

impl SafeTensorsLm {
    /// Load a model from a checkpoint directory.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] when `model.safetensors` is absent,
    /// [`Error::SafeTensorsParse`] on a malformed payload,
    /// [`Error::MissingEmbedding`] when no embedding matrix is found.
    pub fn load(dir: &Path) -> Result<Self> {
        let model_path = dir.join("model.safetensors");
        if !model_path.exists() {
            return Err(Error::FileNotFound {
                dir: dir.to_path_buf(),
                file: "model.safetensors".to_string(),
            });
        }

        let data = std::fs::read(&model_path)?;
        let size_bytes = data.len() as u64;

        let tensors = SafeTensors::deserialize(&data)
            .map_err(|e| Error::SafeTensorsParse { message: e.to_string() })?;

        let mut param_count: u64 = 0;
        for name in tensors.names() {
            if let Ok(view) = tensors.tensor(name) {
                let numel: u64 = view.shape().iter().map(|&x| x as u64).product();
                param_count += numel;
            }
        }

        let embedding = find_embedding(&tensors)?;
        let max_positions = read_max_positions(dir).unwrap_or(DEFAULT_MAX_POSITIONS);

        Ok(Self { embedding, max_positions, param_count, size_bytes })
    }

    /// Build a model directly from an embedding matrix. Test seam.
    pub fn from_embedding(embedding: Array2<f32>, max_positions: usize) -> Self {
        let param_count = embedding.len() as u64;
        let size_bytes = param_count * std::mem::size_of::<f32>() as u64;
        Self { embedding, max_positions, param_count, size_bytes }
    }
}

impl CausalModel for SafeTensorsLm {
    fn next_token_logits(
        &self,
        input_ids: &Array2<TokenId>,
        _attention_mask: &Array2<u8>,
    ) -> Result<Array2<f32>> {
        let vocab = self.embedding.nrows();
        let n = input_ids.nrows();
        let last = input_ids.ncols().saturating_sub(1);
        let mut logits = Array2::zeros((n, vocab));

        for i in 0..n {
            // Left padding: the last column is the most recent real token.
            // A fully padded row scores from the pad token like any other.
            let token = input_ids[[i, last]] as usize;
            let token = if token < vocab { token } else { 0 };

            let h: Array1<f32> = self.embedding.row(token).to_owned();
            let row = self.embedding.dot(&h);
            logits.row_mut(i).assign(&row);
        }

        Ok(logits)
    }

    fn vocab_size(&self) -> usize {
        self.embedding.nrows()
    }

    fn hidden_size(&self) -> usize {
        self.embedding.ncols()
    }

    fn max_position_embeddings(&self) -> usize {
        self.max_positions
    }

    fn param_count(&self) -> u64 {
        self.param_count
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Locate the token-embedding matrix by conventional names, falling back to
/// the first 2-D tensor that is taller than it is wide.
fn find_embedding(tensors: &SafeTensors<'_>) -> Result<Array2<f32>> {
    for name in EMBEDDING_CANDIDATES {
        if let Ok(view) = tensors.tensor(name) {
            return tensor_to_array(name, &view);
        }
    }

    // names() order is unspecified; sort so the fallback pick is stable
    let mut names = tensors.names();
    names.sort_unstable();
    for name in names {
        if let Ok(view) = tensors.tensor(name) {
            let shape = view.shape();
            if shape.len() == 2 && shape[0] > shape[1] {
                return tensor_to_array(name, &view);
            }
        }
    }

    Err(Error::MissingEmbedding {
        candidates: EMBEDDING_CANDIDATES.iter().map(|s| (*s).to_string()).collect(),
    })
}

fn tensor_to_array(name: &str, view: &safetensors::tensor::TensorView<'_>) -> Result<Array2<f32>> {
    if view.dtype() != safetensors::Dtype::F32 {
        return Err(Error::UnsupportedDtype {
            tensor: name.to_string(),
            dtype: format!("{:?}", view.dtype()),
        });
    }
    let shape = view.shape();
    if shape.len() != 2 {
        return Err(Error::SafeTensorsParse {
            message: format!("tensor '{name}' is not 2-D: {shape:?}"),
        });
    }

    let floats: Vec<f32> = view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Array2::from_shape_vec((shape[0], shape[1]), floats)
        .map_err(|e| Error::SafeTensorsParse { message: e.to_string() })
}

/// Read `max_position_embeddings` from the checkpoint's config.json
fn read_max_positions(dir: &Path) -> Option<usize> {
    let text = std::fs::read_to_string(dir.join("config.json")).ok()?;
    let value: serde_json::Value = serde_json::from_str(&text).ok()?;
    value
        .get("max_position_embeddings")
        .and_then(serde_json::Value::as_u64)
        .map(|v| v as usize)
}
