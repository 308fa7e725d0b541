//! Causal language model trait and test doubles.

use ndarray::Array2;

use crate::error::Result;
use crate::tokenizer::TokenId;

use super::collate::Batch;

/// Inference device. Placement is a static choice made once at pipeline
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// Host CPU
    #[default]
    Cpu,
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
        }
    }
}

/// A loaded causal language model, used read-only across sequential batch
/// calls. There is no gradient path anywhere behind this trait.
pub trait CausalModel: Send + Sync {
    /// Logits for the next token of every row: [batch_size, vocab_size].
    ///
    /// Rows are left-padded, so the last column is each row's most recent
    /// real token.
    fn next_token_logits(
        &self,
        input_ids: &Array2<TokenId>,
        attention_mask: &Array2<u8>,
    ) -> Result<Array2<f32>>;

    /// Vocabulary size
    fn vocab_size(&self) -> usize;

    /// Embedding width
    fn hidden_size(&self) -> usize;

    /// Maximum context length
    fn max_position_embeddings(&self) -> usize;

    /// Total parameter count
    fn param_count(&self) -> u64;

    /// On-disk model size in bytes
    fn size_bytes(&self) -> u64;

    /// Greedy generation: per row, up to `max_new_tokens` continuation
    /// tokens, stopping at `eos_id`. Returns continuations only (EOS
    /// excluded), in batch order.
    fn generate(
        &self,
        batch: &Batch,
        max_new_tokens: usize,
        eos_id: TokenId,
    ) -> Result<Vec<Vec<TokenId>>> {
        let n = batch.batch_size();
        if n == 0 || batch.max_seq_len() == 0 {
            return Ok(vec![Vec::new(); n]);
        }

        let mut ids = batch.input_ids.clone();
        let mut mask = batch.attention_mask.clone();
        let ones = vec![1u8; n];
        let mut finished = vec![false; n];
        let mut continuations: Vec<Vec<TokenId>> = vec![Vec::new(); n];

        for _ in 0..max_new_tokens {
            if finished.iter().all(|&f| f) {
                break;
            }

            let logits = self.next_token_logits(&ids, &mask)?;

            let mut next = Vec::with_capacity(n);
            for i in 0..n {
                let token = if finished[i] {
                    eos_id
                } else {
                    let picked = argmax(logits.row(i).iter().copied());
                    if picked == eos_id {
                        finished[i] = true;
                    } else {
                        continuations[i].push(picked);
                    }
                    picked
                };
                next.push(token);
            }

            ids = append_column(&ids, &next);
            mask = append_column(&mask, &ones);
        }

        Ok(continuations)
    }
}

/// Index of the maximum logit; ties resolve to the first index.
fn argmax(logits: impl Iterator<Item = f32>) -> TokenId {
    let mut best = 0usize;
    let mut best_value = f32::NEG_INFINITY;
    for (i, value) in logits.enumerate() {
        if value > best_value {
            best_value = value;
            best = i;
        }
    }
    best as TokenId
}

fn append_column<T: Copy>(array: &Array2<T>, column: &[T]) -> Array2<T> {
    let (rows, cols) = array.dim();
    Array2::from_shape_fn((rows, cols + 1), |(i, j)| {
        if j < cols {
            array[[i, j]]
        } else {
            column[i]
        }
    })
}

/// Deterministic test double: replies with a newline followed by the
/// prompt itself, which is exactly the echo shape the pipeline's
/// post-processing strips.
pub struct EchoModel {
    newline_id: TokenId,
    vocab_size: usize,
}

impl EchoModel {
    /// Create an echo model. `newline_id` must be the tokenizer's ID for
    /// the `\n` byte.
    pub fn new(newline_id: TokenId, vocab_size: usize) -> Self {
        Self { newline_id, vocab_size }
    }
}

impl CausalModel for EchoModel {
    fn next_token_logits(
        &self,
        input_ids: &Array2<TokenId>,
        _attention_mask: &Array2<u8>,
    ) -> Result<Array2<f32>> {
        Ok(Array2::zeros((input_ids.nrows(), self.vocab_size)))
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn hidden_size(&self) -> usize {
        1
    }

    fn max_position_embeddings(&self) -> usize {
        16
    }

    fn param_count(&self) -> u64 {
        0
    }

    fn size_bytes(&self) -> u64 {
        0
    }

    fn generate(
        &self,
        batch: &Batch,
        max_new_tokens: usize,
        _eos_id: TokenId,
    ) -> Result<Vec<Vec<TokenId>>> {
        let continuations = (0..batch.batch_size())
            .map(|i| {
                let mut tokens = vec![self.newline_id];
                tokens.extend(batch.unpadded_row(i));
                tokens.truncate(max_new_tokens);
                tokens
            })
            .collect();
        Ok(continuations)
    }
}
