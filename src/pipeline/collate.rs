//! Batching with left padding for decoder-only generation.

use ndarray::Array2;

use crate::tokenizer::TokenId;

/// A tokenized batch.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Input IDs [batch_size, max_seq_len], left-padded
    pub input_ids: Array2<TokenId>,
    /// Attention mask [batch_size, max_seq_len] (1 = attend, 0 = padding)
    pub attention_mask: Array2<u8>,
    /// Original (truncated) sequence lengths
    pub lengths: Vec<usize>,
}

impl Batch {
    /// Get batch size
    pub fn batch_size(&self) -> usize {
        self.input_ids.nrows()
    }

    /// Get maximum sequence length
    pub fn max_seq_len(&self) -> usize {
        self.input_ids.ncols()
    }

    /// Row `i` without padding
    pub fn unpadded_row(&self, i: usize) -> Vec<TokenId> {
        let row = self.input_ids.row(i);
        let mask = self.attention_mask.row(i);
        row.iter()
            .zip(mask.iter())
            .filter(|(_, &m)| m == 1)
            .map(|(&id, _)| id)
            .collect()
    }
}

/// Collator producing left-padded batches.
///
/// Left padding keeps the last position of every row a real token, which is
/// what next-token generation reads. Sequences longer than `max_length` are
/// truncated from the tail.
#[derive(Debug, Clone)]
pub struct Collator {
    /// Padding token ID (the tokenizer's EOS)
    pub pad_token_id: TokenId,
    /// Maximum sequence length
    pub max_length: usize,
}

impl Collator {
    /// Create a collator
    pub fn new(pad_token_id: TokenId, max_length: usize) -> Self {
        Self { pad_token_id, max_length }
    }

    /// Collate token sequences into a batch
    pub fn collate(&self, sequences: &[Vec<TokenId>]) -> Batch {
        if sequences.is_empty() {
            return Batch {
                input_ids: Array2::from_elem((0, 0), self.pad_token_id),
                attention_mask: Array2::zeros((0, 0)),
                lengths: vec![],
            };
        }

        let max_len = sequences
            .iter()
            .map(|s| s.len().min(self.max_length))
            .max()
            .unwrap_or(0);

        let batch_size = sequences.len();
        let mut input_ids = Array2::from_elem((batch_size, max_len), self.pad_token_id);
        let mut attention_mask = Array2::zeros((batch_size, max_len));
        let mut lengths = Vec::with_capacity(batch_size);

        for (i, sequence) in sequences.iter().enumerate() {
            let seq_len = sequence.len().min(self.max_length);
            lengths.push(seq_len);

            let start = max_len - seq_len;
            for (j, &token) in sequence.iter().take(seq_len).enumerate() {
                input_ids[[i, start + j]] = token;
                attention_mask[[i, start + j]] = 1;
            }
        }

        Batch { input_ids, attention_mask, lengths }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collate_left_pads() {
        let collator = Collator::new(2, 8);
        let batch = collator.collate(&[vec![10, 11, 12], vec![20]]);

        assert_eq!(batch.batch_size(), 2);
        assert_eq!(batch.max_seq_len(), 3);
        assert_eq!(batch.input_ids.row(1).to_vec(), vec![2, 2, 20]);
        assert_eq!(batch.attention_mask.row(1).to_vec(), vec![0, 0, 1]);
        assert_eq!(batch.lengths, vec![3, 1]);
    }

    #[test]
    fn test_collate_truncates_to_max_length() {
        let collator = Collator::new(0, 2);
        let batch = collator.collate(&[vec![1, 2, 3, 4]]);

        assert_eq!(batch.max_seq_len(), 2);
        assert_eq!(batch.input_ids.row(0).to_vec(), vec![1, 2]);
        assert_eq!(batch.lengths, vec![2]);
    }

    #[test]
    fn test_collate_empty() {
        let collator = Collator::new(0, 8);
        let batch = collator.collate(&[]);
        assert_eq!(batch.batch_size(), 0);
    }

    #[test]
    fn test_unpadded_row_roundtrip() {
        let collator = Collator::new(9, 8);
        let batch = collator.collate(&[vec![5, 6], vec![7, 8, 9]]);

        assert_eq!(batch.unpadded_row(0), vec![5, 6]);
        // a real token equal to the pad ID is kept: the mask decides
        assert_eq!(batch.unpadded_row(1), vec![7, 8, 9]);
    }
}
