//! BPE (Byte Pair Encoding) tokenizer implementation.
//!
//! Byte-level: the base vocabulary is the 256 single bytes (hex-encoded),
//! so encode/decode round-trips any UTF-8 text exactly.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::TokenizerConfig;
use super::error::{Result, TokenizerError};
use super::traits::{TokenId, Tokenizer};

/// BPE (Byte Pair Encoding) tokenizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BpeTokenizer {
    config: TokenizerConfig,
    /// Token to ID mapping
    vocab: HashMap<String, TokenId>,
    /// ID to token mapping
    id_to_token_map: HashMap<TokenId, String>,
    /// Merge rules (pair -> merged token)
    merges: Vec<(String, String)>,
    /// Whether the tokenizer is trained
    trained: bool,
}

impl BpeTokenizer {
    /// Create a new BPE tokenizer
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            vocab: HashMap::new(),
            id_to_token_map: HashMap::new(),
            merges: Vec::new(),
            trained: false,
        }
    }

    /// Initialize vocabulary with special tokens and bytes
    fn init_vocab(&mut self) {
        let mut id: TokenId = 0;

        // Special tokens first, so their IDs are stable: unk=0, bos=1, eos=2
        let special = [
            &self.config.special_tokens.unk,
            &self.config.special_tokens.bos,
            &self.config.special_tokens.eos,
        ];

        for token in special {
            self.vocab.insert(token.clone(), id);
            self.id_to_token_map.insert(id, token.clone());
            id += 1;
        }

        // Add all single bytes as base vocabulary
        for byte in 0..=255u8 {
            let token = format!("{byte:02x}");
            if !self.vocab.contains_key(&token) {
                self.vocab.insert(token.clone(), id);
                self.id_to_token_map.insert(id, token);
                id += 1;
            }
        }
    }

    /// Train the tokenizer on a corpus of texts
    pub fn train(&mut self, corpus: &[&str]) -> Result<()> {
        self.init_vocab();

        let mut tokenized: Vec<Vec<String>> = corpus
            .iter()
            .map(|text| {
                let t = if self.config.lowercase {
                    text.to_lowercase()
                } else {
                    text.to_string()
                };
                self.to_bytes(&t)
            })
            .collect();

        // Learn merges until we reach target vocab size
        let target = self.config.vocab_size;
        while self.vocab.len() < target {
            let freqs = self.get_pair_freqs(&tokenized);

            let best = freqs
                .iter()
                .filter(|(_, &count)| count >= self.config.min_frequency)
                .max_by_key(|(_, count)| *count);

            match best {
                Some((pair, _)) => {
                    let merged = format!("{}{}", pair.0, pair.1);

                    let id = self.vocab.len() as TokenId;
                    self.vocab.insert(merged.clone(), id);
                    self.id_to_token_map.insert(id, merged.clone());

                    self.merges.push(pair.clone());
                    self.merge_pair(&mut tokenized, pair, &merged);
                }
                None => break, // No more pairs meet frequency threshold
            }
        }

        self.trained = true;
        Ok(())
    }

    /// Get pair frequencies from tokenized corpus
    fn get_pair_freqs(&self, tokenized: &[Vec<String>]) -> HashMap<(String, String), usize> {
        let mut freqs = HashMap::new();

        for tokens in tokenized {
            for pair in tokens.windows(2) {
                let key = (pair[0].clone(), pair[1].clone());
                *freqs.entry(key).or_insert(0) += 1;
            }
        }

        freqs
    }

    /// Merge the most frequent pair
    fn merge_pair(&self, tokenized: &mut [Vec<String>], pair: &(String, String), merged: &str) {
        for tokens in tokenized.iter_mut() {
            let mut i = 0;
            while i < tokens.len().saturating_sub(1) {
                if tokens[i] == pair.0 && tokens[i + 1] == pair.1 {
                    tokens[i] = merged.to_string();
                    tokens.remove(i + 1);
                }
                i += 1;
            }
        }
    }

    /// Tokenize text to bytes (initial tokenization)
    fn to_bytes(&self, text: &str) -> Vec<String> {
        text.as_bytes().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Apply all learned merges
    fn apply_merges(&self, mut tokens: Vec<String>) -> Vec<String> {
        for (a, b) in &self.merges {
            let merged = format!("{a}{b}");
            let mut i = 0;
            while i < tokens.len().saturating_sub(1) {
                if &tokens[i] == a && &tokens[i + 1] == b {
                    tokens[i] = merged.clone();
                    tokens.remove(i + 1);
                } else {
                    i += 1;
                }
            }
        }
        tokens
    }

    /// Save tokenizer to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TokenizerError::Serialization(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load tokenizer from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| TokenizerError::Serialization(e.to_string()))
    }

    /// Whether the tokenizer has a trained vocabulary
    pub fn is_trained(&self) -> bool {
        self.trained
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>> {
        if !self.trained {
            return Err(TokenizerError::NotTrained);
        }

        let processed = if self.config.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens = self.to_bytes(&processed);
        let tokens = self.apply_merges(tokens);

        let unk_id = self
            .vocab
            .get(&self.config.special_tokens.unk)
            .copied()
            .unwrap_or(0);

        let ids: Vec<TokenId> = tokens
            .iter()
            .map(|t| *self.vocab.get(t).unwrap_or(&unk_id))
            .collect();

        Ok(ids)
    }

    fn decode(&self, ids: &[TokenId]) -> Result<String> {
        if !self.trained {
            return Err(TokenizerError::NotTrained);
        }

        let mut hex_string = String::new();

        for &id in ids {
            if let Some(token) = self.id_to_token_map.get(&id) {
                // Skip special tokens (pad/eos included)
                if token.starts_with('<') && token.ends_with('>') {
                    continue;
                }
                hex_string.push_str(token);
            }
        }

        // Convert hex string back to bytes
        let bytes: Vec<u8> = (0..hex_string.len())
            .step_by(2)
            .filter_map(|i| {
                if i + 2 <= hex_string.len() {
                    u8::from_str_radix(&hex_string[i..i + 2], 16).ok()
                } else {
                    None
                }
            })
            .collect();

        String::from_utf8(bytes).map_err(|e| TokenizerError::Decoding(e.to_string()))
    }

    fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    fn id_to_token(&self, id: TokenId) -> Option<&str> {
        self.id_to_token_map.get(&id).map(String::as_str)
    }

    fn token_to_id(&self, token: &str) -> Option<TokenId> {
        self.vocab.get(token).copied()
    }

    fn eos_id(&self) -> TokenId {
        self.vocab
            .get(&self.config.special_tokens.eos)
            .copied()
            .unwrap_or(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TokenizerConfig {
        TokenizerConfig::bpe().with_vocab_size(300).with_min_frequency(1)
    }

    #[test]
    fn test_bpe_new() {
        let tokenizer = BpeTokenizer::new(TokenizerConfig::bpe());
        assert!(!tokenizer.is_trained());
    }

    #[test]
    fn test_bpe_train() {
        let mut tokenizer = BpeTokenizer::new(small_config());

        let corpus = vec!["hello hello", "hello world", "world hello"];
        tokenizer.train(&corpus).unwrap();

        assert!(tokenizer.is_trained());
        assert!(tokenizer.vocab_size() > 256); // Base bytes + some merges
    }

    #[test]
    fn test_bpe_encode_not_trained() {
        let tokenizer = BpeTokenizer::new(TokenizerConfig::bpe());
        assert!(tokenizer.encode("hello").is_err());
    }

    #[test]
    fn test_bpe_encode_decode() {
        let mut tokenizer = BpeTokenizer::new(small_config());

        let corpus = vec!["hello world", "hello there"];
        tokenizer.train(&corpus).unwrap();

        let text = "hello";
        let encoded = tokenizer.encode(text).unwrap();
        let decoded = tokenizer.decode(&encoded).unwrap();

        assert_eq!(decoded, text);
    }

    #[test]
    fn test_bpe_decode_skips_specials() {
        let mut tokenizer = BpeTokenizer::new(small_config());
        tokenizer.train(&["abc abc"]).unwrap();

        let mut ids = tokenizer.encode("abc").unwrap();
        ids.push(tokenizer.eos_id());
        ids.push(tokenizer.pad_id());

        assert_eq!(tokenizer.decode(&ids).unwrap(), "abc");
    }

    #[test]
    fn test_bpe_pad_aliased_to_eos() {
        let mut tokenizer = BpeTokenizer::new(small_config());
        tokenizer.train(&["x"]).unwrap();

        assert_eq!(tokenizer.pad_id(), tokenizer.eos_id());
        assert_eq!(tokenizer.id_to_token(tokenizer.eos_id()), Some("</s>"));
    }

    #[test]
    fn test_bpe_newline_is_encodable() {
        let mut tokenizer = BpeTokenizer::new(small_config());
        tokenizer.train(&["a\nb"]).unwrap();

        let decoded = tokenizer
            .decode(&tokenizer.encode("a\nb").unwrap())
            .unwrap();
        assert_eq!(decoded, "a\nb");
    }

    #[test]
    fn test_bpe_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");

        let mut tokenizer = BpeTokenizer::new(small_config());
        tokenizer.train(&["hello world"]).unwrap();
        tokenizer.save(&path).unwrap();

        let loaded = BpeTokenizer::load(&path).unwrap();
        assert!(loaded.is_trained());
        assert_eq!(
            loaded.encode("hello world").unwrap(),
            tokenizer.encode("hello world").unwrap()
        );
    }

    #[test]
    fn test_bpe_id_to_token() {
        let mut tokenizer = BpeTokenizer::new(small_config());
        tokenizer.train(&["test"]).unwrap();

        // ID 0 should be <unk>
        assert_eq!(tokenizer.id_to_token(0), Some("<unk>"));
        assert_eq!(tokenizer.token_to_id("<unk>"), Some(0));
    }
}
