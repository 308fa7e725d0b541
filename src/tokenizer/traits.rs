//! Tokenizer trait definition.

use super::error::Result;

/// Token ID type
pub type TokenId = u32;

/// Tokenizer trait
///
/// Causal-LM convention throughout: there is no dedicated padding token,
/// `pad_id` is aliased to `eos_id`.
pub trait Tokenizer: Send + Sync {
    /// Encode text to token IDs
    fn encode(&self, text: &str) -> Result<Vec<TokenId>>;

    /// Decode token IDs to text, skipping special tokens
    fn decode(&self, ids: &[TokenId]) -> Result<String>;

    /// Get vocabulary size
    fn vocab_size(&self) -> usize;

    /// Get token for ID
    fn id_to_token(&self, id: TokenId) -> Option<&str>;

    /// Get ID for token
    fn token_to_id(&self, token: &str) -> Option<TokenId>;

    /// End-of-sequence token ID
    fn eos_id(&self) -> TokenId;

    /// Padding token ID (same as the EOS ID)
    fn pad_id(&self) -> TokenId {
        self.eos_id()
    }
}
