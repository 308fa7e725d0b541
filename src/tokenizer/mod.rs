//! Subword Tokenization Module
//!
//! Byte-level BPE tokenization for the inference pipeline. The pipeline pads
//! on the left and aliases the padding token to the end-of-sequence token,
//! so decoder-only models see real tokens in the final position.
//!
//! # Example
//!
//! ```
//! use evaluar::tokenizer::{BpeTokenizer, Tokenizer, TokenizerConfig};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TokenizerConfig::bpe().with_vocab_size(300).with_min_frequency(1);
//!     let mut tokenizer = BpeTokenizer::new(config);
//!
//!     let corpus = vec!["hello world", "hello there"];
//!     tokenizer.train(&corpus)?;
//!
//!     let tokens = tokenizer.encode("hello world")?;
//!     let decoded = tokenizer.decode(&tokens)?;
//!     assert_eq!(decoded, "hello world");
//!     Ok(())
//! }
//! ```

mod bpe;
mod config;
mod error;
mod traits;

pub use bpe::BpeTokenizer;
pub use config::{SpecialTokens, TokenizerConfig};
pub use error::{Result, TokenizerError};
pub use traits::{TokenId, Tokenizer};
