//! Tests for the inference pipeline

use ndarray::Array2;

use super::*;
use crate::dataset::{CanonicalTable, QaRecord, TaskDataset};
use crate::tokenizer::{BpeTokenizer, Tokenizer, TokenizerConfig};

fn trained_tokenizer(corpus: &[&str]) -> BpeTokenizer {
    let config = TokenizerConfig::bpe().with_vocab_size(270).with_min_frequency(2);
    let mut tokenizer = BpeTokenizer::new(config);
    tokenizer.train(corpus).unwrap();
    tokenizer
}

fn newline_id(tokenizer: &BpeTokenizer) -> u32 {
    // byte-level vocab: '\n' is the "0a" token
    tokenizer.token_to_id("0a").unwrap()
}

fn dataset(records: &[(&str, &str)]) -> TaskDataset {
    TaskDataset::new(CanonicalTable::new(
        records.iter().map(|(q, t)| QaRecord::new(*q, *t)).collect(),
    ))
}

fn echo_pipeline(records: &[(&str, &str)], batch_size: usize) -> LlmPipeline {
    let questions: Vec<&str> = records.iter().map(|(q, _)| *q).collect();
    let tokenizer = trained_tokenizer(&questions);
    let model = EchoModel::new(newline_id(&tokenizer), tokenizer.vocab_size());

    let mut pipeline = LlmPipeline::new(dataset(records), 120, batch_size, Device::Cpu);
    pipeline.attach(Box::new(model), tokenizer);
    pipeline
}

// =========================================================================
// PostProcess Tests
// =========================================================================

#[test]
fn test_post_process_strips_echo_line() {
    let post = PostProcess::StripEchoLine;
    assert_eq!(post.apply("echo\nanswer"), "answer");
    assert_eq!(post.apply("a\nb\nc"), "b\nc");
}

#[test]
fn test_post_process_no_newline_is_identity() {
    assert_eq!(PostProcess::StripEchoLine.apply("no echo here"), "no echo here");
}

#[test]
fn test_post_process_verbatim() {
    assert_eq!(PostProcess::Verbatim.apply("echo\nanswer"), "echo\nanswer");
}

// =========================================================================
// Unloaded Pipeline Tests
// =========================================================================

#[test]
fn test_analyze_model_unloaded_is_empty() {
    let pipeline = LlmPipeline::new(dataset(&[("q", "t")]), 120, 1, Device::Cpu);
    assert!(!pipeline.is_loaded());
    assert!(pipeline.analyze_model().is_empty());
}

#[test]
fn test_infer_sample_unloaded_is_none() {
    let pipeline = LlmPipeline::new(dataset(&[("q", "t")]), 120, 1, Device::Cpu);
    let sample = QaRecord::new("what is rust", "a language");

    assert_eq!(pipeline.infer_sample(&sample).unwrap(), None);
}

#[test]
fn test_infer_dataset_unloaded_is_error() {
    let pipeline = LlmPipeline::new(dataset(&[("q", "t")]), 120, 1, Device::Cpu);
    assert!(matches!(
        pipeline.infer_dataset(),
        Err(crate::error::Error::ModelNotLoaded)
    ));
}

#[test]
fn test_load_missing_checkpoint_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = LlmPipeline::new(dataset(&[]), 120, 1, Device::Cpu);

    assert!(pipeline.load(dir.path()).is_err());
    assert!(!pipeline.is_loaded());
}

// =========================================================================
// Echo Generation Tests
// =========================================================================

#[test]
fn test_infer_batch_strips_prompt_echo() {
    let records = [
        ("what color is the sky", "blue"),
        ("how many legs has a spider", "eight"),
        ("what is two plus two", "four"),
    ];
    let pipeline = echo_pipeline(&records, 3);

    let samples: Vec<QaRecord> =
        records.iter().map(|(q, t)| QaRecord::new(*q, *t)).collect();
    let predictions = pipeline.infer_batch(&samples).unwrap();

    // the echoed leading line is stripped, leaving the bare question
    let expected: Vec<String> = records.iter().map(|(q, _)| (*q).to_string()).collect();
    assert_eq!(predictions, expected);
}

#[test]
fn test_infer_dataset_pairs_targets_in_order() {
    let records = [
        ("what color is the sky", "blue"),
        ("how many legs has a spider", "eight"),
        ("what is two plus two", "four"),
    ];
    let pipeline = echo_pipeline(&records, 2);

    let table = pipeline.infer_dataset().unwrap();
    assert_eq!(table.len(), 3);

    for (row, (question, target)) in table.rows().iter().zip(records.iter()) {
        assert_eq!(row.target, *target);
        assert_eq!(row.prediction, *question);
    }
}

#[test]
fn test_infer_sample_echo() {
    let records = [("what color is the sky", "blue")];
    let pipeline = echo_pipeline(&records, 1);

    let prediction = pipeline
        .infer_sample(&QaRecord::new("what color is the sky", "blue"))
        .unwrap();
    assert_eq!(prediction.as_deref(), Some("what color is the sky"));
}

#[test]
fn test_infer_sample_empty_generation_is_none() {
    let records = [("", "t")];
    let pipeline = echo_pipeline(&records, 1);

    // empty question: the echo collapses to a bare newline, stripped to ""
    let prediction = pipeline.infer_sample(&QaRecord::new("", "t")).unwrap();
    assert_eq!(prediction, None);
}

#[test]
fn test_analyze_model_properties() {
    let pipeline = echo_pipeline(&[("what color is the sky", "blue")], 1);
    let properties = pipeline.analyze_model();

    assert!(!properties.is_empty());
    assert_eq!(properties["input_shape"], serde_json::json!([1, 16]));
    assert_eq!(properties["max_context_length"], serde_json::json!(16));
    assert_eq!(properties["num_parameters"], serde_json::json!(0));
    assert!(properties.contains_key("vocab_size"));
    assert!(properties.contains_key("output_shape"));
}

// =========================================================================
// Greedy Generation Tests
// =========================================================================

/// Model that emits a fixed token script, then EOS. The script position is
/// the number of columns grown beyond the original prompt width.
struct ScriptedModel {
    script: Vec<u32>,
    eos_id: u32,
    vocab_size: usize,
    base_width: usize,
}

impl CausalModel for ScriptedModel {
    fn next_token_logits(
        &self,
        input_ids: &Array2<u32>,
        _attention_mask: &Array2<u8>,
    ) -> crate::error::Result<Array2<f32>> {
        let n = input_ids.nrows();
        let step = input_ids.ncols() - self.base_width;
        let token = self.script.get(step).copied().unwrap_or(self.eos_id);

        let mut logits = Array2::zeros((n, self.vocab_size));
        for i in 0..n {
            logits[[i, token as usize]] = 1.0;
        }
        Ok(logits)
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }
    fn hidden_size(&self) -> usize {
        1
    }
    fn max_position_embeddings(&self) -> usize {
        8
    }
    fn param_count(&self) -> u64 {
        0
    }
    fn size_bytes(&self) -> u64 {
        0
    }
}

#[test]
fn test_default_generate_follows_argmax_until_eos() {
    let tokenizer = trained_tokenizer(&["ab ab"]);
    let eos = tokenizer.eos_id();

    let a = tokenizer.token_to_id("61").unwrap(); // 'a'
    let b = tokenizer.token_to_id("62").unwrap(); // 'b'

    let collator = Collator::new(tokenizer.pad_id(), 8);
    let batch = collator.collate(&[tokenizer.encode("ab").unwrap()]);

    let model = ScriptedModel {
        script: vec![a, b, a],
        eos_id: eos,
        vocab_size: tokenizer.vocab_size(),
        base_width: batch.max_seq_len(),
    };

    let continuations = model.generate(&batch, 10, eos).unwrap();
    assert_eq!(continuations, vec![vec![a, b, a]]);
}

#[test]
fn test_generate_respects_max_new_tokens() {
    let tokenizer = trained_tokenizer(&["ab ab"]);
    let eos = tokenizer.eos_id();
    let a = tokenizer.token_to_id("61").unwrap();

    let collator = Collator::new(tokenizer.pad_id(), 8);
    let batch = collator.collate(&[tokenizer.encode("ab").unwrap()]);

    let model = ScriptedModel {
        script: vec![a; 100],
        eos_id: eos,
        vocab_size: tokenizer.vocab_size(),
        base_width: batch.max_seq_len(),
    };

    let continuations = model.generate(&batch, 4, eos).unwrap();
    assert_eq!(continuations[0].len(), 4);
}
