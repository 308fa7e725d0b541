//! Evaluation metrics and the task evaluator
//!
//! Reference-based text-similarity scoring for generated answers:
//! corpus BLEU and ROUGE-L F1, aggregated to one scalar per metric.

mod evaluator;
mod text_gen;


pub use evaluator::{Metric, TaskEvaluator};
pub use text_gen::{corpus_bleu, mean_rouge_l, rouge_l};
