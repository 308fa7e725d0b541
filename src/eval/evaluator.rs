//! Task evaluator: computes named metrics over a predictions file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::io::PredictionsTable;

use super::text_gen::{corpus_bleu, mean_rouge_l};

/// Maximum n-gram order for BLEU
const BLEU_MAX_N: usize = 4;

/// Available evaluation metrics.
///
/// Each variant declares the scalar it extracts; there is no branching on
/// metric names at scoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Metric {
    /// Corpus BLEU (4-gram, brevity penalty)
    Bleu,
    /// Mean ROUGE-L F1
    Rouge,
}

impl Metric {
    /// Score parallel (reference, prediction) sequences to one scalar in
    /// [0, 1]. Identical sequences score 1.0.
    pub fn score(&self, references: &[&str], predictions: &[&str]) -> f64 {
        match self {
            Self::Bleu => corpus_bleu(references, predictions, BLEU_MAX_N),
            Self::Rouge => mean_rouge_l(references, predictions),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bleu => write!(f, "bleu"),
            Self::Rouge => write!(f, "rouge"),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bleu" => Ok(Self::Bleu),
            "rouge" | "rougel" | "rouge-l" | "rouge_l" => Ok(Self::Rouge),
            other => Err(Error::UnknownMetric { name: other.to_string() }),
        }
    }
}

/// Compares prediction quality against references using named metrics.
///
/// Metric implementations are resolved once at construction; [`run`]
/// reads the predictions file and computes every metric corpus-wide. A
/// malformed row anywhere fails the whole computation.
///
/// [`run`]: TaskEvaluator::run
pub struct TaskEvaluator {
    data_path: PathBuf,
    metrics: Vec<Metric>,
}

impl TaskEvaluator {
    /// Create an evaluator over a predictions file
    pub fn new(data_path: impl Into<PathBuf>, metrics: Vec<Metric>) -> Self {
        Self { data_path: data_path.into(), metrics }
    }

    /// Create an evaluator from metric names.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownMetric`] for an unrecognized name.
    pub fn from_names(data_path: impl Into<PathBuf>, names: &[String]) -> Result<Self> {
        let metrics = names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<Metric>>>()?;
        Ok(Self::new(data_path, metrics))
    }

    /// Evaluate the predictions against the references.
    ///
    /// Returns a mapping from metric name to its scalar score.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyPredictions`] when the file holds zero rows; CSV
    /// failures propagate as [`Error::Csv`].
    pub fn run(&self) -> Result<BTreeMap<String, f64>> {
        let table = PredictionsTable::read_csv(&self.data_path)?;
        if table.is_empty() {
            return Err(Error::EmptyPredictions { path: self.data_path.clone() });
        }

        let references = table.targets();
        let predictions = table.predictions();

        let mut results = BTreeMap::new();
        for metric in &self.metrics {
            results.insert(metric.to_string(), metric.score(&references, &predictions));
        }
        Ok(results)
    }
}
