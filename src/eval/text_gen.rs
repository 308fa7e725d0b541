//! Text generation scoring functions
//!
//! Corpus BLEU (Papineni et al., 2002) and ROUGE-L F1 over whitespace
//! tokens. Both return values in [0, 1]; identical prediction/reference
//! corpora score 1.0.

use std::collections::HashMap;

/// Compute corpus-level BLEU with modified n-gram precision and brevity
/// penalty, one reference per hypothesis.
///
/// Clipped and total n-gram counts are accumulated over all pairs before
/// the geometric mean. Orders longer than every hypothesis are skipped, so
/// short identical pairs still score 1.0.
///
/// # Arguments
/// * `references` - Reference texts, parallel to `hypotheses`
/// * `hypotheses` - Candidate texts
/// * `max_n` - Maximum n-gram order (typically 4)
pub fn corpus_bleu(references: &[&str], hypotheses: &[&str], max_n: usize) -> f64 {
    if references.is_empty() || references.len() != hypotheses.len() || max_n == 0 {
        return 0.0;
    }

    let ref_tokens: Vec<Vec<&str>> = references
        .iter()
        .map(|r| r.split_whitespace().collect())
        .collect();
    let hyp_tokens: Vec<Vec<&str>> = hypotheses
        .iter()
        .map(|h| h.split_whitespace().collect())
        .collect();

    let mut log_precisions = Vec::new();
    for n in 1..=max_n {
        let mut clipped = 0usize;
        let mut total = 0usize;
        for (r, h) in ref_tokens.iter().zip(&hyp_tokens) {
            let (c, t) = clipped_matches(r, h, n);
            clipped += c;
            total += t;
        }

        if total == 0 {
            // every hypothesis is shorter than n tokens
            continue;
        }
        if clipped == 0 {
            return 0.0;
        }
        log_precisions.push((clipped as f64 / total as f64).ln());
    }

    if log_precisions.is_empty() {
        return 0.0;
    }
    let avg_log_precision: f64 =
        log_precisions.iter().sum::<f64>() / log_precisions.len() as f64;

    // Brevity penalty over corpus lengths
    let hyp_len: usize = hyp_tokens.iter().map(Vec::len).sum();
    let ref_len: usize = ref_tokens.iter().map(Vec::len).sum();
    let bp = if hyp_len == 0 {
        0.0
    } else if hyp_len >= ref_len {
        1.0
    } else {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    };

    bp * avg_log_precision.exp()
}

/// Clipped n-gram matches of one hypothesis against its reference.
fn clipped_matches(reference: &[&str], hypothesis: &[&str], n: usize) -> (usize, usize) {
    let hyp_ngrams = extract_ngrams(hypothesis, n);
    let ref_ngrams = extract_ngrams(reference, n);
    let total: usize = hyp_ngrams.values().sum();

    let mut clipped = 0usize;
    for (ngram, &hyp_count) in &hyp_ngrams {
        let ref_count = ref_ngrams.get(ngram).copied().unwrap_or(0);
        clipped += hyp_count.min(ref_count);
    }

    (clipped, total)
}

/// Extract n-grams from a token sequence and count occurrences.
fn extract_ngrams<'a>(tokens: &[&'a str], n: usize) -> HashMap<Vec<&'a str>, usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            *counts.entry(window.to_vec()).or_insert(0) += 1;
        }
    }
    counts
}

/// Compute ROUGE-L F1 for one pair using longest common subsequence.
///
/// Returns F1 score in [0, 1].
pub fn rouge_l(reference: &str, hypothesis: &str) -> f64 {
    let ref_tokens: Vec<&str> = reference.split_whitespace().collect();
    let hyp_tokens: Vec<&str> = hypothesis.split_whitespace().collect();

    if ref_tokens.is_empty() || hyp_tokens.is_empty() {
        return 0.0;
    }

    let lcs_len = lcs_length(&ref_tokens, &hyp_tokens);

    let precision = lcs_len as f64 / hyp_tokens.len() as f64;
    let recall = lcs_len as f64 / ref_tokens.len() as f64;

    if precision + recall == 0.0 {
        return 0.0;
    }

    2.0 * precision * recall / (precision + recall)
}

/// Mean ROUGE-L F1 over parallel reference/hypothesis sequences.
pub fn mean_rouge_l(references: &[&str], hypotheses: &[&str]) -> f64 {
    if references.is_empty() || references.len() != hypotheses.len() {
        return 0.0;
    }

    let sum: f64 = references
        .iter()
        .zip(hypotheses)
        .map(|(r, h)| rouge_l(r, h))
        .sum();
    sum / references.len() as f64
}

/// Compute length of longest common subsequence.
fn lcs_length(a: &[&str], b: &[&str]) -> usize {
    let n = a.len();
    let m = b.len();
    let mut dp = vec![vec![0usize; m + 1]; n + 1];

    for i in 1..=n {
        for j in 1..=m {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
            } else {
                dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);
            }
        }
    }

    dp[n][m]
}
