//! Retrieval quality metrics
//!
//! Used by the benchmark harness; both are lexical proxies, not model-based
//! judgments.

use std::collections::HashSet;

use crate::types::ScoredPassage;

/// Recall@K over source identifiers: the fraction of relevant sources that
/// appear among the top K retrieved passages. Empty relevant set yields 0.
pub fn compute_recall_at_k(
    retrieved: &[ScoredPassage],
    relevant_sources: &[String],
    k: usize,
) -> f32 {
    if relevant_sources.is_empty() {
        return 0.0;
    }

    let retrieved_set: HashSet<&str> = retrieved
        .iter()
        .take(k)
        .map(|p| p.passage.source_id.as_str())
        .collect();
    let relevant_set: HashSet<&str> = relevant_sources.iter().map(|s| s.as_str()).collect();

    let hits = relevant_set.intersection(&retrieved_set).count();
    hits as f32 / relevant_set.len() as f32
}

/// Faithfulness proxy in [0, 1]: the fraction of answer words that appear in
/// the context. A real implementation would ask a model whether each
/// statement is supported.
pub fn compute_faithfulness(answer: &str, context: &str) -> f32 {
    let answer_words: HashSet<String> = answer
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();
    if answer_words.is_empty() {
        return 0.0;
    }

    let context_words: HashSet<String> = context
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();

    let overlap = answer_words.intersection(&context_words).count();
    overlap as f32 / answer_words.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RetrievedPassage, SectionType};

    fn passage(source: &str) -> ScoredPassage {
        ScoredPassage {
            passage: RetrievedPassage {
                text: "text".to_string(),
                source_id: source.to_string(),
                page: None,
                section_type: SectionType::Other,
                paper_title: None,
            },
            distance: 0.5,
        }
    }

    #[test]
    fn test_recall_empty_relevant_set() {
        assert_eq!(compute_recall_at_k(&[passage("a.pdf")], &[], 5), 0.0);
    }

    #[test]
    fn test_recall_partial() {
        let retrieved = vec![passage("a.pdf"), passage("b.pdf")];
        let relevant = vec!["a.pdf".to_string(), "c.pdf".to_string()];
        assert_eq!(compute_recall_at_k(&retrieved, &relevant, 5), 0.5);
    }

    #[test]
    fn test_recall_respects_k() {
        let retrieved = vec![passage("a.pdf"), passage("b.pdf")];
        let relevant = vec!["b.pdf".to_string()];
        assert_eq!(compute_recall_at_k(&retrieved, &relevant, 1), 0.0);
        assert_eq!(compute_recall_at_k(&retrieved, &relevant, 2), 1.0);
    }

    #[test]
    fn test_faithfulness_empty_answer() {
        assert_eq!(compute_faithfulness("", "some context"), 0.0);
    }

    #[test]
    fn test_faithfulness_full_overlap() {
        assert_eq!(
            compute_faithfulness("gradient descent", "uses Gradient Descent heavily"),
            1.0
        );
    }

    #[test]
    fn test_faithfulness_partial_overlap() {
        let score = compute_faithfulness("alpha beta", "alpha gamma");
        assert!((score - 0.5).abs() < 1e-6);
    }
}
