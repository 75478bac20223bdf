//! Pure scoring functions over retrieval signals
//!
//! All scorers return values in [0, 100] and take their inputs in the order
//! the vector store returned them; rank position carries meaning.

use std::collections::HashSet;

use crate::types::ScoredPassage;

/// Damping factor applied to distances before the similarity transform
const DISTANCE_DAMPING: f32 = 0.7;

/// Stopwords excluded from the source-overlap token sets
const STOPWORDS: [&str; 13] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
];

/// Marker the generation prompt instructs the model to prepend when
/// pre-generation confidence was low
const WARNING_MARKER: &str = "warning:";

/// Convert nearest-neighbor distances to a 0-100 similarity score.
///
/// Each distance `d` maps to `1 / (1 + 0.7d)`, then a decaying weight
/// schedule over the received rank order is applied: the top few hits
/// dominate, everything past rank three contributes nothing.
pub fn compute_retrieval_similarity(distances: &[f32]) -> f32 {
    if distances.is_empty() {
        return 0.0;
    }

    let sims: Vec<f32> = distances
        .iter()
        .map(|d| 1.0 / (1.0 + d * DISTANCE_DAMPING))
        .collect();

    let weights: Vec<f32> = match sims.len() {
        1 => vec![1.0],
        2 => vec![0.7, 0.3],
        n => {
            let mut w = vec![0.6, 0.3, 0.1];
            w.resize(n, 0.0);
            w
        }
    };

    // Weights already sum to 1 for every branch above; keep the explicit
    // normalization so a schedule change cannot silently skew the average.
    let total: f32 = weights.iter().sum();
    let weighted: f32 = sims
        .iter()
        .zip(weights.iter())
        .map(|(s, w)| s * w / total)
        .sum();

    weighted * 100.0
}

/// Fraction of distinct retrieved sources cited in the answer, as 0-100.
///
/// A source counts as cited when its identifier appears case-insensitively
/// anywhere in the answer text; a forged or absent citation contributes
/// nothing.
pub fn compute_citation_coverage(answer: &str, passages: &[ScoredPassage]) -> f32 {
    if passages.is_empty() {
        return 0.0;
    }

    let available_sources: HashSet<String> = passages
        .iter()
        .map(|p| p.passage.source_id.clone())
        .filter(|s| !s.is_empty())
        .collect();

    if available_sources.is_empty() {
        return 0.0;
    }

    let lower_answer = answer.to_lowercase();
    let cited_count = available_sources
        .iter()
        .filter(|src| lower_answer.contains(&src.to_lowercase()))
        .count();

    let coverage = cited_count as f32 / available_sources.len() as f32;
    (coverage * 100.0).min(100.0)
}

/// Lexical overlap between the answer's substantive vocabulary and the top-3
/// retrieved passages, as 0-100.
///
/// Query tokens and stopwords are removed from the answer token set first,
/// so an answer cannot score well purely by echoing the question.
pub fn compute_source_overlap(answer: &str, passages: &[ScoredPassage], query: &str) -> f32 {
    if passages.is_empty() {
        return 0.0;
    }

    let combined_source_text: String = passages
        .iter()
        .take(3)
        .map(|p| p.passage.text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let answer_tokens = word_tokens(answer);
    let source_tokens = word_tokens(&combined_source_text);
    let query_tokens = word_tokens(query);

    let relevant_answer_tokens: HashSet<&String> = answer_tokens
        .iter()
        .filter(|t| !STOPWORDS.contains(&t.as_str()) && !query_tokens.contains(*t))
        .collect();

    if relevant_answer_tokens.is_empty() {
        return 0.0;
    }

    let overlap_count = relevant_answer_tokens
        .iter()
        .filter(|t| source_tokens.contains(**t))
        .count();

    let overlap_ratio = overlap_count as f32 / relevant_answer_tokens.len() as f32;
    (overlap_ratio * 100.0).min(100.0)
}

/// Binary self-declared-hallucination heuristic: 20 when the answer opens
/// with the warning marker, 100 otherwise.
///
/// Only the first ~50 characters are inspected; this penalizes the model's
/// own low-confidence declaration, not post-hoc fabrication.
pub fn compute_hallucination_safety(answer: &str) -> f32 {
    let head: String = answer.to_lowercase().chars().take(50).collect();
    if head.contains(WARNING_MARKER) {
        20.0
    } else {
        100.0
    }
}

/// Lowercase word tokens (alphanumeric runs) of a text
fn word_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RetrievedPassage, SectionType};

    fn passage(source: &str, text: &str) -> ScoredPassage {
        ScoredPassage {
            passage: RetrievedPassage {
                text: text.to_string(),
                source_id: source.to_string(),
                page: Some(1),
                section_type: SectionType::Other,
                paper_title: None,
            },
            distance: 0.5,
        }
    }

    #[test]
    fn test_retrieval_similarity_empty() {
        assert_eq!(compute_retrieval_similarity(&[]), 0.0);
    }

    #[test]
    fn test_retrieval_similarity_single_result() {
        // d=0 -> s=1.0, weight [1.0] -> 100
        let score = compute_retrieval_similarity(&[0.0]);
        assert!((score - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_retrieval_similarity_two_results() {
        // s = [1/(1+0.07), 1/(1+0.7)] weighted [0.7, 0.3]
        let score = compute_retrieval_similarity(&[0.1, 1.0]);
        let expected = (0.7 / 1.07 + 0.3 / 1.7) * 100.0;
        assert!((score - expected).abs() < 0.01);
    }

    #[test]
    fn test_retrieval_similarity_reference_scenario() {
        // distances [0.1, 0.5, 1.2] -> sims ~[0.934, 0.741, 0.543],
        // weights [0.6, 0.3, 0.1] -> ~83.6
        let score = compute_retrieval_similarity(&[0.1, 0.5, 1.2]);
        assert!((score - 83.6).abs() < 0.2, "got {score}");
    }

    #[test]
    fn test_retrieval_similarity_long_tail_ignored() {
        let head = compute_retrieval_similarity(&[0.1, 0.5, 1.2]);
        let with_tail = compute_retrieval_similarity(&[0.1, 0.5, 1.2, 9.0, 50.0]);
        assert!((head - with_tail).abs() < 1e-4);
    }

    #[test]
    fn test_citation_coverage_empty_docs() {
        assert_eq!(compute_citation_coverage("any answer", &[]), 0.0);
    }

    #[test]
    fn test_citation_coverage_half_cited() {
        let passages = vec![passage("A.pdf", "text"), passage("B.pdf", "text")];
        let answer = "According to A.pdf the method converges.";
        assert_eq!(compute_citation_coverage(answer, &passages), 50.0);
    }

    #[test]
    fn test_citation_coverage_case_insensitive() {
        let passages = vec![passage("Paper.PDF", "text")];
        let answer = "see [Source: paper.pdf]";
        assert_eq!(compute_citation_coverage(answer, &passages), 100.0);
    }

    #[test]
    fn test_citation_coverage_duplicate_sources_counted_once() {
        let passages = vec![
            passage("A.pdf", "chunk one"),
            passage("A.pdf", "chunk two"),
            passage("B.pdf", "chunk three"),
        ];
        let answer = "A.pdf says so.";
        assert_eq!(compute_citation_coverage(answer, &passages), 50.0);
    }

    #[test]
    fn test_source_overlap_empty_docs() {
        assert_eq!(compute_source_overlap("answer", &[], "query"), 0.0);
    }

    #[test]
    fn test_source_overlap_query_echo_scores_zero() {
        let passages = vec![passage("A.pdf", "transformers use attention layers")];
        // Answer made purely of query words and stopwords
        let score = compute_source_overlap(
            "the transformers attention",
            &passages,
            "what do transformers attention do",
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_source_overlap_full_match() {
        let passages = vec![passage("A.pdf", "gradient descent converges slowly here")];
        let score = compute_source_overlap(
            "descent converges slowly",
            &passages,
            "how fast is training",
        );
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_source_overlap_only_top_three_passages() {
        let passages = vec![
            passage("A.pdf", "alpha"),
            passage("B.pdf", "beta"),
            passage("C.pdf", "gamma"),
            passage("D.pdf", "delta"),
        ];
        // "delta" only appears in the fourth passage, which is out of scope
        let score = compute_source_overlap("delta", &passages, "unrelated query");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_hallucination_safety_warning_prefix() {
        let answer = "Warning: The available documents do not contain a strong match";
        assert_eq!(compute_hallucination_safety(answer), 20.0);
    }

    #[test]
    fn test_hallucination_safety_clean_answer() {
        assert_eq!(compute_hallucination_safety("The method uses attention."), 100.0);
    }

    #[test]
    fn test_hallucination_safety_late_warning_ignored() {
        let mut answer = "A".repeat(60);
        answer.push_str(" warning: something");
        assert_eq!(compute_hallucination_safety(&answer), 100.0);
    }
}
