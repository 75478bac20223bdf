//! Composite grounding score for a generated answer

use serde::{Deserialize, Serialize};

use crate::grounding::scorers::{
    compute_citation_coverage, compute_hallucination_safety, compute_retrieval_similarity,
    compute_source_overlap,
};
use crate::types::ScoredPassage;

/// Fixed signal weights: retrieval similarity, citation coverage, source
/// overlap, hallucination safety. Must sum to 1.0. Calibration constant;
/// adjust here and nowhere else.
pub const WEIGHTS: [f32; 4] = [0.4, 0.2, 0.2, 0.2];

/// Calibrated trust estimate for one generated answer.
///
/// Created once per answer, after generation; every field is in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundingResult {
    /// Weighted combination of the four signals
    pub overall_score: f32,
    /// Rank-weighted similarity from vector distances
    pub retrieval_similarity: f32,
    /// Fraction of retrieved sources cited in the answer
    pub citation_coverage: f32,
    /// Lexical overlap between answer and retrieved text
    pub source_overlap: f32,
    /// Inverse hallucination risk (higher = safer)
    pub hallucination_risk: f32,
    /// Categorical confidence label
    pub explanation: String,
}

impl GroundingResult {
    /// Short tier label derived from the overall score
    pub fn tier(&self) -> &'static str {
        if self.overall_score >= 75.0 {
            "High Confidence"
        } else if self.overall_score >= 50.0 {
            "Medium Confidence"
        } else {
            "Low Confidence"
        }
    }
}

/// Compute the composite grounding score for an answer.
///
/// Pure function; call exactly once per answer, after generation, with the
/// same ordered passages and distances used to build the prompt context.
pub fn compute_grounding_score(
    query: &str,
    answer: &str,
    passages: &[ScoredPassage],
    distances: &[f32],
) -> GroundingResult {
    let retrieval_sim = compute_retrieval_similarity(distances);
    let citation_cov = compute_citation_coverage(answer, passages);
    let source_ov = compute_source_overlap(answer, passages, query);
    let hallucination_safe = compute_hallucination_safety(answer);

    let overall = retrieval_sim * WEIGHTS[0]
        + citation_cov * WEIGHTS[1]
        + source_ov * WEIGHTS[2]
        + hallucination_safe * WEIGHTS[3];

    let explanation = if overall < 50.0 {
        "Low confidence: Weak retrieval match or missing citations.".to_string()
    } else if overall < 75.0 {
        "Medium confidence: Good retrieval but partial overlap.".to_string()
    } else {
        "High confidence".to_string()
    };

    GroundingResult {
        overall_score: overall,
        retrieval_similarity: retrieval_sim,
        citation_coverage: citation_cov,
        source_overlap: source_ov,
        hallucination_risk: hallucination_safe,
        explanation,
    }
}
