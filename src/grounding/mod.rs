//! Grounding/confidence scoring for generated answers
//!
//! Converts raw retrieval signals (vector distances, lexical overlap,
//! citation patterns) into a calibrated trust score.

pub mod aggregator;
pub mod scorers;

pub use aggregator::{compute_grounding_score, GroundingResult};
pub use scorers::{
    compute_citation_coverage, compute_hallucination_safety, compute_retrieval_similarity,
    compute_source_overlap,
};
