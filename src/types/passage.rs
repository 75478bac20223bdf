//! Passage types produced by the vector store and consumed by the
//! answer engine, grounding scorers and synthesis.

use serde::{Deserialize, Serialize};

/// Coarse semantic role of a passage within a research paper.
///
/// Assigned at ingest time by the section classifier; advisory metadata for
/// prompt construction and synthesis grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    /// Goals, problem statement, hypothesis
    Objective,
    /// Methods, data, setup, algorithms
    Methodology,
    /// Findings, tables, metrics, performance
    Results,
    /// Arguments, main contributions, discussion
    Claims,
    /// Weaknesses, future work
    Limitations,
    /// References, headers, boilerplate
    Other,
}

impl SectionType {
    /// Uppercase label used in context headers, e.g. `[Section: RESULTS]`
    pub fn label(&self) -> &'static str {
        match self {
            SectionType::Objective => "OBJECTIVE",
            SectionType::Methodology => "METHODOLOGY",
            SectionType::Results => "RESULTS",
            SectionType::Claims => "CLAIMS",
            SectionType::Limitations => "LIMITATIONS",
            SectionType::Other => "OTHER",
        }
    }

    /// Parse a classifier response string, defaulting to `Other`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "objective" => SectionType::Objective,
            "methodology" => SectionType::Methodology,
            "results" => SectionType::Results,
            "claims" => SectionType::Claims,
            "limitations" => SectionType::Limitations,
            _ => SectionType::Other,
        }
    }
}

impl Default for SectionType {
    fn default() -> Self {
        SectionType::Other
    }
}

/// A chunk of paper text as retrieved from the vector store.
///
/// Immutable once retrieved; scoped to a single query's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Chunk text
    pub text: String,
    /// Originating file name, e.g. "attention.pdf"
    pub source_id: String,
    /// Page number within the source, when known
    pub page: Option<u32>,
    /// Semantic section tag assigned at ingest
    #[serde(default)]
    pub section_type: SectionType,
    /// Paper title extracted by the classifier, when found
    pub paper_title: Option<String>,
}

/// A retrieved passage paired with its nearest-neighbor distance.
///
/// Distance is non-negative; lower means more similar. Ordering as received
/// from the store matters for the rank-weighted scorers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub passage: RetrievedPassage,
    pub distance: f32,
}
