//! Multi-paper structured synthesis
//!
//! Retrieves a broad (k = 15) slice of the corpus for a topic and asks the
//! model for a structured cross-paper comparison. Independent of the Q&A
//! grounding pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::{AlraError, Result};
use crate::llm::{strip_code_fences, TextGenerator};
use crate::store::VectorStore;

/// Passages retrieved per synthesis request; broad on purpose, synthesis
/// wants diversity across papers rather than the tightest matches
const SYNTHESIS_K: usize = 15;

const SYNTHESIS_PROMPT: &str = r#"You are a research synthesis engine.
Given a collection of excerpts from multiple papers about a topic, your task is to synthesize them into a structured comparison.

Topic: {topic}

Documents:
{context}

Instructions:
1. Identify the distinct papers mentioned (group by [Source: Title] or [Source: Filename]).
2. For EACH paper, extract:
   - Key Claim related to the topic
   - Methodology used
   - Main Result/Finding
3. Identify any contradictions or disagreements between the papers.
4. Write a brief synthesis summary weaving the findings together.

Respond ONLY with valid JSON in this structure:
{
    "comparison": [
        {
            "paper": "Paper Title 1 (or Filename)",
            "claim": "Extracted claim...",
            "method": "Method used...",
            "result": "Key result..."
        }
    ],
    "contradictions": ["Contradiction 1...", "Contradiction 2..."],
    "summary": "A cohesive paragraph summarizing the landscape..."
}
"#;

#[derive(Debug, Deserialize)]
struct RawSynthesis {
    #[serde(default)]
    comparison: Vec<RawComparisonRow>,
    #[serde(default)]
    contradictions: Vec<String>,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawComparisonRow {
    paper: Option<String>,
    #[serde(default)]
    claim: String,
    #[serde(default)]
    method: String,
    #[serde(default)]
    result: String,
}

/// Structured cross-paper comparison for one topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// Paper → key claim
    pub claims_table: BTreeMap<String, String>,
    /// Paper → methodology
    pub method_comparison: BTreeMap<String, String>,
    /// Paper → main result
    pub results_summary: BTreeMap<String, String>,
    /// Cohesive landscape summary
    pub synthesis_summary: String,
    /// Disagreements found across papers
    pub contradictions: Vec<String>,
}

impl SynthesisResult {
    /// Degraded result carrying the failure description instead of content
    fn degraded(error: &str) -> Self {
        Self {
            claims_table: BTreeMap::new(),
            method_comparison: BTreeMap::new(),
            results_summary: BTreeMap::new(),
            synthesis_summary: format!("Error generating synthesis: {error}"),
            contradictions: Vec::new(),
        }
    }
}

/// Synthesizes structured comparisons across papers
pub struct Synthesizer {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn VectorStore>,
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>, store: Arc<dyn VectorStore>) -> Self {
        Self { generator, store }
    }

    /// Synthesize the corpus around a topic.
    ///
    /// Store problems and an unbuilt index propagate as errors; generation
    /// and decode failures degrade to an explanatory result.
    pub async fn synthesize(&self, topic: &str) -> Result<SynthesisResult> {
        if self.store.count().await? == 0 {
            return Err(AlraError::IndexNotReady(
                "no documents indexed; run ingestion first".to_string(),
            ));
        }

        let passages = self.store.search(topic, SYNTHESIS_K).await?;

        let context = passages
            .iter()
            .map(|scored| {
                let p = &scored.passage;
                let label = p
                    .paper_title
                    .clone()
                    .unwrap_or_else(|| p.source_id.clone());
                format!(
                    "--- Paper: {} (Section: {}) ---\n{}\n",
                    label,
                    p.section_type.label().to_lowercase(),
                    p.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = SYNTHESIS_PROMPT
            .replace("{topic}", topic)
            .replace("{context}", &context);

        let raw = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => return Ok(SynthesisResult::degraded(&e.to_string())),
        };

        let parsed: RawSynthesis = match serde_json::from_str(strip_code_fences(&raw)) {
            Ok(p) => p,
            Err(e) => return Ok(SynthesisResult::degraded(&format!("malformed JSON: {e}"))),
        };

        let mut claims = BTreeMap::new();
        let mut methods = BTreeMap::new();
        let mut results = BTreeMap::new();
        for row in parsed.comparison {
            let paper = row.paper.unwrap_or_else(|| "Unknown".to_string());
            claims.insert(paper.clone(), row.claim);
            methods.insert(paper.clone(), row.method);
            results.insert(paper, row.result);
        }

        Ok(SynthesisResult {
            claims_table: claims,
            method_comparison: methods,
            results_summary: results,
            synthesis_summary: parsed.summary,
            contradictions: parsed.contradictions,
        })
    }
}
