//! Retrieval-augmented answer engine
//!
//! One query runs strictly sequential stages: reasoning expansion →
//! retrieval → context assembly → generation → grounding scoring → logging.
//! The grounding score is computed exactly once per answer, on the same
//! ordered passages and distances used to build the prompt.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::{AlraError, Result};
use crate::evaluation::InteractionLogger;
use crate::grounding::{compute_grounding_score, compute_retrieval_similarity, GroundingResult};
use crate::llm::TextGenerator;
use crate::reasoning::{QueryExpander, ReasoningResult};
use crate::store::VectorStore;
use crate::types::ScoredPassage;

const ANSWER_PROMPT: &str = r#"You are a Research Analysis Agent.
context_match_score: {pre_gen_confidence}%
{reasoning_info}

Instructions:
1. Answer the user's question using ONLY the provided context.
2. Pay attention to the [Section: TYPE] tags in the context to understand if the information comes from Results, Methodology, etc.
3. If 'context_match_score' is below 50%, start your answer with: 'Warning: The available documents do not contain a strong match for this query, but based on partial information...'
4. Reference your sources using the [Source: filename] format provided in the context.
5. If reasoning keywords were provided, ensure your answer addresses the broader context they suggest.

Context:
{context}

Question:
{question}
"#;

/// Answer engine configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Passages retrieved per query
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Complete outcome of one answered query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub query: String,
    pub answer: String,
    pub grounding: GroundingResult,
    pub reasoning: ReasoningResult,
    /// Passages in retrieval order, as used for the prompt and the scores
    pub passages: Vec<ScoredPassage>,
}

/// Retrieval-augmented answer engine
pub struct AnswerEngine {
    expander: QueryExpander,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn VectorStore>,
    logger: Option<InteractionLogger>,
    config: EngineConfig,
}

impl AnswerEngine {
    pub fn new(
        expander: QueryExpander,
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            expander,
            generator,
            store,
            logger: None,
            config: EngineConfig::default(),
        }
    }

    /// Log each completed query (written once, after scoring)
    pub fn with_logger(mut self, logger: InteractionLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Answer a question grounded in the indexed corpus.
    ///
    /// Fails with [`AlraError::IndexNotReady`] before any model call when no
    /// index has been built; generation failures surface to the caller
    /// (single attempt, no retry).
    pub async fn answer(&self, query: &str) -> Result<AnswerResult> {
        if self.store.count().await? == 0 {
            return Err(AlraError::IndexNotReady(
                "no documents indexed; run ingestion first".to_string(),
            ));
        }

        let reasoning = self.expander.expand(query).await;

        let passages = self
            .store
            .search(reasoning.search_query(), self.config.top_k)
            .await?;

        let distances: Vec<f32> = passages.iter().map(|p| p.distance).collect();
        let pre_gen_confidence = compute_retrieval_similarity(&distances);

        let prompt = build_prompt(query, &reasoning, &passages, pre_gen_confidence);

        let answer = self
            .generator
            .generate(&prompt)
            .await
            .map_err(AlraError::Generation)?;

        let grounding = compute_grounding_score(query, &answer, &passages, &distances);

        if let Some(logger) = &self.logger {
            logger.append(query, &answer, &grounding)?;
        }

        Ok(AnswerResult {
            query: query.to_string(),
            answer,
            grounding,
            reasoning,
            passages,
        })
    }
}

/// Assemble the generation prompt from retrieval-ordered context
fn build_prompt(
    query: &str,
    reasoning: &ReasoningResult,
    passages: &[ScoredPassage],
    pre_gen_confidence: f32,
) -> String {
    let mut reasoning_info = String::new();
    if !reasoning.reasoning_keywords.is_empty() {
        reasoning_info.push_str(&format!(
            "\nReasoning Keywords: {}",
            reasoning.reasoning_keywords.join(", ")
        ));
    }
    if !reasoning.sub_queries.is_empty() {
        reasoning_info.push_str(&format!(
            "\nSub-questions identified: {}",
            reasoning.sub_queries.join("; ")
        ));
    }

    let context = passages
        .iter()
        .map(|scored| {
            let p = &scored.passage;
            let page = p
                .page
                .map(|n| n.to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            let header = match &p.paper_title {
                Some(title) if title != "Unknown" => format!(
                    "[Source: {} ('{}') | Section: {} | Page: {}]",
                    p.source_id,
                    title,
                    p.section_type.label(),
                    page
                ),
                _ => format!(
                    "[Source: {} | Section: {} | Page: {}]",
                    p.source_id,
                    p.section_type.label(),
                    page
                ),
            };

            format!("{header}\n{}", p.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    ANSWER_PROMPT
        .replace("{pre_gen_confidence}", &format!("{pre_gen_confidence:.2}"))
        .replace("{reasoning_info}", &reasoning_info)
        .replace("{context}", &context)
        .replace("{question}", query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RetrievedPassage, SectionType};

    fn scored(source: &str, text: &str, title: Option<&str>, distance: f32) -> ScoredPassage {
        ScoredPassage {
            passage: RetrievedPassage {
                text: text.to_string(),
                source_id: source.to_string(),
                page: Some(4),
                section_type: SectionType::Results,
                paper_title: title.map(|t| t.to_string()),
            },
            distance,
        }
    }

    fn plain_reasoning(query: &str) -> ReasoningResult {
        ReasoningResult::fallback(query, "n/a".to_string())
    }

    #[test]
    fn test_prompt_contains_context_headers() {
        let passages = vec![scored("a.pdf", "chunk body", None, 0.2)];
        let prompt = build_prompt("q?", &plain_reasoning("q?"), &passages, 72.5);

        assert!(prompt.contains("[Source: a.pdf | Section: RESULTS | Page: 4]"));
        assert!(prompt.contains("chunk body"));
        assert!(prompt.contains("context_match_score: 72.50%"));
        assert!(prompt.contains("Question:\nq?"));
    }

    #[test]
    fn test_prompt_title_variant() {
        let passages = vec![scored("a.pdf", "body", Some("Great Paper"), 0.2)];
        let prompt = build_prompt("q", &plain_reasoning("q"), &passages, 80.0);

        assert!(prompt.contains("[Source: a.pdf ('Great Paper') | Section: RESULTS | Page: 4]"));
    }

    #[test]
    fn test_prompt_includes_reasoning_annotations() {
        let mut reasoning = plain_reasoning("q");
        reasoning.reasoning_keywords = vec!["attention".to_string(), "scaling".to_string()];
        reasoning.sub_queries = vec!["what is attention".to_string()];

        let prompt = build_prompt("q", &reasoning, &[], 10.0);
        assert!(prompt.contains("Reasoning Keywords: attention, scaling"));
        assert!(prompt.contains("Sub-questions identified: what is attention"));
    }

    #[test]
    fn test_prompt_omits_empty_reasoning_block() {
        let prompt = build_prompt("q", &plain_reasoning("q"), &[], 10.0);
        assert!(!prompt.contains("Reasoning Keywords"));
        assert!(!prompt.contains("Sub-questions identified"));
    }

    #[test]
    fn test_engine_config_default() {
        assert_eq!(EngineConfig::default().top_k, 5);
    }
}
