//! Query reasoning expansion
//!
//! Enriches a raw query with inferred intent, related keywords and optional
//! sub-questions before retrieval. Expansion is best-effort: any failure
//! degrades to a well-formed fallback result carrying the error, never a
//! panic or propagated error.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::llm::{strip_code_fences, TextGenerator};

const REASONING_PROMPT: &str = r#"You are a research query analysis engine. Given a user's question about research papers, your job is to:

1. Identify the core intent of the question
2. Generate reasoning keywords — related concepts, methods, or entities that are implied but not explicitly stated
3. Decompose the query into sub-questions if it requires multi-hop reasoning
4. Produce an expanded search query that combines the original question with inferred terms

User Query: {query}

Respond ONLY with valid JSON in this exact format:
{
    "core_intent": "one sentence describing what the user really wants to know",
    "reasoning_keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"],
    "sub_queries": ["sub-question 1", "sub-question 2"],
    "expanded_query": "the original query enriched with inferred terms for better semantic search",
    "is_multi_hop": true or false
}

Rules:
- Generate 3-7 reasoning keywords that are semantically related but not in the original query
- Only create sub_queries if the question genuinely requires multiple retrieval steps
- The expanded_query should be a natural sentence, not just keywords concatenated
- Think about what a researcher would need to find to answer this question completely
"#;

/// Wire shape of the model's reasoning response. Decoded strictly; a missing
/// expanded_query or core_intent falls back to the original query rather
/// than a partially-populated object.
#[derive(Debug, Deserialize)]
struct RawExpansion {
    core_intent: Option<String>,
    #[serde(default)]
    reasoning_keywords: Vec<String>,
    #[serde(default)]
    sub_queries: Vec<String>,
    expanded_query: Option<String>,
    is_multi_hop: Option<bool>,
}

/// Result of reasoning expansion for one query.
///
/// Created once per incoming query and never mutated. Keyword and sub-query
/// sequences are empty (never null) on any expansion failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningResult {
    pub original_query: String,
    pub core_intent: String,
    pub reasoning_keywords: Vec<String>,
    pub sub_queries: Vec<String>,
    pub expanded_query: String,
    pub is_multi_hop: bool,
    /// Failure description when expansion fell back
    pub error: Option<String>,
}

impl ReasoningResult {
    /// Identity fallback: expansion equals the original query
    pub fn fallback(query: &str, error: String) -> Self {
        Self {
            original_query: query.to_string(),
            core_intent: query.to_string(),
            reasoning_keywords: Vec::new(),
            sub_queries: Vec::new(),
            expanded_query: query.to_string(),
            is_multi_hop: false,
            error: Some(error),
        }
    }

    /// Query string to hand to the vector store: the expanded query when it
    /// is present and genuinely different, else the original verbatim.
    pub fn search_query(&self) -> &str {
        if !self.expanded_query.is_empty() && self.expanded_query != self.original_query {
            &self.expanded_query
        } else {
            &self.original_query
        }
    }
}

/// Expands queries through a reasoning model before retrieval
pub struct QueryExpander {
    generator: Arc<dyn TextGenerator>,
}

impl QueryExpander {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Expand a raw user query. Total: always returns a well-formed
    /// [`ReasoningResult`], falling back to the identity expansion on any
    /// provider or decode failure.
    pub async fn expand(&self, query: &str) -> ReasoningResult {
        let prompt = REASONING_PROMPT.replace("{query}", query);

        let raw = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => return ReasoningResult::fallback(query, e.to_string()),
        };

        let cleaned = strip_code_fences(&raw);
        let parsed: RawExpansion = match serde_json::from_str(cleaned) {
            Ok(p) => p,
            Err(e) => return ReasoningResult::fallback(query, format!("malformed JSON: {e}")),
        };

        let sub_queries = parsed.sub_queries;
        // Multi-hop requires genuinely multiple sub-queries, whatever the
        // model claimed.
        let is_multi_hop = if sub_queries.is_empty() {
            false
        } else {
            parsed.is_multi_hop.unwrap_or(sub_queries.len() > 1)
        };

        ReasoningResult {
            original_query: query.to_string(),
            core_intent: parsed
                .core_intent
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| query.to_string()),
            reasoning_keywords: parsed.reasoning_keywords,
            sub_queries,
            expanded_query: parsed
                .expanded_query
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| query.to_string()),
            is_multi_hop,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use async_trait::async_trait;

    struct CannedGenerator(Result<String, ProviderError>);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            self.0.clone()
        }
    }

    fn expander_with(response: Result<String, ProviderError>) -> QueryExpander {
        QueryExpander::new(Arc::new(CannedGenerator(response)))
    }

    #[tokio::test]
    async fn test_successful_expansion() {
        let response = r#"{
            "core_intent": "understand attention scaling",
            "reasoning_keywords": ["self-attention", "complexity", "sequence length"],
            "sub_queries": ["what is attention complexity", "how does it scale"],
            "expanded_query": "how does self-attention complexity scale with sequence length",
            "is_multi_hop": true
        }"#;
        let expander = expander_with(Ok(response.to_string()));

        let result = expander.expand("how does attention scale?").await;
        assert_eq!(result.core_intent, "understand attention scaling");
        assert_eq!(result.reasoning_keywords.len(), 3);
        assert!(result.is_multi_hop);
        assert!(result.error.is_none());
        assert_eq!(
            result.search_query(),
            "how does self-attention complexity scale with sequence length"
        );
    }

    #[tokio::test]
    async fn test_fenced_response_parsed() {
        let response = "```json\n{\"core_intent\": \"x\", \"reasoning_keywords\": [], \"sub_queries\": [], \"expanded_query\": \"y\", \"is_multi_hop\": false}\n```";
        let expander = expander_with(Ok(response.to_string()));

        let result = expander.expand("q").await;
        assert_eq!(result.expanded_query, "y");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let expander = expander_with(Err(ProviderError::Timeout("deadline".to_string())));

        let result = expander.expand("original question").await;
        assert_eq!(result.expanded_query, "original question");
        assert_eq!(result.core_intent, "original question");
        assert!(result.reasoning_keywords.is_empty());
        assert!(result.sub_queries.is_empty());
        assert!(!result.is_multi_hop);
        assert!(result.error.as_deref().unwrap().contains("timed out"));
        assert_eq!(result.search_query(), "original question");
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back() {
        let expander = expander_with(Ok("this is not json".to_string()));

        let result = expander.expand("q").await;
        assert_eq!(result.expanded_query, "q");
        assert!(result.error.as_deref().unwrap().contains("malformed JSON"));
    }

    #[tokio::test]
    async fn test_missing_fields_default_sanely() {
        let expander = expander_with(Ok(r#"{"core_intent": "intent"}"#.to_string()));

        let result = expander.expand("q").await;
        assert_eq!(result.core_intent, "intent");
        assert_eq!(result.expanded_query, "q");
        assert!(result.reasoning_keywords.is_empty());
        assert!(!result.is_multi_hop);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_multi_hop_requires_sub_queries() {
        // Model claims multi-hop but produced no sub-queries
        let response = r#"{"core_intent": "x", "expanded_query": "y", "is_multi_hop": true, "sub_queries": []}"#;
        let expander = expander_with(Ok(response.to_string()));

        let result = expander.expand("q").await;
        assert!(!result.is_multi_hop);
    }

    #[tokio::test]
    async fn test_multi_hop_inferred_from_sub_query_count() {
        let response = r#"{"core_intent": "x", "expanded_query": "y", "sub_queries": ["a", "b"]}"#;
        let expander = expander_with(Ok(response.to_string()));

        let result = expander.expand("q").await;
        assert!(result.is_multi_hop);
    }

    #[tokio::test]
    async fn test_search_query_identity_when_unchanged() {
        let response = r#"{"core_intent": "x", "expanded_query": "same", "sub_queries": []}"#;
        let expander = expander_with(Ok(response.to_string()));

        let result = expander.expand("same").await;
        assert_eq!(result.search_query(), "same");
    }
}
