//! LLM section classifier with a deterministic regex fallback
//!
//! Tags each chunk with a coarse section role and, when visible in the text,
//! the paper title. Advisory metadata only; classification failures degrade
//! to the regex fallback and never interrupt ingestion.

use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

use crate::llm::{strip_code_fences, TextGenerator};
use crate::types::SectionType;

/// Chunks shorter than this are tagged `Other` without spending a call
const MIN_CHARS_FOR_CALL: usize = 200;

/// Classifier input is capped to keep context usage bounded
const MAX_CHUNK_CHARS: usize = 1500;

const SEMANTIC_PROMPT: &str = r#"You are a research paper parser.
Analyze the following text chunk and classify it into ONE of these categories:
- objective (goals, problem statement, hypothesis)
- methodology (methods, data, setup, algorithms)
- results (findings, tables, metrics, performance)
- claims (arguments, main contributions, discussion)
- limitations (weaknesses, future work)
- other (references, headers, boilerplate)

Then, if possible, identify the probable paper title if it appears in the text (otherwise null).

Text Chunk:
{text_chunk}

Respond ONLY with valid JSON:
{
    "section_type": "category_name",
    "paper_title": "extracted title or null"
}
"#;

#[derive(Debug, Deserialize)]
struct RawClassification {
    section_type: Option<String>,
    paper_title: Option<String>,
}

/// Section tag plus optional extracted title for one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTag {
    pub section_type: SectionType,
    pub paper_title: Option<String>,
}

/// Classifies chunk text into semantic sections
pub struct SectionClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl SectionClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Classify one chunk. Short chunks skip the model call entirely; any
    /// call or decode failure falls back to keyword patterns.
    pub async fn classify(&self, text: &str) -> SectionTag {
        if text.len() < MIN_CHARS_FOR_CALL {
            return SectionTag {
                section_type: SectionType::Other,
                paper_title: None,
            };
        }

        let snippet: String = text.chars().take(MAX_CHUNK_CHARS).collect();
        let prompt = SEMANTIC_PROMPT.replace("{text_chunk}", &snippet);

        let tag = match self.generator.generate(&prompt).await {
            Ok(raw) => Self::decode(&raw),
            Err(_) => None,
        };

        match tag {
            // A model answer of "other" is treated as inconclusive and the
            // keyword patterns get a second look, matching fallback behavior.
            Some(tag) if tag.section_type != SectionType::Other => tag,
            Some(tag) => SectionTag {
                section_type: keyword_fallback(text),
                paper_title: tag.paper_title,
            },
            None => SectionTag {
                section_type: keyword_fallback(text),
                paper_title: None,
            },
        }
    }

    fn decode(raw: &str) -> Option<SectionTag> {
        let cleaned = strip_code_fences(raw);
        let parsed: RawClassification = serde_json::from_str(cleaned).ok()?;

        let paper_title = parsed
            .paper_title
            .filter(|t| !t.is_empty() && t.to_lowercase() != "null" && t != "Unknown");

        Some(SectionTag {
            section_type: parsed
                .section_type
                .map(|s| SectionType::parse(&s))
                .unwrap_or_default(),
            paper_title,
        })
    }
}

/// Deterministic keyword patterns, first match wins
fn keyword_fallback(text: &str) -> SectionType {
    static PATTERNS: OnceLock<Vec<(Regex, SectionType)>> = OnceLock::new();

    let patterns = PATTERNS.get_or_init(|| {
        vec![
            (
                Regex::new(r"(?i)abstract|introduction|goal|objective").unwrap(),
                SectionType::Objective,
            ),
            (
                Regex::new(r"(?i)method|algorithm|setup|data").unwrap(),
                SectionType::Methodology,
            ),
            (
                Regex::new(r"(?i)result|performance|accuracy|table").unwrap(),
                SectionType::Results,
            ),
            (
                Regex::new(r"(?i)discussion|conclusion|claim").unwrap(),
                SectionType::Claims,
            ),
            (
                Regex::new(r"(?i)limitation|future work").unwrap(),
                SectionType::Limitations,
            ),
        ]
    });

    patterns
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, section)| *section)
        .unwrap_or(SectionType::Other)
}
