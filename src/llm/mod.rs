//! Hosted language model access
//!
//! All reasoning, generation, classification and synthesis calls go through
//! the [`TextGenerator`] trait so tests can substitute deterministic stubs.

pub mod client;

pub use client::{GroqClient, TextGenerator};

/// Strip optional markdown code fences from a model response before JSON
/// parsing. Handles ```json ... ``` and bare ``` fences; leaves anything
/// else untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening fence line (``` or ```json)
    let body = match trimmed.split_once('\n') {
        Some((_, rest)) => rest,
        None => return trimmed,
    };

    body.trim().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_text_untouched() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_fence_without_newline() {
        assert_eq!(strip_code_fences("```"), "```");
    }
}
