//! Type definitions module
//!
//! Core passage and section types shared across retrieval, grounding and
//! synthesis.

pub mod passage;

// Re-export commonly used types
pub use passage::{RetrievedPassage, ScoredPassage, SectionType};
