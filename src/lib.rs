//! ALRA - Auto-LitReview Agent
//!
//! Retrieval-augmented question answering and multi-document synthesis over
//! a personal corpus of research papers.
//!
//! # Architecture
//!
//! - Ingestion: PDF extraction, chunking, semantic section tagging, indexing
//! - Reasoning: pre-retrieval query expansion with strict fallback
//! - Grounding: calibrated confidence scoring over retrieval signals
//! - Engine: expand → retrieve → generate → score → log orchestration
//! - Evaluation: interaction log and golden-query benchmark harness

pub mod errors;
pub mod config;
pub mod types;
pub mod cli;

// External capabilities
pub mod llm;
pub mod embedding;
pub mod store;

// Pipeline stages
pub mod ingest;
pub mod semantic;
pub mod reasoning;
pub mod grounding;
pub mod engine;
pub mod synthesis;
pub mod evaluation;

// Re-export commonly used types
pub use errors::{AlraError, ProviderError, Result};
