//! Error types for the ALRA pipeline
//!
//! External-call failures carry an explicit kind so callers decide between
//! deterministic fallback and surfacing the error.

use thiserror::Error;

/// Failure kinds for calls to external capabilities (generation, reasoning,
/// classification). One variant per distinguishable failure mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Endpoint unreachable (connection refused, DNS, server down)
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded its deadline
    #[error("provider timed out: {0}")]
    Timeout(String),

    /// Response arrived but could not be decoded into the expected shape
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Rejected credentials or quota exhaustion
    #[error("provider rejected credentials: {0}")]
    Unauthorized(String),
}

/// Main error type for the ALRA agent
#[derive(Error, Debug)]
pub enum AlraError {
    /// Configuration errors (missing API key, unreadable config file).
    /// Fatal at startup: no fallback is meaningful.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No vector index has been built yet. Distinct from a low-confidence
    /// answer: the caller should prompt for ingestion, not show a score.
    #[error("Knowledge base not ready: {0}")]
    IndexNotReady(String),

    /// Text generation failed and no fallback applies (single attempt,
    /// surfaced to the caller)
    #[error("Generation failed: {0}")]
    Generation(#[from] ProviderError),

    /// Vector store operation failed
    #[error("Vector store error: {0}")]
    StoreError(String),

    /// Embedding computation failed
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Document ingestion failed
    #[error("Ingestion error: {0}")]
    IngestError(String),

    /// JSON parsing errors
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Agent error: {0}")]
    Generic(String),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AlraError>;

/// Convert anyhow errors to AlraError
impl From<anyhow::Error> for AlraError {
    fn from(err: anyhow::Error) -> Self {
        AlraError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Timeout("no response after 30s".to_string());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_index_not_ready_is_distinct() {
        let err = AlraError::IndexNotReady("run `alra ingest` first".to_string());
        assert!(err.to_string().contains("not ready"));
    }

    #[test]
    fn test_generation_wraps_provider_error() {
        let err: AlraError = ProviderError::Unauthorized("401".to_string()).into();
        assert!(matches!(err, AlraError::Generation(_)));
    }
}
