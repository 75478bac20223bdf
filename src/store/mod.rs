//! Vector store seam
//!
//! The pipeline consumes similarity search through [`VectorStore`]; the
//! index's internal search algorithm is an external concern. Distances
//! handed to the grounding scorers are always non-negative with lower
//! meaning more similar, whatever the backend's native score convention.

pub mod qdrant;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{RetrievedPassage, ScoredPassage};

/// Similarity search over the ingested paper corpus
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Nearest-neighbor search; results ordered most similar first
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredPassage>>;

    /// Index a batch of passages
    async fn add_batch(&self, passages: Vec<RetrievedPassage>) -> Result<()>;

    /// Number of indexed passages
    async fn count(&self) -> Result<u64>;

    /// Drop all indexed passages (rebuild path)
    async fn reset(&self) -> Result<()>;
}

pub use qdrant::QdrantStore;
