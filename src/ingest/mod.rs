//! Corpus ingestion: PDF text extraction, chunking, semantic tagging and
//! indexing

pub mod chunker;
pub mod pipeline;

pub use chunker::{chunk_text, ChunkParams};
pub use pipeline::{IngestPipeline, IngestReport};
