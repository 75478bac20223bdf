//! Local sentence embeddings

pub mod engine;

pub use engine::Embedder;
