//! Semantic section tagging for ingested chunks

pub mod classifier;

pub use classifier::SectionClassifier;
