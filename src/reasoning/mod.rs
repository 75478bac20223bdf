//! Pre-retrieval query reasoning expansion

pub mod expander;

pub use expander::{QueryExpander, ReasoningResult};
