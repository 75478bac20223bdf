//! Evaluation: interaction logging, retrieval metrics and the golden-query
//! benchmark harness

pub mod benchmark;
pub mod logger;
pub mod metrics;

pub use benchmark::{golden_dataset, BenchmarkReport, BenchmarkRunner, CaseKind, GoldenCase};
pub use logger::{InteractionLogger, LogEntry, LogSummary};
pub use metrics::{compute_faithfulness, compute_recall_at_k};
