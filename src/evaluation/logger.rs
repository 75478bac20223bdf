//! Append-only interaction log
//!
//! One entry per completed query, written after grounding scoring with all
//! score fields present. The on-disk format is a JSON array so the history
//! view (or any concurrent reader) can load it directly; a corrupt or
//! missing file reads as empty rather than failing.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::errors::Result;
use crate::grounding::GroundingResult;

/// The four sub-scores persisted with every interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMetrics {
    pub retrieval_similarity: f32,
    pub citation_coverage: f32,
    pub source_overlap: f32,
    pub hallucination_risk: f32,
}

/// One logged interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unix timestamp in seconds
    pub timestamp: f64,
    pub query: String,
    pub answer_length: usize,
    pub grounding_score: f32,
    pub metrics: LogMetrics,
}

/// Aggregates for the history view
#[derive(Debug, Clone, Default)]
pub struct LogSummary {
    pub total_queries: usize,
    pub avg_grounding: f32,
    pub avg_retrieval_similarity: f32,
    pub avg_citation_coverage: f32,
}

/// JSON-array interaction logger
#[derive(Debug, Clone)]
pub struct InteractionLogger {
    log_file: PathBuf,
}

impl InteractionLogger {
    pub fn new(log_file: PathBuf) -> Self {
        Self { log_file }
    }

    /// Append one completed interaction
    pub fn append(&self, query: &str, answer: &str, grounding: &GroundingResult) -> Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now().timestamp_millis() as f64 / 1000.0,
            query: query.to_string(),
            answer_length: answer.len(),
            grounding_score: grounding.overall_score,
            metrics: LogMetrics {
                retrieval_similarity: grounding.retrieval_similarity,
                citation_coverage: grounding.citation_coverage,
                source_overlap: grounding.source_overlap,
                hallucination_risk: grounding.hallucination_risk,
            },
        };

        let mut entries = self.read_all();
        entries.push(entry);

        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.log_file, serde_json::to_string_pretty(&entries)?)?;

        Ok(())
    }

    /// All logged interactions; tolerant of a missing or corrupt file
    pub fn read_all(&self) -> Vec<LogEntry> {
        let Ok(content) = fs::read_to_string(&self.log_file) else {
            return Vec::new();
        };
        if content.trim().is_empty() {
            return Vec::new();
        }
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Aggregate view over the whole log
    pub fn summary(&self) -> LogSummary {
        let entries = self.read_all();
        if entries.is_empty() {
            return LogSummary::default();
        }

        let n = entries.len() as f32;
        LogSummary {
            total_queries: entries.len(),
            avg_grounding: entries.iter().map(|e| e.grounding_score).sum::<f32>() / n,
            avg_retrieval_similarity: entries
                .iter()
                .map(|e| e.metrics.retrieval_similarity)
                .sum::<f32>()
                / n,
            avg_citation_coverage: entries
                .iter()
                .map(|e| e.metrics.citation_coverage)
                .sum::<f32>()
                / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn grounding(score: f32) -> GroundingResult {
        GroundingResult {
            overall_score: score,
            retrieval_similarity: score,
            citation_coverage: 50.0,
            source_overlap: 40.0,
            hallucination_risk: 100.0,
            explanation: "High confidence".to_string(),
        }
    }

    fn temp_logger() -> (InteractionLogger, TempDir) {
        let dir = TempDir::new().unwrap();
        let logger = InteractionLogger::new(dir.path().join("eval_logs.json"));
        (logger, dir)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (logger, _dir) = temp_logger();
        assert!(logger.read_all().is_empty());
        assert_eq!(logger.summary().total_queries, 0);
    }

    #[test]
    fn test_append_and_read_back() {
        let (logger, _dir) = temp_logger();

        logger.append("q1", "answer one", &grounding(80.0)).unwrap();
        logger.append("q2", "a2", &grounding(60.0)).unwrap();

        let entries = logger.read_all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].query, "q1");
        assert_eq!(entries[0].answer_length, "answer one".len());
        assert_eq!(entries[1].grounding_score, 60.0);
        assert_eq!(entries[0].metrics.citation_coverage, 50.0);
    }

    #[test]
    fn test_summary_averages() {
        let (logger, _dir) = temp_logger();
        logger.append("q1", "a", &grounding(80.0)).unwrap();
        logger.append("q2", "a", &grounding(60.0)).unwrap();

        let summary = logger.summary();
        assert_eq!(summary.total_queries, 2);
        assert!((summary.avg_grounding - 70.0).abs() < 1e-4);
        assert!((summary.avg_citation_coverage - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_corrupt_file_tolerated() {
        let (logger, dir) = temp_logger();
        fs::write(dir.path().join("eval_logs.json"), "{not json").unwrap();

        assert!(logger.read_all().is_empty());
        // Appending over a corrupt file starts a fresh array
        logger.append("q", "a", &grounding(50.0)).unwrap();
        assert_eq!(logger.read_all().len(), 1);
    }
}
