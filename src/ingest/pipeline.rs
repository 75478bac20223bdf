//! Ingestion pipeline: extract, chunk, tag, embed, index
//!
//! PDF text is extracted per page so every chunk keeps its page number.
//! All files are loaded and chunked before the existing index is dropped:
//! a run where nothing loads leaves the previous index in place. Chunk
//! classification calls are independent and run with bounded concurrency;
//! a short pacing pause every few chunks respects the classification
//! capability's rate limits.

use futures_util::{stream, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{AlraError, Result};
use crate::ingest::chunker::{chunk_text, ChunkParams};
use crate::semantic::SectionClassifier;
use crate::store::VectorStore;
use crate::types::RetrievedPassage;

/// Concurrent classification calls in flight
const CLASSIFY_CONCURRENCY: usize = 4;

/// Pause after this many classified chunks
const PACING_EVERY: usize = 10;
const PACING_DELAY: Duration = Duration::from_secs(1);

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Files successfully indexed
    pub files_indexed: usize,
    /// Total chunks written to the store
    pub chunks_indexed: usize,
    /// (file, reason) for files that failed to load
    pub failures: Vec<(String, String)>,
}

/// A chunk of extracted text with its 1-based page number
#[derive(Debug, Clone)]
struct RawChunk {
    text: String,
    page: u32,
}

/// Builds the vector index from PDF files
pub struct IngestPipeline {
    classifier: SectionClassifier,
    store: Arc<dyn VectorStore>,
    params: ChunkParams,
}

impl IngestPipeline {
    pub fn new(classifier: SectionClassifier, store: Arc<dyn VectorStore>) -> Self {
        Self {
            classifier,
            store,
            params: ChunkParams::default(),
        }
    }

    pub fn with_params(
        classifier: SectionClassifier,
        store: Arc<dyn VectorStore>,
        params: ChunkParams,
    ) -> Self {
        Self {
            classifier,
            store,
            params,
        }
    }

    /// Rebuild the index from the given PDF files.
    ///
    /// Every file is extracted and chunked first; the previous index is
    /// dropped only once at least one replacement chunk exists. When every
    /// file fails to load the existing index is left untouched.
    pub async fn ingest_files(&self, paths: &[PathBuf]) -> Result<IngestReport> {
        if paths.is_empty() {
            return Err(AlraError::IngestError("no input files given".to_string()));
        }

        let mut report = IngestReport::default();
        let mut loaded: Vec<(String, Vec<RawChunk>)> = Vec::new();
        for path in paths {
            let name = file_name(path);
            match self.load_chunks(path) {
                Ok(chunks) => loaded.push((name, chunks)),
                Err(e) => report.failures.push((name, e.to_string())),
            }
        }

        if loaded.is_empty() {
            return Err(AlraError::IngestError(format!(
                "all {} file(s) failed to load; existing index left in place",
                paths.len()
            )));
        }

        self.store.reset().await?;

        for (source_id, chunks) in loaded {
            let passages = self.tag_chunks(&source_id, chunks).await;
            report.files_indexed += 1;
            report.chunks_indexed += passages.len();
            self.store.add_batch(passages).await?;
        }

        Ok(report)
    }

    /// Extract a PDF page by page and chunk each page's text
    fn load_chunks(&self, path: &Path) -> Result<Vec<RawChunk>> {
        let pages = pdf_extract::extract_text_by_pages(path)
            .map_err(|e| AlraError::IngestError(format!("{}: {e}", path.display())))?;

        let mut chunks = Vec::new();
        for (idx, page_text) in pages.iter().enumerate() {
            for text in chunk_text(page_text, self.params) {
                chunks.push(RawChunk {
                    text,
                    page: idx as u32 + 1,
                });
            }
        }

        if chunks.is_empty() {
            return Err(AlraError::IngestError(format!(
                "no text extracted from {}",
                path.display()
            )));
        }

        Ok(chunks)
    }

    /// Classify chunks with bounded concurrency and pacing
    async fn tag_chunks(&self, source_id: &str, chunks: Vec<RawChunk>) -> Vec<RetrievedPassage> {
        let mut passages = Vec::with_capacity(chunks.len());
        let total = chunks.len();

        for (batch_idx, batch) in chunks.chunks(PACING_EVERY).enumerate() {
            let tagged: Vec<_> = stream::iter(batch.iter())
                .map(|chunk| async move {
                    let tag = self.classifier.classify(&chunk.text).await;
                    (chunk.clone(), tag)
                })
                .buffered(CLASSIFY_CONCURRENCY)
                .collect()
                .await;

            for (chunk, tag) in tagged {
                passages.push(RetrievedPassage {
                    text: chunk.text,
                    source_id: source_id.to_string(),
                    page: Some(chunk.page),
                    section_type: tag.section_type,
                    paper_title: tag.paper_title,
                });
            }

            let processed = (batch_idx + 1) * PACING_EVERY;
            if processed < total {
                tokio::time::sleep(PACING_DELAY).await;
            }
        }

        passages
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
