//! Character chunker with overlap
//!
//! Greedy windows of ~1000 characters with 200-character overlap, snapping
//! window ends back to whitespace so words are never split mid-token.

use serde::{Deserialize, Serialize};

/// Chunking parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkParams {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub overlap: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

/// Split text into overlapping character chunks.
///
/// Window ends prefer a whitespace boundary within the last fifth of the
/// window; a window with no whitespace is cut hard.
pub fn chunk_text(text: &str, params: ChunkParams) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= params.chunk_size {
        let chunk = text.trim();
        return if chunk.is_empty() {
            Vec::new()
        } else {
            vec![chunk.to_string()]
        };
    }

    let step = params.chunk_size.saturating_sub(params.overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let hard_end = (start + params.chunk_size).min(chars.len());

        let end = if hard_end == chars.len() {
            hard_end
        } else {
            // Snap back to the last whitespace in the final fifth of the
            // window, if any
            let floor = hard_end - (params.chunk_size / 5).min(hard_end - start - 1);
            (floor..hard_end)
                .rev()
                .find(|&i| chars[i].is_whitespace())
                .unwrap_or(hard_end)
        };

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end == chars.len() {
            break;
        }
        start += step.min(end.saturating_sub(start).max(1));
    }

    chunks
}
