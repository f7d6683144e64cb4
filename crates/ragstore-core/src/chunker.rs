//! Boundary-aware text chunking.
//!
//! Splits raw document text into overlapping windows, preferring to cut just
//! after a sentence terminator when one falls in the second half of the
//! current window. Lengths and offsets are counted in characters, not bytes,
//! so multi-byte input never splits inside a code point.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Window parameters for [`chunk_text`]. Defaults match the character-based
/// windows the rest of the engine is tuned for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 512, overlap: 50 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(StoreError::InvalidConfig("chunk_size must be positive".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(StoreError::InvalidConfig(format!(
                "overlap {} must be smaller than chunk_size {}",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split `text` into overlapping chunks of at most `chunk_size` characters.
///
/// Consecutive chunks share up to `overlap` characters. Each chunk is
/// trimmed; empty chunks are dropped. Text that fits in a single window is
/// returned as-is.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let n_chars = text.chars().count();
    if n_chars <= chunk_size {
        let trimmed = text.trim();
        return if trimmed.is_empty() { Vec::new() } else { vec![trimmed.to_string()] };
    }

    // Byte offset of every char boundary, plus the end of the string, so
    // char-indexed windows can slice without re-walking the text.
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < n_chars {
        let mut end = (start + chunk_size).min(n_chars);
        if end < n_chars {
            // Cut after the latest sentence terminator in the window, but
            // only when it lies past the midpoint; a cut earlier than that
            // would fragment the text too much.
            let window = &text[bounds[start]..bounds[end]];
            if let Some(rel) = window.rfind(SENTENCE_TERMINATORS) {
                let term = start + text[bounds[start]..bounds[start] + rel].chars().count();
                if term > start + chunk_size / 2 {
                    end = term + 1;
                }
            }
        }
        let chunk = text[bounds[start]..bounds[end]].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        if end >= n_chars {
            break;
        }
        // Back up by `overlap` for the next window; the max with start+1
        // keeps the window start strictly advancing.
        start = end.saturating_sub(overlap).max(start + 1);
    }
    chunks
}
