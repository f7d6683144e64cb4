//! The engine's public query surface: similarity search, context assembly
//! under a length budget, and the prompt template handed to the downstream
//! LLM provider. No generation happens in this crate.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ragstore_index::VectorStore;

mod prompt;

pub use prompt::format_rag_prompt;

/// Score floor for context retrieval; deliberately lower than a typical
/// interactive search threshold so the prompt still gets weak-but-related
/// material to work with.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.2;

/// Attribution record for one chunk included in the assembled context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub file_path: String,
    pub chunk_index: usize,
    pub score: f32,
}

/// Assembled context plus attribution, ready for prompt formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievedContext {
    pub context: String,
    pub sources: Vec<SourceRef>,
    pub num_chunks: usize,
    pub total_length: usize,
}

pub struct Retriever {
    store: Arc<VectorStore>,
    score_threshold: f32,
}

impl Retriever {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self::with_threshold(store, DEFAULT_SCORE_THRESHOLD)
    }

    pub fn with_threshold(store: Arc<VectorStore>, score_threshold: f32) -> Self {
        Self { store, score_threshold }
    }

    /// Retrieve ranked chunks for `query` and pack them into a context of
    /// roughly `max_context_length` characters.
    ///
    /// Chunks are taken best-first; a chunk that would push past the budget
    /// stops assembly, except that the best hit is always included so a
    /// long top match never produces an empty context.
    pub fn retrieve_context(
        &self,
        query: &str,
        max_chunks: usize,
        max_context_length: usize,
    ) -> RetrievedContext {
        let results = self.store.search(query, max_chunks, self.score_threshold);
        if results.is_empty() {
            debug!("no context found for query");
            return RetrievedContext::default();
        }

        let mut parts = Vec::new();
        let mut sources = Vec::new();
        let mut current_length = 0usize;
        for (i, hit) in results.iter().enumerate() {
            if !parts.is_empty() && current_length + hit.content.len() > max_context_length {
                break;
            }
            parts.push(format!("[Document {}] {}", i + 1, hit.content));
            current_length += hit.content.len();
            sources.push(SourceRef {
                file_path: hit.metadata.file_path.clone(),
                chunk_index: hit.metadata.chunk_index,
                score: hit.score,
            });
        }

        let context = parts.join("\n\n");
        RetrievedContext {
            num_chunks: parts.len(),
            total_length: context.len(),
            context,
            sources,
        }
    }
}
