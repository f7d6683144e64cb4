//! Domain types shared by the index and retrieval crates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-supplied metadata, carried through to search results untouched.
pub type Meta = HashMap<String, serde_json::Value>;

/// Per-chunk bookkeeping, position-aligned with the similarity index.
///
/// - `file_path`: source document, the delete key
/// - `file_hash`: blake3 hash of the whole file's text, the dedup key
/// - `chunk_id`: global array position at insertion time
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_path: String,
    pub file_hash: String,
    pub chunk_id: usize,
    pub chunk_index: usize,
    pub total_chunks: usize,
    #[serde(flatten)]
    pub extra: Meta,
}

/// A ranked search hit: the raw chunk text with its score and metadata.
/// `score` is an inner product of unit vectors, so higher is always better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub content: String,
    pub score: f32,
    pub metadata: ChunkMetadata,
}

/// Snapshot of store contents, for operators and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_chunks: usize,
    pub total_documents: usize,
    pub embedding_dim: Option<usize>,
    pub documents: Vec<String>,
}
