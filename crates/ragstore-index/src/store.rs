//! The chunk store: ingest, search, delete, stats.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use ragstore_core::chunker::{chunk_text, ChunkingConfig};
use ragstore_core::error::{Result, StoreError};
use ragstore_core::types::{ChunkMetadata, Meta, ScoredChunk, StoreStats};
use ragstore_embed::LazyEmbedder;

use crate::index::{l2_normalize, FlatIndex};
use crate::persist::{self, StoreState};

/// Semantic chunk store over a flat similarity index.
///
/// The (index, documents, metadata) triple is guarded by a single lock and
/// only ever changes as a unit, so position `i` always refers to the same
/// chunk in all three. Every mutation is written through to disk.
pub struct VectorStore {
    state: RwLock<StoreState>,
    embedder: LazyEmbedder,
    store_dir: PathBuf,
    chunking: ChunkingConfig,
}

impl VectorStore {
    /// Open a store at `store_dir`, loading persisted artifacts when all of
    /// them are present. An unreadable store is reset to empty rather than
    /// failing startup.
    pub fn open(
        store_dir: impl Into<PathBuf>,
        chunking: ChunkingConfig,
        embedder: LazyEmbedder,
    ) -> Result<Self> {
        chunking.validate()?;
        let store_dir = store_dir.into();
        let state = match persist::load(&store_dir) {
            Ok(Some(state)) => {
                info!(
                    "loaded vector store with {} chunks from {}",
                    state.documents.len(),
                    store_dir.display()
                );
                state
            }
            Ok(None) => {
                info!("no existing vector store at {}, starting fresh", store_dir.display());
                StoreState::default()
            }
            Err(e) => {
                warn!("resetting vector store at {}: {}", store_dir.display(), e);
                StoreState::default()
            }
        };
        Ok(Self { state: RwLock::new(state), embedder, store_dir, chunking })
    }

    /// Chunk, embed, and index a document.
    ///
    /// Returns `Ok(false)` without mutating when the content hash is
    /// already indexed (dedup is by content, not by path) or when the text
    /// yields no chunks.
    pub fn add_document(&self, file_path: &str, content: &str, extra: Meta) -> Result<bool> {
        let file_hash = blake3::hash(content.as_bytes()).to_hex().to_string();

        let mut state = self.write_state()?;
        if state.metadata.iter().any(|m| m.file_hash == file_hash) {
            debug!("{}", StoreError::DuplicateDocument(file_path.to_string()));
            return Ok(false);
        }

        let chunks = chunk_text(content, self.chunking.chunk_size, self.chunking.overlap);
        if chunks.is_empty() {
            debug!("no chunks produced from {}", file_path);
            return Ok(false);
        }

        let embedder = self.embedder.get()?;
        let mut embeddings = embedder
            .embed_batch(&chunks)
            .map_err(|e| StoreError::EncoderUnavailable(e.to_string()))?;
        for v in &mut embeddings {
            l2_normalize(v);
        }

        let base = state.documents.len();
        let total = chunks.len();
        state.index.add_batch(embeddings)?;
        for (i, chunk) in chunks.into_iter().enumerate() {
            state.metadata.push(ChunkMetadata {
                file_path: file_path.to_string(),
                file_hash: file_hash.clone(),
                chunk_id: base + i,
                chunk_index: i,
                total_chunks: total,
                extra: extra.clone(),
            });
            state.documents.push(chunk);
        }

        persist::save(&self.store_dir, &state)?;
        info!("added {} chunks from {}", total, file_path);
        Ok(true)
    }

    /// Ranked nearest chunks for `query`, best first, scores at or above
    /// `score_threshold`. Degrades to an empty result on any internal
    /// failure; retrieval is best-effort infrastructure for generation.
    pub fn search(&self, query: &str, k: usize, score_threshold: f32) -> Vec<ScoredChunk> {
        match self.try_search(query, k, score_threshold) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("{}", StoreError::QueryFailure(e.to_string()));
                Vec::new()
            }
        }
    }

    fn try_search(&self, query: &str, k: usize, score_threshold: f32) -> Result<Vec<ScoredChunk>> {
        let state = self.read_state()?;
        if state.documents.is_empty() {
            return Ok(Vec::new());
        }

        let embedder = self.embedder.get()?;
        let mut query_vec = embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| StoreError::QueryFailure(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::QueryFailure("encoder returned no query vector".to_string()))?;
        l2_normalize(&mut query_vec);

        let hits = state.index.search(&query_vec, k.min(state.documents.len()));
        Ok(hits
            .into_iter()
            .filter(|&(_, score)| score >= score_threshold)
            .map(|(i, score)| ScoredChunk {
                content: state.documents[i].clone(),
                score,
                metadata: state.metadata[i].clone(),
            })
            .collect())
    }

    /// Remove every chunk of `file_path` and rebuild the index from the
    /// survivors; the flat index has no removal primitive. Returns
    /// `Ok(false)` when the path is not indexed.
    pub fn delete_document(&self, file_path: &str) -> Result<bool> {
        let mut state = self.write_state()?;
        let positions: Vec<usize> = state
            .metadata
            .iter()
            .enumerate()
            .filter(|(_, m)| m.file_path == file_path)
            .map(|(i, _)| i)
            .collect();
        if positions.is_empty() {
            debug!("{}", StoreError::DocumentNotFound(file_path.to_string()));
            return Ok(false);
        }

        // Work on copies so a failed re-embed leaves the triple untouched.
        let mut documents = state.documents.clone();
        let mut metadata = state.metadata.clone();
        // Descending order so earlier removals don't shift later positions.
        for &i in positions.iter().rev() {
            documents.remove(i);
            metadata.remove(i);
        }

        let mut index = FlatIndex::default();
        if !documents.is_empty() {
            let embedder = self.embedder.get()?;
            let mut embeddings = embedder
                .embed_batch(&documents)
                .map_err(|e| StoreError::EncoderUnavailable(e.to_string()))?;
            for v in &mut embeddings {
                l2_normalize(v);
            }
            index.add_batch(embeddings)?;
        }

        state.documents = documents;
        state.metadata = metadata;
        state.index = index;
        persist::save(&self.store_dir, &state)?;
        info!("deleted {} chunks of {} from the store", positions.len(), file_path);
        Ok(true)
    }

    /// Reset to an empty store and persist the empty state.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.write_state()?;
        *state = StoreState::default();
        persist::save(&self.store_dir, &state)?;
        info!("cleared vector store at {}", self.store_dir.display());
        Ok(())
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let state = self.read_state()?;
        let mut documents: Vec<String> = state.metadata.iter().map(|m| m.file_path.clone()).collect();
        documents.sort();
        documents.dedup();
        let embedding_dim = if state.index.dim() == 0 { self.embedder.dim() } else { Some(state.index.dim()) };
        Ok(StoreStats {
            total_chunks: state.documents.len(),
            total_documents: documents.len(),
            embedding_dim,
            documents,
        })
    }

    /// Number of vectors in the similarity index. Always equals the number
    /// of stored chunks.
    pub fn vector_count(&self) -> usize {
        self.read_state().map(|s| s.index.len()).unwrap_or(0)
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| StoreError::QueryFailure("store lock poisoned".to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| StoreError::QueryFailure("store lock poisoned".to_string()))
    }
}
