/// Text-to-vector encoder shared by ingest and query paths.
///
/// Implementations must return unit-length vectors so that inner product
/// equals cosine similarity, and must be deterministic for a given input.
pub trait Embedder: Send + Sync {
    /// Embedding dimensionality (D), fixed at load time.
    fn dim(&self) -> usize;
    /// Maximum input length in tokens; longer inputs are truncated.
    fn max_len(&self) -> usize;
    /// Compute embeddings for a batch of input texts.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
