use std::sync::{Arc, RwLock};

use ragstore_core::error::StoreError;
use ragstore_core::traits::Embedder;

type Factory = dyn Fn() -> anyhow::Result<Arc<dyn Embedder>> + Send + Sync;

/// Lazily-initialized shared encoder.
///
/// The first caller that needs the model takes the write lock and loads it
/// exactly once; everyone after that clones the `Arc` under the read lock.
/// A failed load is reported as `EncoderUnavailable` and retried on the
/// next call.
pub struct LazyEmbedder {
    slot: RwLock<Option<Arc<dyn Embedder>>>,
    factory: Box<Factory>,
}

impl LazyEmbedder {
    /// Defer to [`crate::get_default_embedder`] on first use.
    pub fn new() -> Self {
        Self::with_factory(Box::new(crate::get_default_embedder))
    }

    pub fn with_factory(factory: Box<Factory>) -> Self {
        Self { slot: RwLock::new(None), factory }
    }

    /// Wrap an encoder that is already loaded.
    pub fn preloaded(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            slot: RwLock::new(Some(embedder)),
            factory: Box::new(|| Err(anyhow::anyhow!("encoder was provided preloaded"))),
        }
    }

    /// Fetch the encoder, loading it on first use.
    pub fn get(&self) -> Result<Arc<dyn Embedder>, StoreError> {
        if let Ok(guard) = self.slot.read() {
            if let Some(embedder) = guard.as_ref() {
                return Ok(Arc::clone(embedder));
            }
        }
        let mut guard = self
            .slot
            .write()
            .map_err(|_| StoreError::EncoderUnavailable("encoder lock poisoned".to_string()))?;
        // Double check: another thread may have loaded while we waited.
        if guard.is_none() {
            let loaded =
                (self.factory)().map_err(|e| StoreError::EncoderUnavailable(e.to_string()))?;
            *guard = Some(loaded);
        }
        guard
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| StoreError::EncoderUnavailable("encoder failed to initialize".to_string()))
    }

    /// Dimension of the encoder, if it has been loaded yet.
    pub fn dim(&self) -> Option<usize> {
        self.slot.read().ok().and_then(|g| g.as_ref().map(|e| e.dim()))
    }
}

impl Default for LazyEmbedder {
    fn default() -> Self {
        Self::new()
    }
}
