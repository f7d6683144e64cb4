//! Text encoders.
//!
//! The real backend is a local BGE-M3 (XLM-RoBERTa) model run through
//! candle; `APP_USE_FAKE_EMBEDDINGS=1` swaps in a deterministic hash-bucket
//! embedder so tests and development never load model weights. Both produce
//! unit-length vectors, so inner product equals cosine similarity.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XlmRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::info;

mod device;
mod lazy;
mod pool;
mod tokenize;

pub use lazy::LazyEmbedder;
pub use pool::masked_mean_l2;
pub use ragstore_core::traits::Embedder;

pub const EMBEDDING_DIM: usize = 1024;
const MAX_TOKENS: usize = 256;

/// BGE-M3 encoder loaded from a local model directory.
pub struct EmbeddingModel {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl EmbeddingModel {
    pub fn load() -> Result<Self> {
        let device = device::select_device();
        let model_dir = resolve_model_dir()?;
        info!("loading BGE-M3 model from {}", model_dir.display());

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config: XlmRobertaConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let weights = candle_core::pickle::read_all(model_dir.join("pytorch_model.bin"))?;
        let weights: HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;

        info!("embedding model ready, dim {}", EMBEDDING_DIM);
        Ok(Self { model, tokenizer, device })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize::tokenize_on_device(&self.tokenizer, text, MAX_TOKENS, &self.device)?;
        let token_type_ids = Tensor::zeros((1, MAX_TOKENS), DType::I64, &self.device)?;
        let hidden = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;
        let pooled = pool::masked_mean_l2(&hidden, &attention_mask)?;
        let out: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        Ok(out)
    }
}

impl Embedder for EmbeddingModel {
    fn dim(&self) -> usize { EMBEDDING_DIM }
    fn max_len(&self) -> usize { MAX_TOKENS }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}

/// Deterministic bag-of-words embedder for tests and offline development.
///
/// Tokens are lowercased and stripped of punctuation before hashing into a
/// bucket, so "Cat." and "cat" land in the same dimension.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for raw in text.split_whitespace() {
            let token: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if token.is_empty() {
                continue;
            }
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            v[(h as usize) % self.dim] += 1.0 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { MAX_TOKENS }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// The default encoder: fake when `APP_USE_FAKE_EMBEDDINGS` asks for it,
/// the candle model otherwise.
pub fn get_default_embedder() -> Result<Arc<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        info!("using fake embeddings");
        return Ok(Arc::new(FakeEmbedder::new(EMBEDDING_DIM)));
    }
    Ok(Arc::new(EmbeddingModel::load()?))
}

fn resolve_model_dir() -> Result<PathBuf> {
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = PathBuf::from(&dir);
            if p.exists() {
                return Ok(p);
            }
        }
    }
    for fallback in ["../models/bge-m3", "models/bge-m3"] {
        let p = Path::new(fallback);
        if p.exists() {
            return Ok(p.to_path_buf());
        }
    }
    Err(anyhow!(
        "could not locate the BGE-M3 model directory; set APP_MODEL_DIR or MODEL_DIR"
    ))
}
