//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars, and exposes the typed [`StoreSettings`] the binaries consume.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::env;
use std::path::PathBuf;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Engine settings with per-key fallback to the defaults the original
    /// corpus was tuned with.
    pub fn store_settings(&self) -> StoreSettings {
        let d = StoreSettings::default();
        StoreSettings {
            dir: self.get("store.dir").unwrap_or(d.dir),
            chunk_size: self.get("chunking.chunk_size").unwrap_or(d.chunk_size),
            overlap: self.get("chunking.overlap").unwrap_or(d.overlap),
            default_threshold: self.get("search.default_threshold").unwrap_or(d.default_threshold),
            default_k: self.get("search.default_k").unwrap_or(d.default_k),
            max_chunks: self.get("retrieval.max_chunks").unwrap_or(d.max_chunks),
            max_context_length: self.get("retrieval.max_context_length").unwrap_or(d.max_context_length),
        }
    }
}

/// Resolved settings for a chunk store and its retrieval defaults.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct StoreSettings {
    pub dir: String,
    pub chunk_size: usize,
    pub overlap: usize,
    pub default_threshold: f32,
    pub default_k: usize,
    pub max_chunks: usize,
    pub max_context_length: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            dir: "./data/vector_store".to_string(),
            chunk_size: 512,
            overlap: 50,
            default_threshold: 0.3,
            default_k: 5,
            max_chunks: 5,
            max_context_length: 2000,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
