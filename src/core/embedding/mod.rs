//! Text embedding.
//!
//! An [`Embedder`] turns text into fixed-dimension vectors. Two
//! backends are provided:
//!
//! - [`HashEmbedder`]: deterministic feature hashing, always available
//! - [`OllamaEmbedder`]: remote model behind an Ollama-compatible API
//!
//! Any failure surfaces as `EmbeddingFailed`; a backend never returns
//! fewer vectors than it was given texts.

mod hash;
mod ollama;

pub use hash::HashEmbedder;
pub use ollama::OllamaEmbedder;

use crate::core::config::{EmbeddingBackend, EmbeddingConfig};
use crate::core::error::Result;
use crate::core::types::{EmbedderInfo, EmbeddingVector};
use std::sync::Arc;

pub trait Embedder: Send + Sync {
    fn embed_one(&self, text: &str) -> Result<EmbeddingVector>;

    /// Embed `texts` in order, one vector per input.
    fn embed_many(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>>;

    fn info(&self) -> EmbedderInfo;
}

/// Build the embedder selected by configuration
pub fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.backend {
        EmbeddingBackend::Hash => Arc::new(HashEmbedder::new(config.dimension, config.max_tokens)),
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(
            &config.base_url,
            &config.model,
            config.timeout_sec,
        )?),
    };

    let info = embedder.info();
    tracing::info!(
        "Embedding backend: {} (model {}, {} dims)",
        info.name,
        info.model,
        info.embedding_dimension
    );
    Ok(embedder)
}
