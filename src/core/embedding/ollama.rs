use crate::core::embedding::Embedder;
use crate::core::error::{DocragError, Result};
use crate::core::types::{EmbedderInfo, EmbeddingVector};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Embedder backed by an Ollama-compatible `/embed` endpoint
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    client: Client,

    /// Dimension of the first response, 0 until known
    dimension: AtomicUsize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: &str, timeout_sec: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .map_err(|e| {
                DocragError::EmbeddingFailed(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            dimension: AtomicUsize::new(0),
        })
    }

    fn request(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        let url = format!("{}/embed", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .map_err(|e| DocragError::EmbeddingFailed(format!("request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(DocragError::EmbeddingFailed(format!(
                "embedding service returned {status}: {body}"
            )));
        }

        let parsed: EmbedResponse = resp.json().map_err(|e| {
            DocragError::EmbeddingFailed(format!("failed to parse embedding response: {e}"))
        })?;

        self.validate(texts.len(), parsed.embeddings)
    }

    fn validate(&self, expected: usize, vectors: Vec<Vec<f32>>) -> Result<Vec<EmbeddingVector>> {
        if vectors.len() != expected {
            return Err(DocragError::EmbeddingFailed(format!(
                "expected {expected} embeddings, got {}",
                vectors.len()
            )));
        }

        let known = self.dimension.load(Ordering::Relaxed);
        let dimension = if known > 0 {
            known
        } else {
            vectors.first().map(Vec::len).unwrap_or(0)
        };

        if vectors.iter().any(|v| v.is_empty() || v.len() != dimension) {
            return Err(DocragError::EmbeddingFailed(format!(
                "inconsistent embedding dimension (expected {dimension})"
            )));
        }

        self.dimension.store(dimension, Ordering::Relaxed);
        Ok(vectors)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed_one(&self, text: &str) -> Result<EmbeddingVector> {
        self.request(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| DocragError::EmbeddingFailed("empty embedding response".to_string()))
    }

    fn embed_many(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts)
    }

    fn info(&self) -> EmbedderInfo {
        EmbedderInfo {
            name: "ollama".to_string(),
            model: self.model.clone(),
            embedding_dimension: self.dimension.load(Ordering::Relaxed),
        }
    }
}
