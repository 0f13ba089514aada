//! Grounded answer generation with a deterministic fallback.
//!
//! The prompt is assembled from the top retrieved chunks and sent to
//! an [`LlmProvider`]. When the provider fails for any reason the
//! answer degrades to the retrieved context itself, marked as a
//! fallback. Generation never fails a search.

use crate::core::config::GenerationConfig;
use crate::core::error::{DocragError, Result};
use crate::core::types::{preview, RankedResult};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Answer for a query with no retrieved context
pub const NO_CONTEXT_ANSWER: &str = "No relevant information found.";

/// Why a provider call produced no answer
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("service unreachable: {0}")]
    Unreachable(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Short category named in fallback answers
    pub fn category(&self) -> String {
        match self {
            ProviderError::Timeout(_) => "timeout".to_string(),
            ProviderError::Unreachable(_) => "connection refused".to_string(),
            ProviderError::Status { status, .. } => format!("HTTP {status}"),
            ProviderError::InvalidResponse(_) => "invalid response".to_string(),
        }
    }
}

/// Remote text generation service
pub trait LlmProvider: Send + Sync {
    fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError>;

    /// Cheap liveness check
    fn is_available(&self) -> bool;

    fn model(&self) -> &str;
}

/// Ollama `/generate` client
pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: Client,
    timeout: Duration,
    health_timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaProvider {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|e| {
            DocragError::GenerationFailed(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
            timeout: Duration::from_secs(config.timeout_sec),
            health_timeout: Duration::from_secs(config.health_timeout_sec),
        })
    }

    fn classify(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Unreachable(err.to_string())
        }
    }
}

impl LlmProvider for OllamaProvider {
    fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        let resp = self
            .client
            .post(format!("{}/generate", self.base_url))
            .timeout(self.timeout)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .map_err(Self::classify)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(ProviderError::Status { status, body });
        }

        let text = resp.text().map_err(Self::classify)?;
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(parsed.response)
    }

    fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/tags", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Answer produced for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// Answer written by the model (or the fixed no-context answer)
    Generated { text: String, sources: Vec<String> },

    /// Raw context returned because the model was unavailable
    Fallback {
        text: String,
        sources: Vec<String>,
        reason: String,
    },
}

impl GenerationOutcome {
    pub fn text(&self) -> &str {
        match self {
            GenerationOutcome::Generated { text, .. }
            | GenerationOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn sources(&self) -> &[String] {
        match self {
            GenerationOutcome::Generated { sources, .. }
            | GenerationOutcome::Fallback { sources, .. } => sources,
        }
    }

    pub fn fallback_used(&self) -> bool {
        matches!(self, GenerationOutcome::Fallback { .. })
    }
}

/// Prompt assembly and fallback policy over an [`LlmProvider`]
pub struct Generator {
    provider: Arc<dyn LlmProvider>,
    max_context_docs: usize,
    preview_chars: usize,
}

impl Generator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        max_context_docs: usize,
        preview_chars: usize,
    ) -> Self {
        Self {
            provider,
            max_context_docs,
            preview_chars,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        let provider = Arc::new(OllamaProvider::new(config)?);
        Ok(Self::new(
            provider,
            config.max_context_docs,
            config.preview_chars,
        ))
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Tagged, truncated context block: `[1] …\n\n[2] …`
    pub fn prepare_context(&self, docs: &[RankedResult]) -> String {
        docs.iter()
            .take(self.max_context_docs)
            .enumerate()
            .map(|(i, doc)| {
                format!(
                    "[{}] {}",
                    i + 1,
                    preview(&doc.full_content, self.preview_chars)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn build_prompt(&self, query: &str, context: &str) -> String {
        format!("Context: {context}\n\nQuestion: {query}\n\nAnswer:")
    }

    /// Answer `query` from `docs`.
    ///
    /// Empty `docs` yields the fixed no-context answer without calling
    /// the provider. Provider failures yield a fallback outcome.
    pub fn generate(&self, query: &str, docs: &[RankedResult]) -> GenerationOutcome {
        if docs.is_empty() {
            return GenerationOutcome::Generated {
                text: NO_CONTEXT_ANSWER.to_string(),
                sources: Vec::new(),
            };
        }

        let sources: Vec<String> = docs.iter().map(|d| d.source().to_string()).collect();
        let context = self.prepare_context(docs);
        let prompt = self.build_prompt(query, &context);

        match self.provider.generate(&prompt) {
            Ok(text) => {
                tracing::info!("Generated answer with {}", self.provider.model());
                GenerationOutcome::Generated { text, sources }
            }
            Err(e) => {
                tracing::warn!("LLM generation failed, using fallback: {}", e);
                let reason = e.category();
                GenerationOutcome::Fallback {
                    text: self.fallback_text(query, &context, &reason),
                    sources,
                    reason,
                }
            }
        }
    }

    fn fallback_text(&self, query: &str, context: &str, reason: &str) -> String {
        format!(
            "Based on the retrieved documents, here's the relevant information for your question '{query}':\n\n\
             Retrieved Context:\n{context}\n\n\
             Note: LLM service unavailable ({reason}), showing raw context. \
             To get enhanced AI-generated responses, please start the Ollama service with: \
             'ollama serve' and ensure the model '{}' is available.",
            self.provider.model()
        )
    }
}
