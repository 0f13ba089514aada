//! Configuration management for docrag.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{DocragError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// File extensions picked up by directory indexing (no dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

/// Which embedder implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Deterministic feature hashing, no service needed
    #[default]
    Hash,
    /// Ollama-compatible `/embed` endpoint
    Ollama,
}

impl FromStr for EmbeddingBackend {
    type Err = DocragError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "ollama" => Ok(Self::Ollama),
            other => Err(DocragError::ConfigError(format!(
                "Unknown embedding backend '{other}' (expected 'hash' or 'ollama')"
            ))),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => f.write_str("hash"),
            Self::Ollama => f.write_str("ollama"),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name sent to the remote backend
    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_service_url")]
    pub base_url: String,

    /// Vector dimension of the hash backend
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Inputs with more word tokens than this are rejected
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_embedding_timeout")]
    pub timeout_sec: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory of the vector database
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Collection holding the indexed chunks
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to return
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,
}

/// Answer generation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_service_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Deadline of a generation request
    #[serde(default = "default_llm_timeout")]
    pub timeout_sec: u64,

    /// Deadline of the liveness check
    #[serde(default = "default_health_timeout")]
    pub health_timeout_sec: u64,

    /// Retrieved documents placed in the prompt
    #[serde(default = "default_max_context_docs")]
    pub max_context_docs: usize,

    /// Characters kept from each context document
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

// Default value functions
fn default_chunk_size() -> usize {
    1000
}

fn default_overlap() -> usize {
    200
}

fn default_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/target/**".to_string(),
        "**/__pycache__/**".to_string(),
    ]
}

fn default_max_file_size() -> usize {
    100
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

fn default_service_url() -> String {
    "http://localhost:11434/api".to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_max_tokens() -> usize {
    8192
}

fn default_embedding_timeout() -> u64 {
    30
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./vector_db")
}

fn default_collection() -> String {
    "documents".to_string()
}

fn default_k() -> usize {
    5
}

fn default_max_k() -> usize {
    100
}

fn default_llm_model() -> String {
    "deepseek-r1:latest".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_health_timeout() -> u64 {
    5
}

fn default_max_context_docs() -> usize {
    3
}

fn default_preview_chars() -> usize {
    500
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            extensions: default_extensions(),
            exclude_patterns: default_exclude_patterns(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model: default_embedding_model(),
            base_url: default_service_url(),
            dimension: default_dimension(),
            max_tokens: default_max_tokens(),
            timeout_sec: default_embedding_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            collection: default_collection(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_service_url(),
            model: default_llm_model(),
            timeout_sec: default_llm_timeout(),
            health_timeout_sec: default_health_timeout(),
            max_context_docs: default_max_context_docs(),
            preview_chars: default_preview_chars(),
        }
    }
}

/// Parse an env var, ignoring unset or malformed values
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DocragError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File lookup order:
    /// 1. `DOCRAG_CONFIG` env var
    /// 2. XDG config file (`~/.config/docrag/config.toml`)
    /// 3. `./docrag.toml`
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCRAG_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("docrag.toml").exists() {
                Self::from_file("docrag.toml")?
            } else {
                Self::default()
            }
        };

        // Unset database path lands in the XDG data directory
        if config.storage.db_path == default_db_path() {
            config.storage.db_path = xdg.vector_db_dir();
        }

        config.merge_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) -> Result<()> {
        if let Some(size) = env_parse("DOCRAG_CHUNK_SIZE") {
            self.indexing.chunk_size = size;
        }
        if let Some(overlap) = env_parse("DOCRAG_OVERLAP") {
            self.indexing.overlap = overlap;
        }

        if let Ok(backend) = env::var("DOCRAG_EMBEDDING_BACKEND") {
            self.embedding.backend = backend.parse()?;
        }
        if let Ok(model) = env::var("DOCRAG_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }

        if let Ok(db_path) = env::var("DOCRAG_DB_PATH") {
            self.storage.db_path = PathBuf::from(db_path);
        }
        if let Ok(collection) = env::var("DOCRAG_COLLECTION") {
            self.storage.collection = collection;
        }

        if let Some(k) = env_parse("DOCRAG_DEFAULT_K") {
            self.search.default_k = k;
        }

        if let Ok(url) = env::var("DOCRAG_LLM_URL") {
            self.generation.base_url = url;
        }
        if let Ok(model) = env::var("DOCRAG_LLM_MODEL") {
            self.generation.model = model;
        }
        if let Some(timeout) = env_parse("DOCRAG_LLM_TIMEOUT_SEC") {
            self.generation.timeout_sec = timeout;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.chunk_size == 0 {
            return Err(DocragError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.indexing.overlap >= self.indexing.chunk_size {
            return Err(DocragError::ConfigError(
                "Overlap must be less than chunk size".to_string(),
            ));
        }

        if self.indexing.extensions.is_empty() {
            return Err(DocragError::ConfigError(
                "At least one file extension must be configured".to_string(),
            ));
        }

        if self.embedding.dimension == 0 || self.embedding.max_tokens == 0 {
            return Err(DocragError::ConfigError(
                "Embedding dimension and token limit must be non-zero".to_string(),
            ));
        }

        if self.storage.collection.trim().is_empty() {
            return Err(DocragError::ConfigError(
                "Collection name must not be empty".to_string(),
            ));
        }

        if self.search.default_k == 0 {
            return Err(DocragError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.search.default_k > self.search.max_k {
            return Err(DocragError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.embedding.timeout_sec == 0
            || self.generation.timeout_sec == 0
            || self.generation.health_timeout_sec == 0
        {
            return Err(DocragError::ConfigError(
                "Timeouts must be non-zero".to_string(),
            ));
        }

        if self.generation.max_context_docs == 0 {
            return Err(DocragError::ConfigError(
                "Max context docs must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Overlap: {} chars", self.indexing.overlap);
        tracing::info!("  Extensions: {:?}", self.indexing.extensions);
        tracing::info!("  Max file size: {} MB", self.indexing.max_file_size_mb);
        tracing::info!(
            "  Embedding: {} ({})",
            self.embedding.backend,
            self.embedding.model
        );
        tracing::info!("  DB path: {:?}", self.storage.db_path);
        tracing::info!("  Collection: {}", self.storage.collection);
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!(
            "  LLM: {} at {} ({}s timeout)",
            self.generation.model,
            self.generation.base_url,
            self.generation.timeout_sec
        );
    }
}
