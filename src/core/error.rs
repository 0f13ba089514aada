//! Error types and error handling for the docrag pipeline.
//!
//! This module defines the error taxonomy used throughout the
//! retrieval and indexing pipelines. Every variant maps to the
//! pipeline [`Stage`] that raised it so orchestrators can report
//! `failed(stage, message)` without string matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for docrag operations
pub type Result<T> = std::result::Result<T, DocragError>;

/// Main error type for the docrag pipeline
#[derive(Error, Debug)]
pub enum DocragError {
    #[error("Failed to extract text: {0}")]
    ExtractionFailed(String),

    #[error("No text content found in document: {0}")]
    EmptyContent(String),

    #[error("No chunks created from text: {0}")]
    ChunkingFailed(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Vector store error: {0}")]
    StoreFailed(String),

    #[error("Retrieval failed: {0}")]
    RetrievalFailed(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Pipeline stage at which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Extraction,
    Chunking,
    Embedding,
    Storage,
    Retrieval,
    Generation,
    Configuration,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Extraction => "extraction",
            Stage::Chunking => "chunking",
            Stage::Embedding => "embedding",
            Stage::Storage => "storage",
            Stage::Retrieval => "retrieval",
            Stage::Generation => "generation",
            Stage::Configuration => "configuration",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DocragError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Pipeline stage this error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            DocragError::ExtractionFailed(_) | DocragError::EmptyContent(_) => Stage::Extraction,
            DocragError::ChunkingFailed(_) => Stage::Chunking,
            DocragError::EmbeddingFailed(_) => Stage::Embedding,
            DocragError::StoreFailed(_) | DocragError::SerdeError(_) => Stage::Storage,
            DocragError::RetrievalFailed(_) => Stage::Retrieval,
            DocragError::GenerationFailed(_) => Stage::Generation,
            DocragError::InvalidQuery(_) => Stage::Validation,
            DocragError::ConfigError(_) | DocragError::TomlError(_) => Stage::Configuration,
            DocragError::IoError(_) => Stage::Storage,
        }
    }
}
