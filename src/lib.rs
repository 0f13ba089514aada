//! docrag - Retrieval-Augmented Question Answering over Documents
//!
//! Indexes PDF collections into a local vector store and answers
//! questions from the most similar chunks, using a local LLM when
//! one is reachable and the raw retrieved context when it is not.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - indexer (extraction, chunking, indexing orchestration)
//!   - embedding (hash and Ollama backends)
//!   - storage (Tantivy vector collections)
//!   - search (query processing, retrieval, generation)
//!   - services (unified service container)
//!
//! - **cli**: `docrag` command-line front end (depends on core)
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - Exact cosine retrieval over a persistent collection
//! - Grounded generation with deterministic fallback
//! - Per-document failure reporting during batch indexing

// Core domain logic
pub mod core;

// Command-line front end
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{DocragError, Result, Stage};
pub use core::services::Services;
pub use core::types::*;
