//! Core domain logic (front-end agnostic)
//!
//! This module contains the whole retrieval-augmented pipeline,
//! independent of the CLI that drives it.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types, stages and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **indexer**: Extraction, chunking and indexing orchestration
//! - **embedding**: Text embedding backends
//! - **storage**: Tantivy-backed vector collections
//! - **search**: Query processing, retrieval and generation
//! - **services**: Unified service container

pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocragError, Result, Stage};
pub use services::Services;
