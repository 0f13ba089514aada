//! Core data types for the docrag pipeline.
//!
//! This module defines the data structures shared by the indexing
//! and searching halves of the pipeline: chunks and their source
//! metadata, stored records, search results, and the result
//! payloads consumed by front ends.

use crate::core::error::Stage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Flat string metadata attached to every stored record
pub type Metadata = BTreeMap<String, String>;

/// Fixed-length embedding vector
pub type EmbeddingVector = Vec<f32>;

/// Metadata key holding the source identifier
pub const SOURCE_KEY: &str = "source";

/// Metadata key holding the chunk position within its document
pub const CHUNK_ID_KEY: &str = "chunk_id";

/// Canonical identifier of a source document.
///
/// Built from an absolute, canonicalized path so that deleting by
/// source matches regardless of how the path was spelled when the
/// document was indexed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceKey(String);

impl SourceKey {
    /// Wrap an already-normalized key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Build the key for a document path.
    ///
    /// Falls back to the lexically absolute path when the file no
    /// longer exists (e.g. deleting records of a removed file).
    pub fn from_path(path: &Path) -> Self {
        let resolved = path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| PathBuf::from(path))
            }
        });
        Self(resolved.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provenance of a document, copied into each of its chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Deletion key for the document
    pub source: SourceKey,

    /// File name without directories
    pub filename: String,

    /// Lowercased file extension
    pub extension: String,

    /// File size in bytes
    pub file_size: u64,

    /// Indexing timestamp (RFC 3339)
    pub indexed_at: String,
}

impl SourceMetadata {
    /// Flatten into the string map persisted with each record
    pub fn to_map(&self) -> Metadata {
        let mut map = Metadata::new();
        map.insert(SOURCE_KEY.to_string(), self.source.to_string());
        map.insert("filename".to_string(), self.filename.clone());
        map.insert("extension".to_string(), self.extension.clone());
        map.insert("file_size".to_string(), self.file_size.to_string());
        map.insert("indexed_at".to_string(), self.indexed_at.clone());
        map
    }
}

/// A single text chunk from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// The actual text content
    pub content: String,

    /// Provenance of the document the chunk came from
    pub source_metadata: SourceMetadata,

    /// Zero-based position among the chunks of the same document
    pub sequence_index: usize,

    /// Byte offset where chunk starts in the normalized text
    pub start_offset: usize,

    /// Byte offset where chunk ends in the normalized text
    pub end_offset: usize,
}

impl Chunk {
    /// Metadata persisted alongside the chunk's vector
    pub fn metadata(&self) -> Metadata {
        let mut map = self.source_metadata.to_map();
        map.insert(CHUNK_ID_KEY.to_string(), self.sequence_index.to_string());
        map
    }

    /// Length of the content in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Record handed to the vector store
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub content: String,
    pub vector: EmbeddingVector,
    pub metadata: Metadata,
}

/// Record persisted in a collection
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Generated at store time, unique within the collection
    pub id: String,
    pub vector: EmbeddingVector,
    pub content: String,
    pub metadata: Metadata,
}

/// Nearest-neighbour match returned by the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    pub metadata: Metadata,

    /// `1 - distance`, in `[0, 1]`
    pub similarity: f32,
}

impl SearchResult {
    /// Source identifier, or `"Unknown"` when the record has none
    pub fn source(&self) -> &str {
        self.metadata
            .get(SOURCE_KEY)
            .map(String::as_str)
            .unwrap_or("Unknown")
    }
}

/// Search result with its 1-based rank attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub rank: usize,

    /// Short preview of the content
    pub content: String,

    pub full_content: String,
    pub metadata: Metadata,
    pub similarity: f32,
}

impl RankedResult {
    pub fn source(&self) -> &str {
        self.metadata
            .get(SOURCE_KEY)
            .map(String::as_str)
            .unwrap_or("Unknown")
    }
}

/// Collection statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_records: usize,
    pub distinct_sources: usize,
    pub collection_name: String,
    pub location: String,
}

/// Aggregate chunk statistics for observability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    pub total_chunks: usize,
    pub avg_chunk_size: usize,
}

/// Chunker settings as reported by status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
}

/// Embedding model description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderInfo {
    pub name: String,
    pub model: String,
    pub embedding_dimension: usize,
}

/// Source entry of a search answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub source: String,
    pub similarity: f32,
    pub preview: String,
}

/// Outcome of indexing a single document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResult {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub chunks_created: usize,
    pub embeddings_generated: usize,
    pub doc_ids: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_info: Option<ChunkInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<Stage>,

    /// Set by reindexing only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_chunks_removed: Option<usize>,

    pub processing_timestamp: String,
}

impl IndexResult {
    /// Document-level failure at the given stage
    pub fn failure(file_path: &Path, stage: Stage, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            file_path: file_path.display().to_string(),
            chunks_created: 0,
            embeddings_generated: 0,
            doc_ids: Vec::new(),
            chunk_info: None,
            failed_stage: Some(stage),
            old_chunks_removed: None,
            processing_timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Aggregate statistics of a directory run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_chunks: usize,

    /// Percentage of files indexed successfully, 2 decimals
    pub success_rate: f64,
}

impl BatchStats {
    /// Compute statistics over per-document results
    pub fn from_results(results: &[IndexResult]) -> Self {
        if results.is_empty() {
            return Self {
                total_files: 0,
                successful: 0,
                failed: 0,
                total_chunks: 0,
                success_rate: 0.0,
            };
        }

        let successful = results.iter().filter(|r| r.success).count();
        let total_chunks = results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.chunks_created)
            .sum();
        let rate = successful as f64 / results.len() as f64 * 100.0;

        Self {
            total_files: results.len(),
            successful,
            failed: results.len() - successful,
            total_chunks,
            success_rate: (rate * 100.0).round() / 100.0,
        }
    }
}

/// Outcome of indexing a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryIndexResult {
    pub success: bool,
    pub message: String,
    pub directory_path: String,
    pub processed_files: Vec<IndexResult>,
    pub stats: BatchStats,
    pub processing_timestamp: String,
}

/// Outcome of a search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    pub sources: Vec<SourceDescriptor>,

    /// Wall-clock seconds, 2 decimals
    pub elapsed_time: f64,

    pub documents_retrieved: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_processed: Option<String>,

    pub fallback_used: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<Stage>,
}

/// Truncate to `max_chars` characters, appending `...` when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
