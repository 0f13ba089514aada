//! Indexing orchestration.
//!
//! Coordinates the end-to-end indexing workflow for each document:
//! 1. Extract and normalize text
//! 2. Chunk text
//! 3. Embed chunks
//! 4. Store records
//!
//! A failing document is reported with the stage it failed at and
//! never stops a directory run.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::config::IndexingConfig;
use crate::core::embedding::Embedder;
use crate::core::error::{DocragError, Result};
use crate::core::indexer::extract::{self, TextExtractor};
use crate::core::indexer::{Chunker, DocumentWalker};
use crate::core::storage::VectorStore;
use crate::core::types::{
    BatchStats, ChunkerConfig, DirectoryIndexResult, EmbedderInfo, IndexResult, NewRecord,
    SourceKey, StoreStats,
};

/// Indexer readiness report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerStatus {
    pub database_stats: StoreStats,
    pub embedding_model: EmbedderInfo,
    pub chunker_config: ChunkerConfig,
    pub extensions: Vec<String>,
    pub status: String,
}

/// Runs documents through extraction, chunking, embedding and storage
pub struct IndexingOrchestrator {
    walker: DocumentWalker,
    chunker: Chunker,
    extensions: Vec<String>,
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl IndexingOrchestrator {
    /// Create an orchestrator over shared components.
    ///
    /// Fails on invalid exclude patterns or chunk settings.
    pub fn new(
        config: &IndexingConfig,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        if config.chunk_size == 0 || config.overlap >= config.chunk_size {
            return Err(DocragError::ConfigError(format!(
                "Invalid chunking: size {} overlap {}",
                config.chunk_size, config.overlap
            )));
        }

        let walker = DocumentWalker::new(
            &config.extensions,
            &config.exclude_patterns,
            config.max_file_size_mb,
        )?;

        Ok(Self {
            walker,
            chunker: Chunker::new(config.chunk_size, config.overlap),
            extensions: config.extensions.clone(),
            extractor,
            embedder,
            store,
        })
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Index one document
    pub fn index_document(&self, path: &Path) -> IndexResult {
        let start = Instant::now();
        tracing::info!("Indexing document {:?}", path);

        match self.process_document(path) {
            Ok(result) => {
                tracing::info!(
                    "Indexed {:?}: {} chunks in {}ms",
                    path,
                    result.chunks_created,
                    start.elapsed().as_millis()
                );
                result
            }
            Err(e) => {
                tracing::warn!("Failed to index {:?} at {}: {}", path, e.stage(), e);
                IndexResult::failure(path, e.stage(), e.message())
            }
        }
    }

    /// Index every matching document under `dir`, in sorted order
    pub fn index_directory(&self, dir: &Path) -> DirectoryIndexResult {
        let start = Instant::now();
        tracing::info!("Starting document discovery in {:?}", dir);

        let files = match self.walker.collect_documents(dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Discovery failed for {:?}: {}", dir, e);
                return Self::directory_result(dir, false, e.message(), Vec::new());
            }
        };

        if files.is_empty() {
            let message = format!("No documents found in {}", dir.display());
            tracing::warn!("{}", message);
            return Self::directory_result(dir, false, message, Vec::new());
        }
        tracing::info!("Found {} documents to index", files.len());

        let mut results = Vec::with_capacity(files.len());
        for (idx, file) in files.iter().enumerate() {
            if idx % 10 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} documents processed", idx, files.len());
            }
            results.push(self.index_document(file));
        }

        let message = format!(
            "Processed {} documents from {}",
            files.len(),
            dir.display()
        );
        let result = Self::directory_result(dir, true, message, results);

        tracing::info!(
            "Directory indexing complete: {} succeeded, {} failed, {} chunks in {}ms",
            result.stats.successful,
            result.stats.failed,
            result.stats.total_chunks,
            start.elapsed().as_millis()
        );
        result
    }

    /// Replace the records of a document with a fresh indexing run
    pub fn reindex_document(&self, path: &Path) -> IndexResult {
        let source = SourceKey::from_path(path);
        tracing::info!("Removing old chunks for {}", source);

        let removed = match self.store.delete_by_source(&source) {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!("Failed to remove old chunks of {}: {}", source, e);
                return IndexResult::failure(path, e.stage(), e.message());
            }
        };

        let mut result = self.index_document(path);
        result.old_chunks_removed = Some(removed);
        if result.success {
            result.message = format!("{} (replaced {removed} old chunks)", result.message);
        }
        result
    }

    /// Readiness report of the indexing half
    pub fn status(&self) -> Result<IndexerStatus> {
        Ok(IndexerStatus {
            database_stats: self.store.stats()?,
            embedding_model: self.embedder.info(),
            chunker_config: self.chunker.config(),
            extensions: self.extensions.clone(),
            status: "ready".to_string(),
        })
    }

    fn process_document(&self, path: &Path) -> Result<IndexResult> {
        if !self.walker.has_document_extension(path) {
            return Err(DocragError::ExtractionFailed(format!(
                "Unsupported file type: {} (expected one of {:?})",
                path.display(),
                self.extensions
            )));
        }

        let source_metadata = extract::describe(path)?;

        let raw = self.extractor.extract(path)?;
        let text = extract::normalize_text(&raw);
        if text.is_empty() {
            return Err(DocragError::EmptyContent(path.display().to_string()));
        }
        tracing::debug!("Extracted {} chars from {:?}", text.chars().count(), path);

        let chunks = self.chunker.create_chunks(&text, &source_metadata);
        if chunks.is_empty() {
            return Err(DocragError::ChunkingFailed(path.display().to_string()));
        }
        let chunk_info = Chunker::chunk_info(&chunks);
        tracing::debug!("Chunked {:?} into {} chunks", path, chunks.len());

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let vectors = self.embedder.embed_many(&texts)?;
        if vectors.len() != chunks.len() {
            return Err(DocragError::EmbeddingFailed(format!(
                "embeddings generation mismatch ({} chunks, {} embeddings)",
                chunks.len(),
                vectors.len()
            )));
        }
        tracing::debug!("Embedded {} chunks", vectors.len());

        let records: Vec<NewRecord> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| NewRecord {
                content: chunk.content.clone(),
                vector,
                metadata: chunk.metadata(),
            })
            .collect();
        let embeddings_generated = records.len();
        let doc_ids = self.store.store(&records)?;

        Ok(IndexResult {
            success: true,
            message: format!("Successfully indexed {}", path.display()),
            file_path: path.display().to_string(),
            chunks_created: chunks.len(),
            embeddings_generated,
            doc_ids,
            chunk_info: Some(chunk_info),
            failed_stage: None,
            old_chunks_removed: None,
            processing_timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    fn directory_result(
        dir: &Path,
        success: bool,
        message: String,
        processed_files: Vec<IndexResult>,
    ) -> DirectoryIndexResult {
        DirectoryIndexResult {
            success,
            message,
            directory_path: dir.display().to_string(),
            stats: BatchStats::from_results(&processed_files),
            processed_files,
            processing_timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
