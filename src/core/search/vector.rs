//! Nearest-neighbour retrieval of chunks for a query.

use crate::core::embedding::Embedder;
use crate::core::error::{DocragError, Result};
use crate::core::search::QueryProcessor;
use crate::core::storage::VectorStore;
use crate::core::types::{preview, RankedResult};
use std::sync::Arc;

/// Characters kept in a ranked result's preview
pub const RESULT_PREVIEW_CHARS: usize = 200;

/// Normalizes, embeds and looks up a query
pub struct VectorSearcher {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    processor: QueryProcessor,
}

impl VectorSearcher {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            processor: QueryProcessor::new(),
        }
    }

    /// Top `k` chunks for `query`, ranked from 1.
    ///
    /// Errors carry their stage: `InvalidQuery` when nothing is left
    /// after normalization, `EmbeddingFailed` from the embedder and
    /// `RetrievalFailed` from the store.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<RankedResult>> {
        let processed = self.processor.process(query);
        if !processed.accepted {
            return Err(DocragError::InvalidQuery(query.to_string()));
        }

        let vector = self.embedder.embed_one(&processed.normalized_query)?;

        let matches = self
            .store
            .query_similar(&vector, k)
            .map_err(|e| DocragError::RetrievalFailed(e.to_string()))?;

        tracing::debug!(
            "Retrieved {} chunks for '{}'",
            matches.len(),
            processed.normalized_query
        );

        Ok(matches
            .into_iter()
            .enumerate()
            .map(|(i, m)| RankedResult {
                rank: i + 1,
                content: preview(&m.content, RESULT_PREVIEW_CHARS),
                full_content: m.content,
                metadata: m.metadata,
                similarity: m.similarity,
            })
            .collect())
    }
}
