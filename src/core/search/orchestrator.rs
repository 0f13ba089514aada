//! End-to-end question answering.
//!
//! A search moves through `received → query_validated → retrieved →
//! context_assembled → answered`, or stops at `failed(stage)`. The
//! caller always receives a [`SearchResponse`]; failures are reported
//! inside it.

use crate::core::error::{DocragError, Stage};
use crate::core::search::generator::Generator;
use crate::core::search::{QueryProcessor, VectorSearcher};
use crate::core::types::{preview, SearchResponse, SourceDescriptor};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Characters kept in a source preview
pub const SOURCE_PREVIEW_CHARS: usize = 100;

/// Keywords reported by [`SearchOrchestrator::explain`]
pub const MAX_KEYWORDS: usize = 5;

/// Description of how a query would be processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryExplanation {
    pub success: bool,
    pub query: String,
    pub normalized_query: String,
    pub keywords: Vec<String>,
    pub steps: Vec<String>,
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct SearchOrchestrator {
    searcher: VectorSearcher,
    generator: Generator,
    processor: QueryProcessor,
    default_k: usize,
    max_k: usize,
}

impl SearchOrchestrator {
    pub fn new(
        searcher: VectorSearcher,
        generator: Generator,
        default_k: usize,
        max_k: usize,
    ) -> Self {
        Self {
            searcher,
            generator,
            processor: QueryProcessor::new(),
            default_k,
            max_k,
        }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Answer `query` from the top `k` chunks (default when `None`,
    /// capped at the configured maximum).
    pub fn search(&self, query: &str, k: Option<usize>) -> SearchResponse {
        let start = Instant::now();
        let k = k.unwrap_or(self.default_k).min(self.max_k);
        tracing::info!("Search received: '{}' (k={})", query, k);

        let processed = self.processor.process(query);
        if !processed.accepted {
            tracing::warn!("Rejected query '{}'", query);
            return Self::failure(query, "Invalid query".to_string(), Stage::Validation, start);
        }
        tracing::debug!("Query validated: '{}'", processed.normalized_query);

        let results = match self.searcher.search(&processed.normalized_query, k) {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Search failed at {}: {}", e.stage(), e);
                return Self::failure(query, Self::failure_message(&e), e.stage(), start);
            }
        };
        tracing::info!("Retrieved {} chunks", results.len());

        let sources: Vec<SourceDescriptor> = results
            .iter()
            .map(|r| SourceDescriptor {
                source: r.source().to_string(),
                similarity: r.similarity,
                preview: preview(&r.full_content, SOURCE_PREVIEW_CHARS),
            })
            .collect();
        tracing::debug!("Context assembled from {} sources", sources.len());

        let outcome = self.generator.generate(query, &results);
        tracing::info!(
            "Answered (fallback: {}) in {:.2}s",
            outcome.fallback_used(),
            start.elapsed().as_secs_f64()
        );

        SearchResponse {
            success: true,
            query: query.to_string(),
            answer: Some(outcome.text().to_string()),
            sources,
            elapsed_time: round2(start.elapsed().as_secs_f64()),
            documents_retrieved: results.len(),
            query_processed: Some(processed.normalized_query),
            fallback_used: outcome.fallback_used(),
            message: None,
            failed_stage: None,
        }
    }

    /// Describe the processing steps for `query` without running it
    pub fn explain(&self, query: &str) -> QueryExplanation {
        let processed = self.processor.process(query);
        let model = self.generator.model().to_string();

        if !processed.accepted {
            return QueryExplanation {
                success: false,
                query: query.to_string(),
                normalized_query: processed.normalized_query,
                keywords: Vec::new(),
                steps: Vec::new(),
                model,
                message: Some("Invalid query".to_string()),
            };
        }

        let steps = vec![
            "Normalize the query (strip punctuation, collapse whitespace, lowercase)".to_string(),
            format!("Embed the normalized query '{}'", processed.normalized_query),
            format!("Find the {} nearest chunks in the vector store", self.default_k),
            "Rank matches by similarity and assemble the context".to_string(),
            format!("Generate a grounded answer with '{model}'"),
            "Fall back to the raw context if the model is unavailable".to_string(),
        ];

        QueryExplanation {
            success: true,
            query: query.to_string(),
            keywords: self
                .processor
                .keywords(&processed.normalized_query, MAX_KEYWORDS),
            normalized_query: processed.normalized_query,
            steps,
            model,
            message: None,
        }
    }

    fn failure_message(err: &DocragError) -> String {
        match err {
            DocragError::InvalidQuery(_) => "Invalid query".to_string(),
            other => format!("Search failed: {other}"),
        }
    }

    fn failure(query: &str, message: String, stage: Stage, start: Instant) -> SearchResponse {
        SearchResponse {
            success: false,
            query: query.to_string(),
            answer: None,
            sources: Vec::new(),
            elapsed_time: round2(start.elapsed().as_secs_f64()),
            documents_retrieved: 0,
            query_processed: None,
            fallback_used: false,
            message: Some(message),
            failed_stage: Some(stage),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
