//! Unified service container for docrag
//!
//! Builds the shared components once and hands the same store and
//! embedder to both the indexing and the search orchestrator.

use crate::core::config::Config;
use crate::core::embedding::{self, Embedder};
use crate::core::error::Result;
use crate::core::indexer::{DocumentExtractor, IndexerStatus, IndexingOrchestrator};
use crate::core::search::{
    Generator, LlmProvider, OllamaProvider, SearchOrchestrator, VectorSearcher,
};
use crate::core::storage::{TantivyVectorStore, VectorStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Generation service availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmStatus {
    pub model: String,
    pub base_url: String,
    pub available: bool,
}

/// Whole-system status report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    pub system_status: String,
    pub config: Config,
    pub indexer: IndexerStatus,
    pub llm: LlmStatus,
}

/// Unified services container
#[derive(Clone)]
pub struct Services {
    pub config: Arc<Config>,
    pub store: Arc<dyn VectorStore>,
    pub embedder: Arc<dyn Embedder>,
    pub indexer: Arc<IndexingOrchestrator>,
    pub search: Arc<SearchOrchestrator>,
}

impl Services {
    /// Create services from configuration.
    ///
    /// Opens (or creates) the configured collection.
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn VectorStore> = Arc::new(TantivyVectorStore::open(
            &config.storage.db_path,
            &config.storage.collection,
        )?);
        let embedder = embedding::from_config(&config.embedding)?;
        let provider: Arc<dyn LlmProvider> = Arc::new(OllamaProvider::new(&config.generation)?);

        Self::with_components(config, store, embedder, provider)
    }

    /// Wire orchestrators around explicit components
    pub fn with_components(
        config: Config,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        provider: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let indexer = Arc::new(IndexingOrchestrator::new(
            &config.indexing,
            Arc::new(DocumentExtractor::new()),
            Arc::clone(&embedder),
            Arc::clone(&store),
        )?);

        let generator = Generator::new(
            provider,
            config.generation.max_context_docs,
            config.generation.preview_chars,
        );
        let search = Arc::new(SearchOrchestrator::new(
            VectorSearcher::new(Arc::clone(&store), Arc::clone(&embedder)),
            generator,
            config.search.default_k,
            config.search.max_k,
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            embedder,
            indexer,
            search,
        })
    }

    /// Report configuration, index contents and LLM availability
    pub fn status(&self) -> Result<SystemStatus> {
        let generator = self.search.generator();

        Ok(SystemStatus {
            system_status: "operational".to_string(),
            config: (*self.config).clone(),
            indexer: self.indexer.status()?,
            llm: LlmStatus {
                model: generator.model().to_string(),
                base_url: self.config.generation.base_url.clone(),
                available: generator.is_available(),
            },
        })
    }
}
