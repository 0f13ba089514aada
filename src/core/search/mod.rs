//! Retrieval and answer generation.
//!
//! - [`QueryProcessor`]: query normalization
//! - [`VectorSearcher`]: embedding and nearest-neighbour lookup
//! - [`Generator`]: grounded answers with fallback
//! - [`SearchOrchestrator`]: the full question-answering flow

pub mod generator;
pub mod orchestrator;
pub mod query;
pub mod vector;

pub use generator::{
    GenerationOutcome, Generator, LlmProvider, OllamaProvider, ProviderError, NO_CONTEXT_ANSWER,
};
pub use orchestrator::{QueryExplanation, SearchOrchestrator};
pub use query::{ProcessedQuery, QueryProcessor};
pub use vector::VectorSearcher;
