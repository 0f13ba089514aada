//! Persistent vector storage.
//!
//! Chunks are persisted as records `{id, vector, content, metadata}`
//! inside a named collection. Nearest-neighbour lookup is an exact
//! cosine scan; deletion is keyed on the record's source.
//!
//! # Collection Layout
//!
//! ```text
//! {location}/
//! └── {collection}/
//!     ├── meta.json           # name, metric, dimension, next_seq, created_at
//!     └── index/              # Tantivy index
//!         ├── meta.json
//!         └── [segment files]
//! ```

mod tantivy;

pub use self::tantivy::{CollectionMeta, TantivyVectorStore};

use crate::core::error::Result;
use crate::core::types::{NewRecord, SearchResult, SourceKey, StoreStats};

/// Storage of embedded chunks
pub trait VectorStore: Send + Sync {
    /// Persist a batch of records, all or nothing.
    ///
    /// Returns the generated ids in input order.
    fn store(&self, records: &[NewRecord]) -> Result<Vec<String>>;

    /// Up to `k` records nearest to `vector`, most similar first.
    ///
    /// Ties keep insertion order. Empty when the collection is empty
    /// or `k == 0`.
    fn query_similar(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    /// Remove every record whose source is `source`, returning the
    /// number removed.
    fn delete_by_source(&self, source: &SourceKey) -> Result<usize>;

    fn stats(&self) -> Result<StoreStats>;
}

/// Cosine similarity rescaled to `[0, 1]`.
///
/// Equals `1 - d` where `d = (1 - cos) / 2` is the rescaled cosine
/// distance. A zero vector on either side has cosine 0, i.e.
/// similarity 0.5.
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let cos = if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    };

    ((1.0 + cos) / 2.0).clamp(0.0, 1.0)
}
