//! Document indexing module.
//!
//! Turns document files into stored, embedded chunks. Key features:
//!
//! - PDF and plain-text extraction with text normalization
//! - UTF-8 safe, separator-aware chunking with overlap
//! - Recursive document discovery by extension
//! - Per-document failure reporting with the failing stage
//!
//! # Safety
//!
//! The chunker slices on `char_indices()` boundaries, so documents
//! containing emojis or other multi-byte sequences never cause a
//! slicing panic.

pub mod chunker;
pub mod extract;
pub mod pipeline;
pub mod walker;

pub use chunker::Chunker;
pub use extract::{DocumentExtractor, TextExtractor};
pub use pipeline::{IndexerStatus, IndexingOrchestrator};
pub use walker::DocumentWalker;
