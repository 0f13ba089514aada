//! Indexer layer tests
//!
//! Directory indexing with mixed outcomes, single documents, reindexing
//! and non-ASCII content.

mod test_dimension_change;
mod test_directory;
mod test_reindex;
mod test_unicode;
