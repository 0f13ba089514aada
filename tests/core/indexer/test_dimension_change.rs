// Integration tests for indexing into a collection built with another embedder

use crate::common::{test_config, TestLibrary};
use docrag::core::services::Services;
use docrag::core::Stage;
use docrag::SourceKey;
use tempfile::TempDir;

fn services_with_dimension(data_dir: &TempDir, dimension: usize) -> Services {
    let mut config = test_config(data_dir);
    config.embedding.dimension = dimension;
    Services::new(config).unwrap()
}

#[test]
fn test_reindex_after_dimension_change_fails_at_storage() {
    let library = TestLibrary::notes();
    let data_dir = TempDir::new().unwrap();

    let original = services_with_dimension(&data_dir, 384);
    let indexed = original.indexer.index_directory(library.path());
    assert_eq!(indexed.stats.successful, 3);
    let before = original.store.stats().unwrap();

    let resized = services_with_dimension(&data_dir, 64);
    let path = library.file("cooking.txt");
    let result = resized.indexer.reindex_document(&path);

    assert!(!result.success);
    assert_eq!(result.failed_stage, Some(Stage::Storage));
    assert!(result.doc_ids.is_empty());
    assert!(result.old_chunks_removed.is_some());

    // Old chunks are gone and none of the new ones were written
    let records = resized.store.stats().unwrap();
    let removed = result.old_chunks_removed.unwrap_or_default();
    assert_eq!(records.total_records, before.total_records - removed);
    assert_eq!(records.distinct_sources, 2);

    let cooking = SourceKey::from_path(&path);
    let hits = original.search.search("bread dough oven", Some(10));
    assert!(hits.success);
    assert!(hits.sources.iter().all(|s| s.source != cooking.as_str()));
}

#[test]
fn test_new_document_with_other_dimension_is_not_stored() {
    let mut library = TestLibrary::notes();
    let data_dir = TempDir::new().unwrap();

    let original = services_with_dimension(&data_dir, 384);
    original.indexer.index_document(&library.file("astronomy.txt"));
    let before = original.store.stats().unwrap();

    let extra = library.add_bytes("extra.txt", "A fresh note about comets and orbits.".as_bytes());
    let resized = services_with_dimension(&data_dir, 64);
    let result = resized.indexer.index_document(&extra);

    assert!(!result.success);
    assert_eq!(result.failed_stage, Some(Stage::Storage));
    assert_eq!(resized.store.stats().unwrap(), before);
}
