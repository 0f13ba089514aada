// Integration tests for collection persistence

use crate::common::{test_config, TestLibrary};
use docrag::core::services::Services;
use docrag::core::storage::{TantivyVectorStore, VectorStore};
use tempfile::TempDir;

#[test]
fn test_index_survives_reopen() {
    let library = TestLibrary::notes();
    let data_dir = TempDir::new().unwrap();

    let indexed = {
        let services = Services::new(test_config(&data_dir)).unwrap();
        let result = services.indexer.index_directory(library.path());
        assert!(result.success);
        result.stats.total_chunks
    };

    let services = Services::new(test_config(&data_dir)).unwrap();
    let stats = services.store.stats().unwrap();
    assert_eq!(stats.total_records, indexed);
    assert_eq!(stats.distinct_sources, 3);

    let response = services.search.search("telescope galaxy", Some(1));
    assert!(response.success);
    assert!(response.sources[0].source.ends_with("astronomy.txt"));
}

#[test]
fn test_collections_are_isolated() {
    let library = TestLibrary::notes();
    let data_dir = TempDir::new().unwrap();

    let services = Services::new(test_config(&data_dir)).unwrap();
    services.indexer.index_directory(library.path());

    let mut other = test_config(&data_dir);
    other.storage.collection = "archive".to_string();
    let other = Services::new(other).unwrap();

    assert_eq!(other.store.stats().unwrap().total_records, 0);
    assert!(services.store.stats().unwrap().total_records > 0);
}

#[test]
fn test_collection_meta_records_dimension() {
    let library = TestLibrary::notes();
    let data_dir = TempDir::new().unwrap();
    let config = test_config(&data_dir);
    let services = Services::new(config.clone()).unwrap();
    services
        .indexer
        .index_document(&library.file("gardening.txt"));
    drop(services);

    let store =
        TantivyVectorStore::open(&config.storage.db_path, &config.storage.collection).unwrap();
    let meta = store.meta().unwrap();
    assert_eq!(meta.name, "documents");
    assert_eq!(meta.dimension, Some(config.embedding.dimension));
    assert!(store
        .records()
        .unwrap()
        .iter()
        .all(|r| r.vector.len() == config.embedding.dimension));
}
