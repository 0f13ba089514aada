// Integration tests for searches that fail before generation

use crate::common::{create_test_services, create_test_services_with, StubProvider};
use docrag::core::storage::{TantivyVectorStore, VectorStore};
use docrag::core::Stage;
use docrag::{Metadata, NewRecord, SOURCE_KEY};

#[test]
fn test_search_against_collection_of_other_dimension() {
    let ts = create_test_services();
    let config = &ts.services.config;

    // Fill the collection through a second handle with 2-dim vectors
    let other =
        TantivyVectorStore::open(&config.storage.db_path, &config.storage.collection).unwrap();
    let mut metadata = Metadata::new();
    metadata.insert(SOURCE_KEY.to_string(), "/elsewhere/notes.txt".to_string());
    other
        .store(&[NewRecord {
            content: "written by another embedder".to_string(),
            vector: vec![1.0, 0.0],
            metadata,
        }])
        .unwrap();

    let response = ts.services.search.search("another embedder", Some(3));

    assert!(!response.success);
    assert_eq!(response.failed_stage, Some(Stage::Retrieval));
    assert!(response.answer.is_none());
    assert!(response.sources.is_empty());
    assert!(response.message.is_some());
    assert_eq!(ts.provider.call_count(), 0);
}

#[test]
fn test_search_query_over_token_limit() {
    let ts = create_test_services_with(StubProvider::answering("unused"), |config| {
        config.embedding.max_tokens = 3;
    });

    let response = ts.services.search.search("one two three four five", None);

    assert!(!response.success);
    assert_eq!(response.failed_stage, Some(Stage::Embedding));
    assert!(response.answer.is_none());
    assert_eq!(ts.provider.call_count(), 0);
}
