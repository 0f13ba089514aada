// Integration tests for search functionality

use crate::common::{create_test_services, create_test_services_with, StubProvider, TestLibrary};
use docrag::core::search::NO_CONTEXT_ANSWER;
use docrag::core::Stage;

#[test]
fn test_search_ranks_relevant_document_first() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    ts.services.indexer.index_directory(library.path());

    let response = ts
        .services
        .search
        .search("Which galaxy did the telescope observe?", Some(3));

    assert!(response.success);
    assert!(!response.fallback_used);
    assert_eq!(response.answer.as_deref(), Some("stub answer"));
    assert_eq!(response.documents_retrieved, response.sources.len());
    assert!(response.sources[0].source.ends_with("astronomy.txt"));
    assert_eq!(
        response.query_processed.as_deref(),
        Some("which galaxy did the telescope observe")
    );
}

#[test]
fn test_search_sources_ordered_by_similarity() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    ts.services.indexer.index_directory(library.path());

    let response = ts.services.search.search("bread oven dough", Some(5));

    assert!(response.success);
    for pair in response.sources.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    for source in &response.sources {
        assert!((0.0..=1.0).contains(&source.similarity));
    }
}

#[test]
fn test_search_prompt_carries_context() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    ts.services.indexer.index_directory(library.path());

    ts.services.search.search("tomato watering", Some(1));

    let prompt = ts.provider.last_prompt.lock().unwrap().clone();
    assert!(prompt.starts_with("Context: "));
    assert!(prompt.contains("Question: tomato watering"));
    assert!(prompt.ends_with("Answer:"));
    assert!(prompt.contains("Tomato plants"));
}

#[test]
fn test_search_k_is_capped() {
    let library = TestLibrary::notes();
    let ts = create_test_services_with(StubProvider::answering("ok"), |config| {
        config.search.max_k = 2;
    });
    ts.services.indexer.index_directory(library.path());

    let response = ts.services.search.search("galaxy", Some(50));

    assert!(response.success);
    assert_eq!(response.documents_retrieved, 2);
}

#[test]
fn test_search_empty_collection() {
    let ts = create_test_services();

    let response = ts.services.search.search("anything at all", None);

    assert!(response.success);
    assert_eq!(response.documents_retrieved, 0);
    assert!(response.sources.is_empty());
    assert_eq!(response.answer.as_deref(), Some(NO_CONTEXT_ANSWER));
    assert_eq!(ts.provider.call_count(), 0);
}

#[test]
fn test_search_rejects_blank_query() {
    let ts = create_test_services();

    let response = ts.services.search.search("   ?! ", None);

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Invalid query"));
    assert_eq!(response.failed_stage, Some(Stage::Validation));
    assert!(response.answer.is_none());
    assert_eq!(ts.provider.call_count(), 0);
}

#[test]
fn test_search_after_source_deleted() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    ts.services.indexer.index_directory(library.path());

    let key = docrag::SourceKey::from_path(&library.file("astronomy.txt"));
    let removed = ts.services.store.delete_by_source(&key).unwrap();
    assert!(removed >= 1);

    let response = ts.services.search.search("galaxy telescope redshift", Some(10));
    assert!(response
        .sources
        .iter()
        .all(|s| !s.source.ends_with("astronomy.txt")));
}

#[test]
fn test_explain_lists_keywords() {
    let ts = create_test_services();

    let explanation = ts
        .services
        .search
        .explain("How do spectral lines reveal redshift?");

    assert!(explanation.success);
    assert!(explanation.keywords.len() <= 5);
    assert!(explanation.keywords.contains(&"spectral".to_string()));
    assert_eq!(explanation.model, "stub-model");
    assert!(!explanation.steps.is_empty());
}
