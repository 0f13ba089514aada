// Integration tests for answering without a generation service

use crate::common::{create_test_services_with, StubProvider, TestLibrary};

#[test]
fn test_unreachable_llm_falls_back_to_context() {
    let library = TestLibrary::notes();
    let ts = create_test_services_with(StubProvider::unreachable(), |_| {});
    ts.services.indexer.index_directory(library.path());

    let response = ts.services.search.search("bread dough kitchen", Some(2));

    assert!(response.success);
    assert!(response.fallback_used);
    assert_eq!(ts.provider.call_count(), 1);

    let answer = response.answer.expect("fallback answer");
    assert!(answer.starts_with(
        "Based on the retrieved documents, here's the relevant information for your question 'bread dough kitchen':"
    ));
    assert!(answer.contains("Retrieved Context:"));
    assert!(answer.contains("connection refused"));
    assert!(answer.contains("'stub-model'"));
}

#[test]
fn test_status_reports_unavailable_llm() {
    let ts = create_test_services_with(StubProvider::unreachable(), |_| {});

    let status = ts.services.status().unwrap();

    assert_eq!(status.system_status, "operational");
    assert!(!status.llm.available);
    assert_eq!(status.llm.model, "stub-model");
    assert_eq!(status.indexer.status, "ready");
}
