// Integration tests for directory indexing

use crate::common::{assert_valid_batch, create_test_services, TestLibrary};
use docrag::core::Stage;

#[test]
fn test_directory_with_broken_documents() {
    let library = TestLibrary::with_broken_documents();
    let ts = create_test_services();

    let result = ts.services.indexer.index_directory(library.path());

    assert!(result.success);
    assert_eq!(result.stats.total_files, 5);
    assert_eq!(result.stats.successful, 3);
    assert_eq!(result.stats.failed, 2);
    assert_eq!(result.stats.success_rate, 60.0);
    assert_valid_batch(&result.stats);
    assert_eq!(
        result.message,
        format!("Processed 5 documents from {}", library.path().display())
    );

    let failures: Vec<_> = result
        .processed_files
        .iter()
        .filter(|r| !r.success)
        .collect();
    assert_eq!(failures.len(), 2);
    for failure in failures {
        assert_eq!(failure.failed_stage, Some(Stage::Extraction));
        assert_eq!(failure.chunks_created, 0);
        assert!(failure.doc_ids.is_empty());
    }
}

#[test]
fn test_directory_chunks_land_in_store() {
    let library = TestLibrary::notes();
    let ts = create_test_services();

    let result = ts.services.indexer.index_directory(library.path());
    let stats = ts.services.store.stats().unwrap();

    assert_eq!(result.stats.successful, 3);
    assert_eq!(stats.total_records, result.stats.total_chunks);
    assert_eq!(stats.distinct_sources, 3);

    let ids: usize = result.processed_files.iter().map(|r| r.doc_ids.len()).sum();
    assert_eq!(ids, result.stats.total_chunks);
}

#[test]
fn test_directory_results_are_sorted() {
    let library = TestLibrary::notes();
    let ts = create_test_services();

    let result = ts.services.indexer.index_directory(library.path());
    let paths: Vec<&str> = result
        .processed_files
        .iter()
        .map(|r| r.file_path.as_str())
        .collect();
    let mut sorted = paths.clone();
    sorted.sort();

    assert_eq!(paths, sorted);
}

#[test]
fn test_directory_without_documents() {
    let library = TestLibrary::with_files(&[("notes.md", "# not indexed")]);
    let ts = create_test_services();

    let result = ts.services.indexer.index_directory(library.path());

    assert!(!result.success);
    assert!(result.message.starts_with("No documents found in"));
    assert_eq!(result.stats.total_files, 0);
    assert_eq!(result.stats.success_rate, 0.0);
}

#[test]
fn test_directory_missing() {
    let ts = create_test_services();
    let missing = ts.data_dir.path().join("does-not-exist");

    let result = ts.services.indexer.index_directory(&missing);

    assert!(!result.success);
    assert!(result.processed_files.is_empty());
}

#[test]
fn test_document_result_fields() {
    let library = TestLibrary::notes();
    let ts = create_test_services();

    let result = ts
        .services
        .indexer
        .index_document(&library.file("astronomy.txt"));

    assert!(result.success);
    assert!(result.chunks_created >= 1);
    assert_eq!(result.embeddings_generated, result.chunks_created);
    assert_eq!(result.doc_ids.len(), result.chunks_created);
    assert!(result.old_chunks_removed.is_none());
    let info = result.chunk_info.expect("chunk info on success");
    assert_eq!(info.total_chunks, result.chunks_created);
}
