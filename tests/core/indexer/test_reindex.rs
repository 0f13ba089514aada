// Integration tests for replacing a document's chunks

use crate::common::{create_test_services, TestLibrary};

#[test]
fn test_reindex_replaces_old_chunks() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    let path = library.file("cooking.txt");

    let first = ts.services.indexer.index_document(&path);
    assert!(first.success);

    library.rewrite("cooking.txt", &"Simmer the soup slowly. ".repeat(30));
    let second = ts.services.indexer.reindex_document(&path);

    assert!(second.success);
    assert_eq!(second.old_chunks_removed, Some(first.chunks_created));
    assert!(second.message.ends_with(&format!(
        "(replaced {} old chunks)",
        first.chunks_created
    )));

    let stats = ts.services.store.stats().unwrap();
    assert_eq!(stats.total_records, second.chunks_created);
    assert_eq!(stats.distinct_sources, 1);
}

#[test]
fn test_reindex_never_indexed_document() {
    let library = TestLibrary::notes();
    let ts = create_test_services();

    let result = ts
        .services
        .indexer
        .reindex_document(&library.file("gardening.txt"));

    assert!(result.success);
    assert_eq!(result.old_chunks_removed, Some(0));
}

#[test]
fn test_reindex_leaves_other_documents() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    ts.services.indexer.index_directory(library.path());
    let before = ts.services.store.stats().unwrap();

    let result = ts
        .services
        .indexer
        .reindex_document(&library.file("astronomy.txt"));

    assert!(result.success);
    let after = ts.services.store.stats().unwrap();
    assert_eq!(after.distinct_sources, before.distinct_sources);
    assert_eq!(after.total_records, before.total_records);
}
