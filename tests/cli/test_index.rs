//! Tests for the index commands

use crate::common::{create_test_services, TestLibrary};
use docrag::cli::commands::index::{
    execute, execute_document, execute_reindex, IndexArgs, IndexDocumentArgs, ReindexArgs,
};
use docrag::cli::commands::ReportedFailure;
use docrag::cli::OutputFormat;

fn index_args(path: std::path::PathBuf) -> IndexArgs {
    IndexArgs {
        path,
        chunk_size: None,
        overlap: None,
        extensions: Vec::new(),
        exclude: Vec::new(),
        quiet: true,
    }
}

#[test]
fn test_index_command_succeeds_with_partial_failures() {
    let library = TestLibrary::with_broken_documents();
    let ts = create_test_services();

    let result = execute(
        index_args(library.path().to_path_buf()),
        &ts.services,
        OutputFormat::Json,
    );

    assert!(result.is_ok());
    assert_eq!(ts.services.store.stats().unwrap().distinct_sources, 3);
}

#[test]
fn test_index_command_empty_directory_fails() {
    let library = TestLibrary::with_files(&[]);
    let ts = create_test_services();

    let err = execute(
        index_args(library.path().to_path_buf()),
        &ts.services,
        OutputFormat::Human,
    )
    .unwrap_err();

    assert!(err.downcast_ref::<ReportedFailure>().is_some());
    assert!(err.to_string().starts_with("No documents found in"));
}

#[test]
fn test_index_document_command_failure() {
    let mut library = TestLibrary::with_files(&[]);
    let broken = library.add_bytes("broken.txt", crate::common::INVALID_UTF8);
    let ts = create_test_services();

    let result = execute_document(
        IndexDocumentArgs { path: broken },
        &ts.services,
        OutputFormat::Json,
    );

    assert!(result.is_err());
    assert_eq!(ts.services.store.stats().unwrap().total_records, 0);
}

#[test]
fn test_reindex_command() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    let path = library.file("astronomy.txt");

    execute_document(
        IndexDocumentArgs { path: path.clone() },
        &ts.services,
        OutputFormat::Human,
    )
    .unwrap();
    execute_reindex(ReindexArgs { path }, &ts.services, OutputFormat::Human).unwrap();

    assert_eq!(ts.services.store.stats().unwrap().distinct_sources, 1);
}
