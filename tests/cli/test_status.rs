//! Tests for the status command

use crate::common::{create_test_services, TestLibrary};
use docrag::cli::commands::status::{execute, StatusArgs};
use docrag::cli::OutputFormat;

#[test]
fn test_status_command_formats() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    ts.services.indexer.index_directory(library.path());

    assert!(execute(StatusArgs { verbose: true }, &ts.services, OutputFormat::Human).is_ok());
    assert!(execute(StatusArgs { verbose: false }, &ts.services, OutputFormat::Json).is_ok());
}
