//! Tests for the search and explain commands

use crate::common::{create_test_services, TestLibrary};
use docrag::cli::commands::search::{execute, execute_explain, ExplainArgs, SearchArgs};
use docrag::cli::OutputFormat;

#[test]
fn test_search_command_human_and_json() {
    let library = TestLibrary::notes();
    let ts = create_test_services();
    ts.services.indexer.index_directory(library.path());

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = SearchArgs {
            query: "galaxy redshift".to_string(),
            k: Some(2),
            no_sources: false,
        };
        assert!(execute(args, &ts.services, format).is_ok());
    }
    assert_eq!(ts.provider.call_count(), 2);
}

#[test]
fn test_search_command_invalid_query_fails() {
    let ts = create_test_services();
    let args = SearchArgs {
        query: "!!!".to_string(),
        k: None,
        no_sources: true,
    };

    let err = execute(args, &ts.services, OutputFormat::Human).unwrap_err();
    assert_eq!(err.to_string(), "Invalid query");
}

#[test]
fn test_explain_command() {
    let ts = create_test_services();

    let ok = execute_explain(
        ExplainArgs {
            query: "how are loaves baked".to_string(),
        },
        &ts.services,
        OutputFormat::Json,
    );
    assert!(ok.is_ok());

    let err = execute_explain(
        ExplainArgs {
            query: "   ".to_string(),
        },
        &ts.services,
        OutputFormat::Json,
    );
    assert!(err.is_err());
}
