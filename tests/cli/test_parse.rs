//! Argument parsing tests

use clap::Parser;
use docrag::cli::{Cli, Commands, OutputFormat};

#[test]
fn test_parse_index_with_overrides() {
    let cli = Cli::try_parse_from([
        "docrag",
        "index",
        "papers",
        "--chunk-size",
        "500",
        "--overlap",
        "50",
        "-x",
        "pdf",
        "-x",
        "txt",
    ])
    .unwrap();

    match cli.command {
        Commands::Index(args) => {
            assert_eq!(args.path.to_str(), Some("papers"));
            assert_eq!(args.chunk_size, Some(500));
            assert_eq!(args.overlap, Some(50));
            assert_eq!(args.extensions, vec!["pdf", "txt"]);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_search_with_k_and_json() {
    let cli = Cli::try_parse_from([
        "docrag",
        "search",
        "what is drift?",
        "-k",
        "7",
        "--format",
        "json",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    match cli.command {
        Commands::Search(args) => {
            assert_eq!(args.query, "what is drift?");
            assert_eq!(args.k, Some(7));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_hyphenated_commands() {
    assert!(matches!(
        Cli::try_parse_from(["docrag", "index-document", "a.pdf"]).unwrap().command,
        Commands::IndexDocument(_)
    ));
    assert!(matches!(
        Cli::try_parse_from(["docrag", "show-config"]).unwrap().command,
        Commands::ShowConfig(_)
    ));
    assert!(matches!(
        Cli::try_parse_from(["docrag", "reindex", "a.pdf"]).unwrap().command,
        Commands::Reindex(_)
    ));
}

#[test]
fn test_parse_defaults_to_human() {
    let cli = Cli::try_parse_from(["docrag", "status"]).unwrap();
    assert_eq!(cli.format, OutputFormat::Human);
}

#[test]
fn test_parse_rejects_missing_query() {
    assert!(Cli::try_parse_from(["docrag", "search"]).is_err());
}
