//! docrag - question answering over a local document collection
//!
//! # Examples
//!
//! ```bash
//! # Index a directory of PDFs
//! docrag index ~/papers
//!
//! # Ask a question
//! docrag search "what sampling rate was used?" -k 8
//!
//! # Replace the chunks of a revised document
//! docrag reindex ~/papers/report.pdf
//!
//! # Check the collection and LLM
//! docrag status
//! ```

use clap::Parser;
use docrag::cli::commands::ReportedFailure;
use docrag::cli::{init_logging, run, Cli};

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Failure payloads have already been printed by the command
        if e.downcast_ref::<ReportedFailure>().is_none() {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
