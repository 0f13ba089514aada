//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod index;
pub mod search;
pub mod status;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use index::{IndexArgs, IndexDocumentArgs, ReindexArgs};
pub use search::{ExplainArgs, SearchArgs};
pub use status::StatusArgs;

/// Error returned after a failure payload has already been printed
#[derive(Debug)]
pub struct ReportedFailure(pub String);

impl std::fmt::Display for ReportedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ReportedFailure {}
