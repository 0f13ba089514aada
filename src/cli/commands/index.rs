//! Index commands - add documents to the collection
//!
//! `index` walks a directory, `index-document` handles a single file and
//! `reindex` replaces the chunks of a file that was indexed before.

use super::ReportedFailure;
use crate::cli::output::{self, colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::types::{DirectoryIndexResult, IndexResult};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory to index (searched recursively)
    pub path: PathBuf,

    /// Characters per chunk (overrides configuration)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive chunks (overrides configuration)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// File extensions to index (can be specified multiple times)
    #[arg(long = "ext", short = 'x')]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude (can be specified multiple times)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,

    /// Only print the summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl IndexArgs {
    /// Apply command-line overrides to the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(size) = self.chunk_size {
            config.indexing.chunk_size = size;
        }
        if let Some(overlap) = self.overlap {
            config.indexing.overlap = overlap;
        }
        if !self.extensions.is_empty() {
            config.indexing.extensions = self
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect();
        }
        config
            .indexing
            .exclude_patterns
            .extend(self.exclude.iter().cloned());
    }
}

/// Arguments for the index-document command
#[derive(Args, Debug)]
pub struct IndexDocumentArgs {
    /// Document to index
    pub path: PathBuf,
}

/// Arguments for the reindex command
#[derive(Args, Debug)]
pub struct ReindexArgs {
    /// Document whose chunks should be replaced
    pub path: PathBuf,
}

/// Execute the index command
pub fn execute(
    args: IndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let result = services.indexer.index_directory(&args.path);
    let elapsed = start.elapsed().as_secs_f64();

    output::emit(&result, format, |r| print_directory(r, args.quiet, elapsed))?;

    if result.success {
        Ok(())
    } else {
        Err(ReportedFailure(result.message).into())
    }
}

/// Execute the index-document command
pub fn execute_document(
    args: IndexDocumentArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = services.indexer.index_document(&args.path);
    finish_document(result, format)
}

/// Execute the reindex command
pub fn execute_reindex(
    args: ReindexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = services.indexer.reindex_document(&args.path);
    finish_document(result, format)
}

fn finish_document(
    result: IndexResult,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    output::emit(&result, format, print_document)?;

    if result.success {
        Ok(())
    } else {
        Err(ReportedFailure(result.message).into())
    }
}

fn print_document(result: &IndexResult) {
    output::print_index_result(result);
    if !result.success {
        return;
    }
    if let Some(removed) = result.old_chunks_removed {
        println!(
            "  {} {}",
            colors::label("Replaced chunks:"),
            colors::number(&removed.to_string())
        );
    }
    if let Some(info) = &result.chunk_info {
        println!(
            "  {} {} chars",
            colors::label("Average chunk:"),
            colors::number(&info.avg_chunk_size.to_string())
        );
    }
}

fn print_directory(result: &DirectoryIndexResult, quiet: bool, elapsed: f64) {
    if !result.success {
        output::print_warning(&result.message);
        return;
    }

    if !quiet {
        for file in &result.processed_files {
            output::print_index_result(file);
        }
        println!();
    }

    let stats = &result.stats;
    output::print_success(&result.message);
    println!(
        "  {} {}",
        colors::label("Files:"),
        colors::number(&stats.total_files.to_string())
    );
    println!(
        "  {} {} ok, {} failed ({:.1}%)",
        colors::label("Outcome:"),
        colors::number(&stats.successful.to_string()),
        colors::number(&stats.failed.to_string()),
        stats.success_rate
    );
    println!(
        "  {} {}",
        colors::label("Chunks:"),
        colors::number(&stats.total_chunks.to_string())
    );
    println!(
        "  {} {}",
        colors::label("Duration:"),
        format_duration(elapsed)
    );
}
