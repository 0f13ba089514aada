//! Status command - report index contents and LLM availability

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::services::{Services, SystemStatus};
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Include the effective configuration
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Execute the status command
pub fn execute(
    args: StatusArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = services.status()?;
    output::emit(&status, format, |s| print_status(s, args.verbose))?;
    Ok(())
}

fn print_status(status: &SystemStatus, verbose: bool) {
    let indexer = &status.indexer;
    let stats = &indexer.database_stats;

    output::print_header(&format!("docrag: {}", status.system_status));
    println!();

    output::print_header("Collection");
    println!("  {} {}", colors::label("Name:"), stats.collection_name);
    println!("  {} {}", colors::label("Location:"), colors::file_path(&stats.location));
    println!(
        "  {} {}",
        colors::label("Chunks:"),
        colors::number(&stats.total_records.to_string())
    );
    println!(
        "  {} {}",
        colors::label("Documents:"),
        colors::number(&stats.distinct_sources.to_string())
    );
    println!();

    output::print_header("Embedding");
    println!(
        "  {} {} ({})",
        colors::label("Model:"),
        indexer.embedding_model.model,
        indexer.embedding_model.name
    );
    println!(
        "  {} {}",
        colors::label("Dimension:"),
        colors::number(&indexer.embedding_model.embedding_dimension.to_string())
    );
    println!(
        "  {} {} chars, {} overlap",
        colors::label("Chunking:"),
        indexer.chunker_config.chunk_size,
        indexer.chunker_config.chunk_overlap
    );
    println!(
        "  {} {}",
        colors::label("Extensions:"),
        indexer.extensions.join(", ")
    );
    println!();

    output::print_header("LLM");
    println!("  {} {}", colors::label("Model:"), status.llm.model);
    println!("  {} {}", colors::label("Endpoint:"), status.llm.base_url);
    let availability = if status.llm.available {
        colors::success("available")
    } else {
        colors::warning("unavailable (answers fall back to retrieved context)")
    };
    println!("  {} {}", colors::label("Status:"), availability);

    if verbose {
        println!();
        output::print_header("Configuration");
        match toml::to_string_pretty(&status.config) {
            Ok(rendered) => {
                for line in rendered.lines() {
                    println!("  {line}");
                }
            }
            Err(e) => output::print_warning(&format!("cannot render configuration: {e}")),
        }
    }
}
