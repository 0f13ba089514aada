//! Search commands - answer a question and explain query handling

use super::ReportedFailure;
use crate::cli::output::{self, colors, format_duration, format_similarity};
use crate::cli::OutputFormat;
use crate::core::search::QueryExplanation;
use crate::core::services::Services;
use crate::core::types::SearchResponse;
use clap::Args;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Question to answer
    pub query: String,

    /// Number of chunks to retrieve (capped by search.max_k)
    #[arg(long, short = 'k')]
    pub k: Option<usize>,

    /// Hide the source list
    #[arg(long)]
    pub no_sources: bool,
}

/// Arguments for the explain command
#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Question to explain
    pub query: String,
}

/// Execute the search command
pub fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = services.search.search(&args.query, args.k);

    output::emit(&response, format, |r| print_response(r, !args.no_sources))?;

    if response.success {
        Ok(())
    } else {
        let message = response
            .message
            .unwrap_or_else(|| "Search failed".to_string());
        Err(ReportedFailure(message).into())
    }
}

/// Execute the explain command
pub fn execute_explain(
    args: ExplainArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let explanation = services.search.explain(&args.query);

    output::emit(&explanation, format, print_explanation)?;

    if explanation.success {
        Ok(())
    } else {
        let message = explanation
            .message
            .unwrap_or_else(|| "Invalid query".to_string());
        Err(ReportedFailure(message).into())
    }
}

fn print_response(response: &SearchResponse, show_sources: bool) {
    if !response.success {
        let stage = response
            .failed_stage
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        output::print_error(&format!(
            "{}{stage}",
            response.message.as_deref().unwrap_or("Search failed")
        ));
        return;
    }

    if response.fallback_used {
        output::print_warning("LLM unavailable, showing retrieved context");
    }

    println!("{}", response.answer.as_deref().unwrap_or_default());
    println!();

    if show_sources && !response.sources.is_empty() {
        output::print_header("Sources:");
        for (i, source) in response.sources.iter().enumerate() {
            println!(
                "{} {} {}",
                colors::rank(&format!("{}.", i + 1)),
                colors::file_path(&source.source),
                colors::score(&format!("({})", format_similarity(source.similarity)))
            );
            println!("   {}", colors::dim(&source.preview));
        }
        println!();
    }

    println!(
        "{} {} chunks in {}",
        colors::dim("Retrieved"),
        colors::number(&response.documents_retrieved.to_string()),
        format_duration(response.elapsed_time)
    );
}

fn print_explanation(explanation: &QueryExplanation) {
    if !explanation.success {
        output::print_error(explanation.message.as_deref().unwrap_or("Invalid query"));
        return;
    }

    println!(
        "{} {}",
        colors::label("Query:"),
        explanation.query
    );
    println!(
        "{} {}",
        colors::label("Normalized:"),
        explanation.normalized_query
    );
    println!(
        "{} {}",
        colors::label("Keywords:"),
        explanation.keywords.join(", ")
    );
    println!("{} {}", colors::label("Model:"), explanation.model);
    println!();
    output::print_header("Steps:");
    for (i, step) in explanation.steps.iter().enumerate() {
        println!("  {} {}", colors::rank(&format!("{}.", i + 1)), step);
    }
}
