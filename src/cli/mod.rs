//! CLI adapter for docrag
//!
//! Provides the command-line interface over the indexing and search
//! orchestrators. Depends on `core/` only.
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// docrag - question answering over your PDF collection
///
/// Index a directory of documents, then ask questions. Answers are
/// generated by a local LLM from the most similar passages, or the
/// passages themselves are shown when no LLM is running.
#[derive(Parser, Debug)]
#[command(name = "docrag")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "Retrieval-augmented question answering over documents", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index every document in a directory (recursive)
    Index(commands::IndexArgs),

    /// Index a single document
    #[command(name = "index-document")]
    IndexDocument(commands::IndexDocumentArgs),

    /// Replace the indexed chunks of a document
    Reindex(commands::ReindexArgs),

    /// Ask a question against the indexed documents
    Search(commands::SearchArgs),

    /// Show how a question would be processed
    Explain(commands::ExplainArgs),

    /// Show index, embedding and LLM status
    Status(commands::StatusArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docrag completions bash > ~/.local/share/bash-completion/completions/docrag
    ///   zsh:   docrag completions zsh > ~/.zfunc/_docrag
    ///   fish:  docrag completions fish > ~/.config/fish/completions/docrag.fish
    Completions(commands::CompletionsArgs),
}

/// Initialize tracing for the CLI.
///
/// Logs go to stderr. `RUST_LOG` overrides the default `docrag=warn`
/// filter; `DOCRAG_LOG_FORMAT=json` switches to JSON lines.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docrag=warn".into());
    let json = std::env::var("DOCRAG_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;
    xdg.log_paths();

    let mut config = Config::load_with_xdg(&xdg)?;
    if let Commands::Index(args) = &cli.command {
        args.apply(&mut config);
        config.validate()?;
    }
    config.log_config();

    if let Commands::ShowConfig(args) = cli.command {
        return commands::config::execute(args, &config, &xdg, cli.format);
    }

    let services = Arc::new(Services::new(config)?);

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format),
        Commands::IndexDocument(args) => {
            commands::index::execute_document(args, &services, cli.format)
        }
        Commands::Reindex(args) => commands::index::execute_reindex(args, &services, cli.format),
        Commands::Search(args) => commands::search::execute(args, &services, cli.format),
        Commands::Explain(args) => commands::search::execute_explain(args, &services, cli.format),
        Commands::Status(args) => commands::status::execute(args, &services, cli.format),
        Commands::ShowConfig(_) | Commands::Completions(_) => unreachable!(), // Handled above
    }
}
