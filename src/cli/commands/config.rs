//! Show-config command - print the effective configuration

use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Include the resolved XDG directories
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(flatten)]
    pub config: &'a Config,
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse {
        config_file: args
            .all
            .then(|| xdg.config_file().to_string_lossy().into_owned()),
        data_dir: args
            .all
            .then(|| xdg.data_dir.to_string_lossy().into_owned()),
        config,
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            if let (Some(file), Some(data)) = (&response.config_file, &response.data_dir) {
                println!("  config_file: {file}");
                println!("  data_dir: {data}");
            }
            println!("  indexing:");
            println!("    chunk_size: {}", config.indexing.chunk_size);
            println!("    overlap: {}", config.indexing.overlap);
            println!("    extensions: {:?}", config.indexing.extensions);
            println!("    exclude_patterns: {:?}", config.indexing.exclude_patterns);
            println!("    max_file_size_mb: {}", config.indexing.max_file_size_mb);
            println!("  embedding:");
            println!("    backend: {}", config.embedding.backend);
            println!("    model: {}", config.embedding.model);
            println!("    dimension: {}", config.embedding.dimension);
            println!("  storage:");
            println!("    db_path: {}", config.storage.db_path.display());
            println!("    collection: {}", config.storage.collection);
            println!("  search:");
            println!("    default_k: {}", config.search.default_k);
            println!("    max_k: {}", config.search.max_k);
            println!("  generation:");
            println!("    base_url: {}", config.generation.base_url);
            println!("    model: {}", config.generation.model);
            println!("    timeout_sec: {}", config.generation.timeout_sec);
            println!("    max_context_docs: {}", config.generation.max_context_docs);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
