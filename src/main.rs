//! corefetch - CORE full-text corpus downloader
//!
//! ## Usage
//!
//! ```bash
//! CORE_API_KEY=... corefetch "machine learning" --output ./corpus --max-articles 500
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use corefetch::coreapi::{CoreClient, CoreSearch, CORE_API_BASE};
use corefetch::download::{download_corpus, DownloadConfig, DEFAULT_MAX_ARTICLES, DEFAULT_PAGE_SIZE};
use corefetch::logging::{self, LogConfig};
use std::path::PathBuf;
use tracing::{error, info, Level};
use url::Url;

// ============================================================================
// CLI Definition
// ============================================================================

/// Download full texts and metadata of CORE articles matching a query
#[derive(Parser)]
#[command(name = "corefetch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Search query
    query: String,

    /// CORE API key
    #[arg(long, env = "CORE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Maximum number of articles to save
    #[arg(long, default_value_t = DEFAULT_MAX_ARTICLES, value_parser = clap::value_parser!(u64).range(1..))]
    max_articles: u64,

    /// Articles per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// Search endpoint
    #[arg(long, default_value = CORE_API_BASE)]
    base_url: Url,

    /// Directory for run logs
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        dir: cli.log_dir.clone(),
        level: if cli.debug { Level::DEBUG } else { Level::INFO },
    };
    let log_path = logging::init(&log_config).context("Failed to initialize logging")?;
    info!(path = ?log_path, "Logging to file");

    let config = DownloadConfig::new(cli.query, cli.output)
        .with_max_articles(cli.max_articles)
        .with_page_size(cli.page_size);

    let client = CoreClient::with_base_url(cli.api_key, cli.base_url)?;
    let search = CoreSearch::new(client, &config.query, config.page_size);

    match download_corpus(&search, &config).await {
        Ok(summary) => {
            info!(
                saved = summary.saved,
                duplicates = summary.duplicates,
                total_hits = summary.total_hits,
                "Corpus saved"
            );
            println!(
                "✓ Saved {} articles to {}",
                summary.saved,
                config.output_dir.display()
            );
            Ok(())
        }
        Err(e) => {
            error!(error = ?e, "Unexpected error occurred while downloading the articles");
            Err(e).context("Download failed")
        }
    }
}
