//! # corefetch
//!
//! CORE full-text corpus downloader.
//!
//! ## Modules
//!
//! - [`coreapi`] - CORE v2 search API client
//! - [`download`] - Paginated download loop with deduplication
//! - [`persist`] - Corpus file layout
//! - [`sanitize`] - XML 1.0 character filter for full texts
//! - [`logging`] - Console + file run log
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use corefetch::coreapi::{CoreClient, CoreSearch};
//! use corefetch::download::{download_corpus, DownloadConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DownloadConfig::new("machine learning", "./corpus").with_max_articles(100);
//!     let search = CoreSearch::new(CoreClient::new("API_KEY")?, &config.query, config.page_size);
//!     let summary = download_corpus(&search, &config).await?;
//!     println!("Saved {} articles", summary.saved);
//!     Ok(())
//! }
//! ```

pub mod coreapi;
pub mod download;
pub mod error;
pub mod logging;
pub mod persist;
pub mod sanitize;

pub use error::{FetchError, Result};
