//! Corpus download loop.
//!
//! Probes page 1 to learn the hit count, writes the corpus summary, then
//! walks the pages in order, saving every article whose CORE id has not been
//! seen yet until the article cap is reached. One request at a time.

use crate::coreapi::{ArticleId, PageResponse};
use crate::error::{FetchError, Result};
use crate::persist::{save_article, save_corpus_info};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Default cap on saved articles
pub const DEFAULT_MAX_ARTICLES: u64 = 10_000;

/// Default number of articles per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A paginated source of search results.
///
/// Implemented by [`crate::coreapi::CoreSearch`] for the live API.
#[allow(async_fn_in_trait)]
pub trait ArticleSource {
    /// Fetch one page (1-indexed)
    async fn fetch_page(&self, page: u64) -> Result<PageResponse>;
}

/// Parameters of one download run
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Free-text search query
    pub query: String,
    /// Directory receiving the corpus files
    pub output_dir: PathBuf,
    /// Stop after this many articles have been saved
    pub max_articles: u64,
    /// Articles requested per page
    pub page_size: u32,
}

impl DownloadConfig {
    pub fn new(query: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            query: query.into(),
            output_dir: output_dir.into(),
            max_articles: DEFAULT_MAX_ARTICLES,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_max_articles(mut self, max_articles: u64) -> Self {
        self.max_articles = max_articles;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(FetchError::Validation("query must not be empty".to_string()));
        }
        if self.max_articles == 0 {
            return Err(FetchError::Validation("max_articles must be at least 1".to_string()));
        }
        if self.page_size == 0 {
            return Err(FetchError::Validation("page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    /// `totalHits` of the first response
    pub total_hits: u64,
    /// min(max_articles, total_hits)
    pub target: u64,
    /// Pages walked by the loop
    pub page_count: u64,
    /// HTTP requests issued, including the page 1 probe
    pub requests: u64,
    /// Articles written to disk
    pub saved: u64,
    /// Articles skipped because their id was already saved
    pub duplicates: u64,
}

/// Textual per-page progress indicator on stderr
pub struct PageProgress {
    total: u64,
    width: usize,
}

impl PageProgress {
    pub fn new(total: u64) -> Self {
        Self { total, width: 30 }
    }

    /// Render the bar for `current` completed pages
    pub fn render(&self, current: u64) -> String {
        let filled = if self.total == 0 {
            self.width
        } else {
            (current.min(self.total) as usize * self.width) / self.total as usize
        };
        format!(
            "[{}{}] {}/{} pages",
            "#".repeat(filled),
            "-".repeat(self.width - filled),
            current,
            self.total
        )
    }

    pub fn tick(&self, current: u64) {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r{}", self.render(current));
        let _ = stderr.flush();
    }

    pub fn finish(&self) {
        if self.total > 0 {
            eprintln!();
        }
    }
}

/// Download up to `config.max_articles` articles from `source` into
/// `config.output_dir`.
///
/// The corpus summary records the hit count of the first response; it is not
/// refreshed even if later pages report a different total.
pub async fn download_corpus<S: ArticleSource>(
    source: &S,
    config: &DownloadConfig,
) -> Result<DownloadSummary> {
    config.validate()?;

    println!("Querying CORE...");
    let probe = source.fetch_page(1).await?;
    let total_hits = probe.total_hits;

    std::fs::create_dir_all(&config.output_dir)?;
    save_corpus_info(&config.output_dir, &config.query, total_hits, config.max_articles)?;

    info!(query = %config.query, "Query");
    info!(total_hits = total_hits, "Number of hits");
    let target = config.max_articles.min(total_hits);
    info!(target = target, "Number of articles to download");

    let page_count = target.div_ceil(u64::from(config.page_size));
    let mut summary = DownloadSummary {
        total_hits,
        target,
        page_count,
        requests: 1,
        ..Default::default()
    };

    let mut seen: HashSet<ArticleId> = HashSet::new();
    let mut probe = Some(probe);
    let progress = PageProgress::new(page_count);

    for page_number in 1..=page_count {
        let page = match probe.take() {
            Some(page) => page,
            None => {
                summary.requests += 1;
                source.fetch_page(page_number).await?
            }
        };

        let mut cap_reached = false;
        for article in page.data {
            let core_id = article.id()?;
            if seen.contains(&core_id) {
                warn!(core_id = %core_id, "Article was already downloaded");
                summary.duplicates += 1;
                continue;
            }

            save_article(summary.saved, article, &config.output_dir)?;
            seen.insert(core_id);
            summary.saved += 1;

            if summary.saved >= config.max_articles {
                cap_reached = true;
                break;
            }
        }

        progress.tick(page_number);
        info!(
            page = page_number,
            pages = page_count,
            saved = summary.saved,
            "Page processed"
        );

        if cap_reached {
            break;
        }
    }
    progress.finish();

    info!(
        saved = summary.saved,
        duplicates = summary.duplicates,
        requests = summary.requests,
        "Download complete"
    );
    Ok(summary)
}
