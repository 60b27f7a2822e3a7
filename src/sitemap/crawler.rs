//! Recursive sitemap crawler
//!
//! Flattens a sitemap index into the ordered set of page URLs it reaches.
//!
//! Traversal is depth-first in document order. Every sitemap location is
//! visited at most once, so an index that refers back to an ancestor still
//! terminates.
//!
//! # Failure policy
//!
//! | Document | On fetch / decompress / parse failure |
//! |----------|---------------------------------------|
//! | Start sitemap | Abort the crawl with the error |
//! | Nested sitemap | Log a warning, record it, skip it |

use crate::config::Settings;
use crate::sitemap::parser::{parse_sitemap, SitemapDocument, SitemapKind};
use crate::sitemap::source::SitemapSource;
use crate::sitemap::SitemapResult;
use crate::sync::build_http_client;
use reqwest::Client;
use std::collections::HashSet;

/// A nested sitemap that could not be used
#[derive(Debug, Clone)]
pub struct FailedSitemap {
    pub source: String,
    pub error: String,
}

/// Result of a crawl
#[derive(Debug, Clone, Default)]
pub struct SitemapCrawl {
    /// Page URLs, first-seen order, no duplicates
    pub urls: Vec<String>,

    /// Sitemap documents successfully read
    pub visited_sitemaps: usize,

    /// Nested sitemaps skipped after a failure
    pub failed: Vec<FailedSitemap>,
}

/// Sitemap crawler sharing one HTTP client across documents
pub struct SitemapCrawler {
    client: Client,
}

impl SitemapCrawler {
    pub fn new(settings: &Settings) -> SitemapResult<Self> {
        Ok(Self::with_client(build_http_client(settings)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Crawls from `start` (URL, `file://` URL or path)
    pub async fn crawl(&self, start: &str) -> SitemapResult<SitemapCrawl> {
        let mut stack = vec![SitemapSource::parse(start)];
        let mut visited: HashSet<String> = HashSet::new();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut crawl = SitemapCrawl::default();
        let mut is_start = true;

        while let Some(current) = stack.pop() {
            if !visited.insert(current.to_string()) {
                tracing::debug!("Sitemap {} already visited, skipping", current);
                continue;
            }

            let document = match self.load(&current).await {
                Ok(document) => document,
                Err(e) if is_start => return Err(e),
                Err(e) => {
                    tracing::warn!("Skipping sitemap {}: {}", current, e);
                    crawl.failed.push(FailedSitemap {
                        source: current.to_string(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            is_start = false;
            crawl.visited_sitemaps += 1;

            match document.kind {
                SitemapKind::Index => {
                    let children: Vec<SitemapSource> = document
                        .locations
                        .iter()
                        .filter_map(|loc| current.resolve(loc))
                        .collect();
                    tracing::debug!("Index {} lists {} sitemaps", current, children.len());

                    // Reversed so the first child is popped first
                    stack.extend(children.into_iter().rev());
                }
                SitemapKind::UrlSet => {
                    let before = crawl.urls.len();
                    for loc in &document.locations {
                        let url = current.resolve_page(loc);
                        if seen_urls.insert(url.clone()) {
                            crawl.urls.push(url);
                        }
                    }
                    tracing::debug!(
                        "Url set {} added {} of {} URLs",
                        current,
                        crawl.urls.len() - before,
                        document.locations.len()
                    );
                }
            }
        }

        tracing::info!(
            "Sitemap crawl finished: {} URLs from {} sitemaps ({} skipped)",
            crawl.urls.len(),
            crawl.visited_sitemaps,
            crawl.failed.len()
        );

        Ok(crawl)
    }

    async fn load(&self, source: &SitemapSource) -> SitemapResult<SitemapDocument> {
        tracing::debug!("Reading sitemap {}", source);
        let data = source.read(&self.client).await?;
        parse_sitemap(&data, &source.to_string())
    }
}

/// Returns every page URL reachable from `start`
///
/// # Example
///
/// ```no_run
/// use apple_docs_sync::{gather_urls, Settings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let urls = gather_urls(&Settings::default(), "https://developer.apple.com/sitemap.xml").await?;
/// println!("{} pages", urls.len());
/// # Ok(())
/// # }
/// ```
pub async fn gather_urls(settings: &Settings, start: &str) -> SitemapResult<Vec<String>> {
    let crawler = SitemapCrawler::new(settings)?;
    Ok(crawler.crawl(start).await?.urls)
}
