use crate::error::{CrawlError, Result};
use crate::extractor::{extract_links, trim_url};
use crate::fetcher::{Fetch, HttpFetcher};
use crate::result::LinkGraph;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Called with the running count of fetched pages and the URL being crawled.
pub type ProgressCallback = Arc<dyn Fn(usize, &str) + Send + Sync>;

/// Depth-bounded, depth-first link crawler.
///
/// Pages are fetched one at a time. There is no visited set: a page reachable
/// through several parents is fetched once per path and its entry in the
/// graph holds whatever the last fetch found.
pub struct Crawler<F = HttpFetcher> {
    fetcher: F,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler<HttpFetcher> {
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::with_timeout(timeout)?))
    }
}

impl<F: Fetch> Crawler<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Fetches `url` and returns its outbound links.
    pub async fn get_links(&self, url: &str) -> Vec<String> {
        let content = self.fetcher.fetch(url).await;
        extract_links(&self.fetcher, url, content).await
    }

    /// Validates and canonicalizes `seed`, then crawls it into a fresh graph.
    pub async fn crawl_from(&self, seed: &str, level: usize) -> Result<LinkGraph> {
        Url::parse(seed).map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", seed, e)))?;

        let mut graph = LinkGraph::new();
        self.crawl(trim_url(seed), &mut graph, level).await;
        info!("Crawl complete. Recorded {} pages", graph.len());
        Ok(graph)
    }

    /// Records `graph[url]` and, while `level > 1`, every page it links to
    /// with one less level.
    ///
    /// Links are expanded in the order they were discovered and each subtree
    /// finishes before its next sibling starts. A level of 0 or 1 records the
    /// page without expanding it.
    pub async fn crawl(&self, url: &str, graph: &mut LinkGraph, level: usize) {
        let mut frontier: Vec<(String, usize)> = vec![(url.to_string(), level)];
        let mut fetched = 0;

        while let Some((url, level)) = frontier.pop() {
            fetched += 1;
            info!("Crawling {}", url);
            if let Some(ref callback) = self.progress_callback {
                callback(fetched, &url);
            }

            let links = self.get_links(&url).await;
            debug!("Found {} links on {}", links.len(), url);

            if level > 1 {
                frontier.extend(links.iter().rev().map(|link| (link.clone(), level - 1)));
            }
            graph.insert(url, links);
        }
    }
}
