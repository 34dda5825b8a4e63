use crate::snapshot::{SaveOutcome, SnapshotStore};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use pagerank_crawler::result::{distinct_urls, edge_count};
use pagerank_crawler::{Crawler, LinkGraph, ProgressCallback};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Seed used when no URL is given.
pub const DEFAULT_SEED_URL: &str = "http://www.nuk.edu.tw";

/// Snapshot path used when no output is given.
pub const DEFAULT_OUTPUT: &str = "crawler-result.json";

/// Crawls deeper than this are saved but not ranked automatically.
pub const AUTO_RANK_MAX_LEVEL: usize = 2;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub level: usize,
    pub output: PathBuf,
    pub timeout: Duration,
    pub show_progress_bars: bool,
}

pub struct CrawlOutcome {
    pub graph: LinkGraph,
    pub save: SaveOutcome,
}

/// Whether a crawl of this depth should be followed by a ranking pass.
pub fn should_auto_rank(level: usize) -> bool {
    level <= AUTO_RANK_MAX_LEVEL
}

/// Crawl `options.url` to `options.level` and save the graph snapshot.
pub async fn execute_crawl(options: CrawlOptions) -> anyhow::Result<CrawlOutcome> {
    let CrawlOptions {
        url,
        level,
        output,
        timeout,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("Invalid progress bar template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut crawler = Crawler::with_timeout(timeout).context("Failed to build HTTP client")?;
    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let callback: ProgressCallback = Arc::new(move |count: usize, url: &str| {
            pb_clone.set_message(format!("Crawling... {} pages fetched ({})", count, url));
        });
        crawler = crawler.with_progress_callback(callback);
    }

    let graph = crawler
        .crawl_from(&url, level)
        .await
        .with_context(|| format!("Failed to crawl {}", url))?;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!("Crawl complete! {} pages recorded", graph.len()));
    }

    let save = SnapshotStore::new(&output)
        .save(&graph)
        .with_context(|| format!("Failed to save graph to {}", output.display()))?;

    Ok(CrawlOutcome { graph, save })
}

/// Summary of a finished crawl
pub fn generate_crawl_summary(outcome: &CrawlOutcome, output: &std::path::Path) -> String {
    let mut summary = String::new();
    summary.push_str(&format!("  Pages crawled: {}\n", outcome.graph.len()));
    summary.push_str(&format!("  Links found: {}\n", edge_count(&outcome.graph)));
    summary.push_str(&format!(
        "  Distinct URLs: {}\n",
        distinct_urls(&outcome.graph)
    ));

    let saved = match outcome.save {
        SaveOutcome::Written => "saved to",
        SaveOutcome::Unchanged => "unchanged at",
    };
    summary.push_str(&format!("  Snapshot {} {}\n", saved, output.display()));
    summary
}
