pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod result;

pub use crawler::{Crawler, ProgressCallback};
pub use error::CrawlError;
pub use fetcher::{Fetch, HttpFetcher};
pub use result::LinkGraph;
