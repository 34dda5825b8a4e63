pub mod crawl;
pub mod rank;
pub mod report;
pub mod snapshot;
