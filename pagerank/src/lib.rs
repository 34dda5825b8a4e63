pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    crawl_options_from, expand_path, rank_options_from, render_report, report_options_from,
};
