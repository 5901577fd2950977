//! Output rendering for crawl results
//!
//! Renders the seed → product-URL mapping as JSON (the batch response
//! shape) and as a plain-text summary for terminals.

mod report;

pub use report::{CrawlReport, print_summary};
