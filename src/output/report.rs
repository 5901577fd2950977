use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

/// The batch crawl response: one entry per input seed
///
/// Always complete - a failed or empty domain appears with an empty set,
/// never as a missing key. Sets are sorted for stable output.
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Input seed string → discovered product URLs
    pub results: BTreeMap<String, BTreeSet<String>>,
}

impl CrawlReport {
    /// Builds a report from the engine's result mapping
    pub fn new(results: HashMap<String, HashSet<String>>) -> Self {
        let results = results
            .into_iter()
            .map(|(seed, products)| (seed, products.into_iter().collect()))
            .collect();
        Self {
            generated_at: Utc::now(),
            results,
        }
    }

    /// Total product URLs across all seeds
    pub fn total_products(&self) -> usize {
        self.results.values().map(|set| set.len()).sum()
    }

    /// Serializes the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the JSON report to a file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Prints a human-readable summary of the report to stdout
pub fn print_summary(report: &CrawlReport) {
    println!(
        "Crawled {} seed(s), {} product URL(s) found",
        report.results.len(),
        report.total_products()
    );
    for (seed, products) in &report.results {
        println!("\n{} ({} products)", seed, products.len());
        for product in products {
            println!("  {}", product);
        }
    }
}
