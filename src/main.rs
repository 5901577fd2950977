//! Shopmap main entry point
//!
//! This is the command-line interface for the Shopmap product crawler.

use anyhow::Context;
use clap::Parser;
use shopmap::config::{load_config_with_hash, Config};
use shopmap::crawler::{build_http_client, CrawlEngine, CrawlLimits, HttpFetcher};
use shopmap::output::{print_summary, CrawlReport};
use shopmap::robots::RobotsCache;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shopmap: a polite product-page discovery crawler
///
/// Shopmap crawls each seed domain by following same-domain links to a
/// bounded depth, respecting robots.txt and rate limits, and reports every
/// URL whose path looks like a product page.
#[derive(Parser, Debug)]
#[command(name = "shopmap")]
#[command(version)]
#[command(about = "A polite product-page discovery crawler", long_about = None)]
struct Cli {
    /// Seed URLs, one per domain to crawl
    #[arg(value_name = "SEED", required = true)]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the JSON report to this path (overrides the config value)
    #[arg(short, long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Print the JSON report to stdout instead of the plain summary
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No config file given, using defaults");
            Config::default()
        }
    };

    tracing::info!("Crawling {} seed(s)", cli.seeds.len());

    // Build the shared HTTP client and the engine around it.
    let client = build_http_client(&config.user_agent).context("failed to build HTTP client")?;
    let fetcher = Arc::new(HttpFetcher::new(client.clone()));
    let robots = Arc::new(RobotsCache::new(client));
    let engine = CrawlEngine::new(CrawlLimits::from_config(&config.crawler), fetcher, robots);

    let results = engine.crawl_all(&cli.seeds).await;
    let report = CrawlReport::new(results);

    let report_path = cli
        .report
        .or_else(|| match config.output.report_path.as_str() {
            "" => None,
            path => Some(PathBuf::from(path)),
        });

    if let Some(path) = &report_path {
        report
            .write_json(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    if cli.json {
        println!("{}", report.to_json()?);
    } else if !cli.quiet {
        print_summary(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shopmap=info,warn"),
            1 => EnvFilter::new("shopmap=debug,info"),
            2 => EnvFilter::new("shopmap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
