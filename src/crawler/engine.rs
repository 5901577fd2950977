//! Crawl engine - frontier, worker pool, and crawl orchestration
//!
//! One session per seed domain. The engine keeps an explicit frontier queue
//! and pumps it through a bounded pool of worker tasks:
//! - admission gates run in order: depth bound, visited store, robots
//! - a worker holds a pool slot for its politeness delay, fetch, and any
//!   retry backoff, yielding at every suspension point without a lock
//! - extracted links are split into product hits and requeued jobs by the
//!   session loop, which is the single owner of the frontier
//!
//! The session completes when no jobs are queued or in flight, or when the
//! session deadline expires; either way the accumulated product set is
//! returned and the session state is dropped.

use crate::crawler::retry::{RetryDecision, RetryPolicy};
use crate::crawler::{FetchOutcome, PageFetcher};
use crate::robots::RobotsCache;
use crate::state::CrawlSession;
use crate::url::{host_of, is_product_url, is_valid_scheme, same_domain};
use crate::Result;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// One unit of crawl work
///
/// Immutable once created; produced by expanding a fetched page's links and
/// consumed exactly once by a worker. The owning session carries the target
/// domain.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    pub url: String,
    pub depth: u32,
}

/// Engine limits, a snapshot of the crawler configuration
#[derive(Debug, Clone)]
pub struct CrawlLimits {
    /// Jobs deeper than this are never fetched
    pub max_depth: u32,

    /// Worker pool size, shared across all active sessions
    pub max_concurrent_fetches: usize,

    /// Wait before each fetch; bounds request rate per worker slot
    pub politeness_delay: Duration,

    /// Wait before retrying a rate-limited fetch
    pub retry_backoff: Duration,

    /// Retry budget per job (429 only)
    pub max_retries: u32,

    /// Frontier cap; links past it are dropped and counted
    pub max_frontier: usize,

    /// Per-session deadline; None disables it
    pub session_timeout: Option<Duration>,
}

impl CrawlLimits {
    pub fn from_config(config: &crate::config::CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_concurrent_fetches: config.max_concurrent_fetches as usize,
            politeness_delay: Duration::from_millis(config.politeness_delay_ms),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            max_retries: config.max_retries,
            max_frontier: config.max_frontier as usize,
            session_timeout: match config.session_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

/// The crawl orchestrator
///
/// Cheap to clone; all components are shared. The worker pool semaphore is
/// global, so concurrent sessions compete for the same fetch slots.
#[derive(Clone)]
pub struct CrawlEngine {
    limits: CrawlLimits,
    fetcher: Arc<dyn PageFetcher>,
    robots: Arc<RobotsCache>,
    permits: Arc<Semaphore>,
}

impl CrawlEngine {
    /// Creates an engine over the injected fetcher and robots capabilities
    pub fn new(limits: CrawlLimits, fetcher: Arc<dyn PageFetcher>, robots: Arc<RobotsCache>) -> Self {
        let permits = Arc::new(Semaphore::new(limits.max_concurrent_fetches));
        Self {
            limits,
            fetcher,
            robots,
            permits,
        }
    }

    /// Crawls every seed concurrently as independent sessions
    ///
    /// Returns one entry per input string. A session that errors or panics
    /// maps its input to an empty set with a diagnostic log entry; one
    /// misbehaving domain never affects the others.
    pub async fn crawl_all(&self, seeds: &[String]) -> HashMap<String, HashSet<String>> {
        let mut handles = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let engine = self.clone();
            let task_seed = seed.clone();
            handles.push((
                seed.clone(),
                tokio::spawn(async move { engine.crawl(&task_seed).await }),
            ));
        }

        let mut results = HashMap::with_capacity(handles.len());
        for (seed, handle) in handles {
            let products = match handle.await {
                Ok(Ok(products)) => products,
                Ok(Err(e)) => {
                    tracing::error!("Crawl failed for seed {}: {}", seed, e);
                    HashSet::new()
                }
                Err(e) => {
                    tracing::error!("Crawl session for seed {} died: {}", seed, e);
                    HashSet::new()
                }
            };
            results.insert(seed, products);
        }
        results
    }

    /// Crawls one seed domain and returns its discovered product URLs
    ///
    /// A seed whose host cannot be parsed yields an empty set. The call
    /// itself never fails on branch-level errors; every fetch failure is
    /// absorbed at its branch.
    pub async fn crawl(&self, seed: &str) -> Result<HashSet<String>> {
        let target_domain = match host_of(seed) {
            Ok(host) => host,
            Err(e) => {
                tracing::warn!("Seed {:?} has no crawlable host: {}", seed, e);
                return Ok(HashSet::new());
            }
        };

        tracing::info!("Starting crawl session for {}", target_domain);
        let started = Instant::now();
        let deadline = self.limits.session_timeout.map(|t| started + t);
        let retry = RetryPolicy::new(self.limits.retry_backoff, self.limits.max_retries);

        let session = Arc::new(CrawlSession::new(target_domain));
        let mut frontier: VecDeque<CrawlJob> = VecDeque::new();
        frontier.push_back(CrawlJob {
            url: seed.to_string(),
            depth: 0,
        });

        let mut in_flight: JoinSet<(CrawlJob, FetchOutcome)> = JoinSet::new();
        let mut processed = 0usize;

        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!(
                    "Session deadline reached for {}: dropping {} queued, aborting {} in-flight",
                    session.target_domain(),
                    frontier.len(),
                    in_flight.len()
                );
                frontier.clear();
                in_flight.shutdown().await;
                break;
            }

            // Refill the worker pool from the frontier.
            while in_flight.len() < self.limits.max_concurrent_fetches {
                let Some(job) = frontier.pop_front() else { break };
                match self.gate(&session, &job) {
                    Some(skip) => record_outcome(&session, &job.url, &skip),
                    None => {
                        let fetcher = self.fetcher.clone();
                        let robots = self.robots.clone();
                        let permits = self.permits.clone();
                        let delay = self.limits.politeness_delay;
                        in_flight.spawn(async move {
                            fetch_job(job, fetcher, robots, permits, delay, retry).await
                        });
                    }
                }
            }

            // Wait for a worker, but never past the session deadline.
            let next = match deadline {
                Some(d) => match tokio::time::timeout_at(d, in_flight.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => continue, // the top-of-loop deadline check fires
                },
                None => in_flight.join_next().await,
            };

            // No jobs queued or in flight: the session is complete.
            let Some(joined) = next else {
                if frontier.is_empty() {
                    break;
                }
                continue;
            };

            match joined {
                Ok((job, outcome)) => {
                    if let FetchOutcome::Links(links) = &outcome {
                        self.expand(&session, &mut frontier, &job, links);
                    }
                    record_outcome(&session, &job.url, &outcome);
                }
                Err(e) => {
                    // A dead worker is branch-local; siblings continue.
                    session.counters.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Worker task failed: {}", e);
                }
            }

            processed += 1;
            if processed % 25 == 0 {
                tracing::info!(
                    "Progress for {}: {} jobs settled, {} queued, {} products",
                    session.target_domain(),
                    processed,
                    frontier.len(),
                    session.product_count()
                );
            }
        }

        tracing::info!(
            "Session for {} finished in {:?}: {} products ({})",
            session.target_domain(),
            started.elapsed(),
            session.product_count(),
            session.counters.summary()
        );

        Ok(session.take_products())
    }

    /// Admission gates, in order: depth bound, then the visited store
    ///
    /// Returns the skip outcome, or None when the job may be fetched. The
    /// visited check is an atomic test-and-insert, so exactly one of any
    /// number of racing jobs for the same URL is admitted per session.
    fn gate(&self, session: &CrawlSession, job: &CrawlJob) -> Option<FetchOutcome> {
        if job.depth > self.limits.max_depth {
            return Some(FetchOutcome::DepthExceeded);
        }
        if !session.visited.try_admit(&job.url) {
            return Some(FetchOutcome::AlreadyVisited);
        }
        None
    }

    /// Splits a fetched page's links into product hits and new jobs
    ///
    /// Off-scheme links are discarded, off-domain links are counted and
    /// discarded (never followed, even if they look like products), product
    /// URLs are recorded, and everything else re-enters the frontier one
    /// level deeper.
    fn expand(
        &self,
        session: &CrawlSession,
        frontier: &mut VecDeque<CrawlJob>,
        job: &CrawlJob,
        links: &[String],
    ) {
        for link in links {
            if !is_valid_scheme(link) {
                continue;
            }
            if !same_domain(link, session.target_domain()) {
                record_outcome(session, link, &FetchOutcome::OffDomain);
                continue;
            }
            if is_product_url(link) {
                session.record_product(link.clone());
            } else if frontier.len() >= self.limits.max_frontier {
                session.counters.frontier_dropped.fetch_add(1, Ordering::Relaxed);
            } else {
                frontier.push_back(CrawlJob {
                    url: link.clone(),
                    depth: job.depth + 1,
                });
            }
        }
    }
}

/// Fetches one admitted job inside a pool slot
///
/// Holds a global permit for the robots check, the politeness delay, the
/// fetch, and any retry backoff. A rate-limited fetch is retried in place
/// with the job's depth and session intact; if the worker is cancelled
/// during a sleep the branch is abandoned without retry.
async fn fetch_job(
    job: CrawlJob,
    fetcher: Arc<dyn PageFetcher>,
    robots: Arc<RobotsCache>,
    permits: Arc<Semaphore>,
    politeness_delay: Duration,
    retry: RetryPolicy,
) -> (CrawlJob, FetchOutcome) {
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            return (
                job,
                FetchOutcome::NetworkError {
                    cause: "worker pool closed".to_string(),
                },
            )
        }
    };

    if !robots.is_allowed(&job.url).await {
        return (job, FetchOutcome::Disallowed);
    }

    let mut attempts = 0;
    loop {
        tokio::time::sleep(politeness_delay).await;
        let outcome = fetcher.fetch(&job.url).await;
        match retry.decide(&outcome, attempts) {
            RetryDecision::RetryAfter(backoff) => {
                attempts += 1;
                tracing::warn!(
                    "Rate limited on {}; retry {} in {:?}",
                    job.url,
                    attempts,
                    backoff
                );
                tokio::time::sleep(backoff).await;
            }
            RetryDecision::Drop => return (job, outcome),
        }
    }
}

/// Books one settled branch into the session counters and the log
fn record_outcome(session: &CrawlSession, url: &str, outcome: &FetchOutcome) {
    let counters = &session.counters;
    match outcome {
        FetchOutcome::Links(links) => {
            counters.fetched.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Fetched {} ({} links)", url, links.len());
        }
        FetchOutcome::RateLimited => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Dropping {} after exhausting rate-limit retries", url);
        }
        FetchOutcome::ServerError { status } => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Dropping {}: HTTP {}", url, status);
        }
        FetchOutcome::NetworkError { cause } => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Dropping {}: {}", url, cause);
        }
        FetchOutcome::Disallowed => {
            counters.disallowed.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Skipping {}: disallowed by robots policy", url);
        }
        FetchOutcome::AlreadyVisited => {
            counters.already_visited.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Skipping {}: already visited", url);
        }
        FetchOutcome::DepthExceeded => {
            counters.depth_exceeded.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Skipping {}: depth bound reached", url);
        }
        FetchOutcome::OffDomain => {
            counters.off_domain.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Discarding {}: off domain", url);
        }
    }
}
