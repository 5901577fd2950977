use crate::state::VisitedStore;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// State scoped to one seed-domain crawl invocation
///
/// Owns the visited store and the product-URL accumulator. One session is
/// created per seed and dropped when that seed's result is returned; URLs
/// visited while crawling one domain are independent of every other domain.
#[derive(Debug)]
pub struct CrawlSession {
    /// Normalized host the session is scoped to
    target_domain: String,

    /// Dedup gate for fetch admission
    pub visited: VisitedStore,

    /// Product URLs discovered so far (a set union, no ordering)
    products: Mutex<HashSet<String>>,

    /// Per-outcome counters for the session summary
    pub counters: SessionCounters,
}

/// Branch-outcome counters, safe under concurrent workers
#[derive(Debug, Default)]
pub struct SessionCounters {
    pub fetched: AtomicUsize,
    pub already_visited: AtomicUsize,
    pub depth_exceeded: AtomicUsize,
    pub disallowed: AtomicUsize,
    pub off_domain: AtomicUsize,
    pub failed: AtomicUsize,
    pub frontier_dropped: AtomicUsize,
}

impl CrawlSession {
    /// Creates a session scoped to the given target domain
    pub fn new(target_domain: String) -> Self {
        Self {
            target_domain,
            visited: VisitedStore::new(),
            products: Mutex::new(HashSet::new()),
            counters: SessionCounters::default(),
        }
    }

    /// The host this session is scoped to
    pub fn target_domain(&self) -> &str {
        &self.target_domain
    }

    /// Records a discovered product URL
    ///
    /// Tolerates concurrent inserts; duplicates collapse silently.
    pub fn record_product(&self, url: String) {
        self.products.lock().unwrap().insert(url);
    }

    /// Number of product URLs recorded so far
    pub fn product_count(&self) -> usize {
        self.products.lock().unwrap().len()
    }

    /// Takes the accumulated product set, leaving the session empty
    pub fn take_products(&self) -> HashSet<String> {
        std::mem::take(&mut *self.products.lock().unwrap())
    }
}

impl SessionCounters {
    /// Renders the counters for the session-summary log line
    pub fn summary(&self) -> String {
        format!(
            "fetched={} already_visited={} depth_exceeded={} disallowed={} off_domain={} failed={} frontier_dropped={}",
            self.fetched.load(Ordering::Relaxed),
            self.already_visited.load(Ordering::Relaxed),
            self.depth_exceeded.load(Ordering::Relaxed),
            self.disallowed.load(Ordering::Relaxed),
            self.off_domain.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
            self.frontier_dropped.load(Ordering::Relaxed),
        )
    }
}
