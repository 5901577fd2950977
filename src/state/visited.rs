use std::collections::HashSet;
use std::sync::Mutex;

/// Concurrency-safe set of URLs already admitted for fetching
///
/// Identity is the exact URL string; two URLs differing only by a trailing
/// slash are distinct entries. Scoped to one crawl session.
#[derive(Debug, Default)]
pub struct VisitedStore {
    inner: Mutex<HashSet<String>>,
}

impl VisitedStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically tests membership and inserts if absent
    ///
    /// Returns true only for the first caller across all concurrent callers
    /// for that exact URL string; every later call returns false for the
    /// lifetime of the session.
    pub fn try_admit(&self, url: &str) -> bool {
        let mut set = self.inner.lock().unwrap();
        set.insert(url.to_string())
    }

    /// Number of URLs admitted so far
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// True when nothing has been admitted yet
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
