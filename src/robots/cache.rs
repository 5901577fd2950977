//! Process-wide robots.txt policy cache
//!
//! Politeness is a property of the target site, not of any one crawl
//! session, so a single [`RobotsCache`] is shared by every session for the
//! lifetime of the process. Each domain's policy is fetched lazily, exactly
//! once, and never invalidated.

use crate::robots::DisallowRules;
use crate::url::host_of;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use url::Url;

/// Per-domain cache of robots.txt disallow rules
///
/// Concurrent first accesses for the same domain coalesce onto one fetch via
/// a per-domain `OnceCell`; the outer map lock is held only long enough to
/// look up or insert the cell, so a slow fetch for one domain never blocks
/// checks for other domains.
pub struct RobotsCache {
    client: Client,
    entries: Mutex<HashMap<String, Arc<OnceCell<DisallowRules>>>>,
}

impl RobotsCache {
    /// Creates a cache that fetches robots.txt with the given client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a URL may be fetched under its domain's robots policy
    ///
    /// Resolves the URL's host, fetching and parsing that domain's
    /// robots.txt on first access. Returns false iff the URL's path contains
    /// any cached disallowed fragment. Fail-open throughout: an unparseable
    /// URL or an unreachable robots.txt allows the fetch (scope and dedup
    /// gates handle malformed URLs elsewhere).
    pub async fn is_allowed(&self, url: &str) -> bool {
        let Ok(host) = host_of(url) else {
            return true;
        };

        let cell = {
            let mut entries = self.entries.lock().unwrap();
            entries.entry(host).or_default().clone()
        };

        let rules = cell
            .get_or_init(|| self.fetch_rules(url.to_string()))
            .await;

        let path = Url::parse(url).map(|u| u.path().to_string()).unwrap_or_default();
        rules.is_path_allowed(&path)
    }

    /// Number of domains with a cached policy
    pub fn cached_domains(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Installs a ready-made policy for a domain, bypassing the fetch
    #[cfg(test)]
    pub(crate) fn preload(&self, domain: &str, rules: DisallowRules) {
        let cell = OnceCell::new();
        cell.set(rules).ok();
        self.entries
            .lock()
            .unwrap()
            .insert(domain.to_string(), Arc::new(cell));
    }

    /// Fetches and parses robots.txt for the domain of `url`
    ///
    /// The robots URL is built from the inspected URL's origin, which for an
    /// https URL on the default port is `https://{domain}/robots.txt`. Any
    /// fetch or read failure, including a non-success status, yields the
    /// empty (allow-all) rule set.
    async fn fetch_rules(&self, url: String) -> DisallowRules {
        let Some(robots_url) = robots_url_for(&url) else {
            return DisallowRules::allow_all();
        };

        tracing::debug!("Fetching robots policy from {}", robots_url);

        let response = match self.client.get(robots_url.clone()).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {} (allowing all)", robots_url, e);
                return DisallowRules::allow_all();
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                "robots.txt at {} returned {} (allowing all)",
                robots_url,
                response.status()
            );
            return DisallowRules::allow_all();
        }

        match response.text().await {
            Ok(body) => {
                let rules = DisallowRules::parse(&body);
                tracing::debug!(
                    "Cached {} disallow rules from {}",
                    rules.len(),
                    robots_url
                );
                rules
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {} (allowing all)", robots_url, e);
                DisallowRules::allow_all()
            }
        }
    }
}

/// Builds the robots.txt URL for the origin of `url`
fn robots_url_for(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let origin = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    };
    Some(format!("{}/robots.txt", origin))
}
