//! Robots.txt parsing
//!
//! Parses a robots.txt body into the set of disallowed path fragments. Only
//! lines whose trimmed content starts with the literal `Disallow:` are
//! interpreted; every other directive (User-agent, Allow, Crawl-delay,
//! wildcards) is ignored.

use std::collections::HashSet;

/// The disallowed path fragments parsed from one robots.txt document
///
/// An empty rule set allows every path, which doubles as the fail-open
/// policy when robots.txt cannot be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisallowRules {
    fragments: HashSet<String>,
}

impl DisallowRules {
    /// Parses robots.txt content into disallow rules
    ///
    /// Each line is trimmed; lines starting with `Disallow:` contribute the
    /// trimmed remainder when it is non-empty. A bare `Disallow:` line
    /// (allow-all convention) contributes nothing.
    pub fn parse(content: &str) -> Self {
        let mut fragments = HashSet::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix("Disallow:") {
                let fragment = rest.trim();
                if !fragment.is_empty() {
                    fragments.insert(fragment.to_string());
                }
            }
        }
        Self { fragments }
    }

    /// An empty rule set that allows every path
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Checks a URL path against the rules
    ///
    /// Returns false iff the path contains any disallowed fragment as a
    /// substring. No wildcard or anchor semantics.
    pub fn is_path_allowed(&self, path: &str) -> bool {
        !self.fragments.iter().any(|f| path.contains(f.as_str()))
    }

    /// Number of disallowed fragments
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// True when no fragment is disallowed
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
