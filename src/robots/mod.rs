//! Robots.txt handling module
//!
//! This module fetches, parses, and caches robots.txt policies. The policy
//! engine is deliberately simplified: only literal `Disallow:` lines are
//! recognized, disallowed fragments match the URL path by substring, and an
//! unreachable robots.txt means everything is allowed (fail-open).

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::DisallowRules;
