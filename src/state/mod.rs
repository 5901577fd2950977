//! Session-scoped crawl state
//!
//! Everything here lives and dies with a single seed-domain crawl: the
//! visited store that gates admission and the accumulator that collects
//! product URLs. The robots cache is deliberately NOT here; politeness
//! state is process-wide.

mod session;
mod visited;

pub use session::{CrawlSession, SessionCounters};
pub use visited::VisitedStore;
