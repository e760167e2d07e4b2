use std::time::Instant;

/// A raw feed body with the moment it was fetched.
///
/// Freshness is judged by the caller against its own TTL; the cache never
/// evaluates expiry itself.
#[derive(Debug, Clone)]
pub struct CachedFeed {
    pub body: String,
    pub fetched_at: Instant,
}

/// Process-wide store of raw feed bodies keyed by source URL.
pub trait FeedCache: Send + Sync {
    fn get(&self, url: &str) -> Option<CachedFeed>;
    fn put(&self, url: &str, body: &str);
    /// Drop the entries for `urls`, forcing a network fetch on next use.
    fn invalidate(&self, urls: &[String]);
}
