use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::Instant;

use lru::LruCache;

use crate::ports::feed_cache::{CachedFeed, FeedCache};

struct CacheEntry {
    body: String,
    fetched_at: Instant,
}

/// Process-wide feed body cache.
///
/// Constructed once at startup and shared as `Arc<dyn FeedCache>`. TTL
/// lives with the caller, so entries here only leave by LRU pressure,
/// last-writer-wins overwrite, or explicit invalidation.
pub struct MemoryFeedCache {
    inner: RwLock<LruCache<String, CacheEntry>>,
}

impl MemoryFeedCache {
    pub fn new(max_entries: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or_else(|| {
            tracing::warn!("Cache max_entries was 0, defaulting to 100");
            NonZeroUsize::new(100).unwrap()
        });
        Self {
            inner: RwLock::new(LruCache::new(cap)),
        }
    }
}

impl FeedCache for MemoryFeedCache {
    fn get(&self, url: &str) -> Option<CachedFeed> {
        let mut cache = self.inner.write().map_or_else(
            |_| {
                tracing::error!("Cache lock poisoned on get('{url}'), returning miss");
                None
            },
            Some,
        )?;
        let entry = cache.get(url)?;
        Some(CachedFeed {
            body: entry.body.clone(),
            fetched_at: entry.fetched_at,
        })
    }

    fn put(&self, url: &str, body: &str) {
        if let Ok(mut cache) = self.inner.write() {
            cache.put(
                url.to_string(),
                CacheEntry {
                    body: body.to_string(),
                    fetched_at: Instant::now(),
                },
            );
        } else {
            tracing::error!("Cache lock poisoned on put('{url}'), skipping write");
        }
    }

    fn invalidate(&self, urls: &[String]) {
        if let Ok(mut cache) = self.inner.write() {
            for url in urls {
                cache.pop(url);
            }
        } else {
            tracing::error!("Cache lock poisoned on invalidate, skipping");
        }
    }
}
