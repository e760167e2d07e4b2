use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, error};

use crate::adapters::feed::parser::{self, EndDateConvention};
use crate::config::types::SyncConfig;
use crate::domain::date::DayKey;
use crate::domain::feed::{MergedFeedBlocks, SyncOutcome};
use crate::ports::feed_cache::FeedCache;
use crate::ports::feed_transport::FeedTransport;

/// Fetch-on-demand synchronization of external calendar feeds.
///
/// Wraps the transport with the process-wide body cache and the tolerant
/// parser. Failure is fail-open by policy: an unreachable or invalid
/// source degrades to "no external restriction", logged for operators,
/// never an error to callers. Under-blocking risks an external double
/// booking that is reconciled manually; over-blocking would refuse every
/// booking whenever one channel is down.
pub struct FeedSync {
    transport: Arc<dyn FeedTransport>,
    cache: Arc<dyn FeedCache>,
    ttl: Duration,
}

impl FeedSync {
    pub fn new(
        transport: Arc<dyn FeedTransport>,
        cache: Arc<dyn FeedCache>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            transport,
            cache,
            ttl: Duration::from_secs(config.feed_ttl_secs),
        }
    }

    /// Resolve one source into day-level blocks for `[from, to)`.
    pub async fn fetch(&self, url: &str, from: DayKey, to: DayKey) -> SyncOutcome {
        let body = match self.raw_body(url).await {
            Ok(body) => body,
            Err(e) => {
                error!(url, error = %e, "Feed sync degraded; treating source as unblocked");
                return SyncOutcome::Degraded {
                    url: url.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        let convention = EndDateConvention::for_url(url);
        SyncOutcome::Fetched(parser::parse_feed(&body, from, to, convention))
    }

    /// Union across every source configured on one property, fetched
    /// concurrently. Fetch ordering is not significant.
    pub async fn fetch_merged(&self, urls: &[String], from: DayKey, to: DayKey) -> MergedFeedBlocks {
        let outcomes = join_all(urls.iter().map(|url| self.fetch(url, from, to))).await;

        let mut merged = MergedFeedBlocks::default();
        for outcome in outcomes {
            match outcome {
                SyncOutcome::Fetched(blocks) => merged.blocks.merge(blocks),
                SyncOutcome::Degraded { url, .. } => merged.degraded_urls.push(url),
            }
        }
        merged
    }

    /// Drop cached bodies so the next query refetches. Used when a host
    /// re-saves feed URLs or asks for an immediate refresh.
    pub fn invalidate(&self, urls: &[String]) {
        self.cache.invalidate(urls);
    }

    async fn raw_body(&self, url: &str) -> crate::error::Result<String> {
        if let Some(cached) = self.cache.get(url)
            && cached.fetched_at.elapsed() < self.ttl
        {
            debug!(url, "Feed cache hit");
            return Ok(cached.body);
        }

        let body = self.transport.fetch(url).await?;
        self.cache.put(url, &body);
        Ok(body)
    }
}
