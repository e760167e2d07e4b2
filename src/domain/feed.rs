use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::date::DayKey;

/// Day-level blocking information derived from parsed feed events.
///
/// Request-scoped: recomputed from raw feed bodies on every query, never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedBlocks {
    /// Days on which no new stay may begin or continue.
    pub blocked: BTreeSet<DayKey>,
    /// Days on which a stay may end but a new one may not begin
    /// (same-day turnover).
    pub checkout_only: BTreeSet<DayKey>,
}

impl FeedBlocks {
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty() && self.checkout_only.is_empty()
    }

    /// Set-union merge; feed ordering is not significant.
    pub fn merge(&mut self, other: Self) {
        self.blocked.extend(other.blocked);
        self.checkout_only.extend(other.checkout_only);
    }
}

/// Result of synchronizing one feed source.
///
/// `Degraded` and a feed that simply lists no events both resolve to "no
/// external restriction", but they stay distinguishable so operators can
/// tell "confirmed free" from "unknown, treated as free".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Fetched(FeedBlocks),
    Degraded { url: String, reason: String },
}

impl SyncOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The blocks this outcome contributes; a degraded source contributes
    /// none (fail-open).
    pub fn into_blocks(self) -> FeedBlocks {
        match self {
            Self::Fetched(blocks) => blocks,
            Self::Degraded { .. } => FeedBlocks::default(),
        }
    }
}

/// Union across every feed source configured on a property, with the
/// sources that failed to sync reported alongside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedFeedBlocks {
    pub blocks: FeedBlocks,
    pub degraded_urls: Vec<String>,
}
