use std::collections::BTreeSet;
use std::sync::Arc;

use crate::adapters::feed::sync::FeedSync;
use crate::domain::availability::{NightlyQuote, NightlyRate};
use crate::domain::date::{DayKey, days_between};
use crate::domain::feed::MergedFeedBlocks;
use crate::domain::property::Property;
use crate::error::{Result, StaySyncError};
use crate::ports::stores::{OverrideStore, PropertyStore, ReservationStore};

/// Read path of the core: merges confirmed reservations, host overrides,
/// and external feed blocks into availability and price answers.
///
/// Read-only across all dependencies; the only suspension point is the
/// feed fetch. Every output is recomputed per query, so no failure can
/// leave partial state behind.
#[derive(Clone)]
pub struct AvailabilityService {
    properties: Arc<dyn PropertyStore>,
    reservations: Arc<dyn ReservationStore>,
    overrides: Arc<dyn OverrideStore>,
    feeds: Arc<FeedSync>,
}

impl AvailabilityService {
    pub fn new(
        properties: Arc<dyn PropertyStore>,
        reservations: Arc<dyn ReservationStore>,
        overrides: Arc<dyn OverrideStore>,
        feeds: Arc<FeedSync>,
    ) -> Self {
        Self {
            properties,
            reservations,
            overrides,
            feeds,
        }
    }

    fn load_property(&self, id: &str) -> Result<Property> {
        self.properties
            .property(id)
            .ok_or_else(|| StaySyncError::PropertyNotFound { id: id.to_string() })
    }

    /// Merged external blocks across every feed configured on the property.
    pub(crate) async fn external_blocks(
        &self,
        property: &Property,
        from: DayKey,
        to: DayKey,
    ) -> MergedFeedBlocks {
        self.feeds.fetch_merged(&property.feed_urls, from, to).await
    }

    /// Availability + price table for `[check_in, check_out)`.
    ///
    /// Guest-count-agnostic: the extra-guest fee is layered on by the
    /// booking caller, which knows the requested head count.
    pub async fn nightly(
        &self,
        property_id: &str,
        check_in: DayKey,
        check_out: DayKey,
    ) -> Result<NightlyQuote> {
        let property = self.load_property(property_id)?;
        let external = self.external_blocks(&property, check_in, check_out).await;
        Ok(self.nightly_with_external(&property, check_in, check_out, &external.blocks.blocked))
    }

    /// Aggregation against an already-fetched external block set. The
    /// conflict gate reuses this so one reservation attempt fetches each
    /// feed exactly once.
    pub(crate) fn nightly_with_external(
        &self,
        property: &Property,
        check_in: DayKey,
        check_out: DayKey,
        external_blocked: &BTreeSet<DayKey>,
    ) -> NightlyQuote {
        let mut rows = Vec::new();
        for day in days_between(check_in, check_out) {
            let record = self.overrides.override_for(&property.id, day);
            let available = record.as_ref().is_none_or(|o| o.available)
                && !external_blocked.contains(&day);
            let price = record
                .as_ref()
                .and_then(|o| o.price)
                .unwrap_or_else(|| property.nightly_price(day));
            rows.push(NightlyRate {
                day,
                price,
                available,
            });
        }

        let all_available = rows.iter().all(|r| r.available);
        // An empty window is trivially available at zero cost; the cleaning
        // fee applies only to an actual stay.
        let total_price = if rows.is_empty() {
            0
        } else {
            rows.iter().map(|r| r.price).sum::<i64>() + property.cleaning_fee
        };

        NightlyQuote {
            property_id: property.id.clone(),
            rows,
            total_price,
            all_available,
        }
    }

    /// Days the interactive calendar must render non-selectable: blocking
    /// reservations, host-closed days, and external feed blocks.
    pub async fn blocked_date_keys(
        &self,
        property_id: &str,
        from: DayKey,
        to: DayKey,
    ) -> Result<BTreeSet<DayKey>> {
        let property = self.load_property(property_id)?;

        let mut blocked = BTreeSet::new();
        for reservation in self.reservations.blocking_reservations(property_id) {
            blocked.extend(days_between(
                reservation.check_in.max(from),
                reservation.check_out.min(to),
            ));
        }
        for day in days_between(from, to) {
            if let Some(record) = self.overrides.override_for(property_id, day)
                && !record.available
            {
                blocked.insert(day);
            }
        }
        blocked.extend(self.external_blocks(&property, from, to).await.blocks.blocked);

        Ok(blocked)
    }

    /// Days on which a stay may end but a new one may not begin, derived
    /// from the property's feeds.
    pub async fn checkout_only_date_keys(
        &self,
        property_id: &str,
        from: DayKey,
        to: DayKey,
    ) -> Result<BTreeSet<DayKey>> {
        let property = self.load_property(property_id)?;
        Ok(self
            .external_blocks(&property, from, to)
            .await
            .blocks
            .checkout_only)
    }

    /// Administrative: a host re-saved its feed URLs or asked for fresh
    /// data; the next query for these URLs hits the network.
    pub fn invalidate_feed_cache(&self, urls: &[String]) {
        self.feeds.invalidate(urls);
    }
}
