use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::date::{self, DayKey, days_between, night_count};
use crate::domain::reservation::{
    RejectionReason, Reservation, ReservationDraft, ReservationStatus,
};
use crate::ports::stores::{PropertyStore, ReservationStore};
use crate::service::availability::AvailabilityService;

/// Write-guarding path: the conflict gate every reservation request must
/// pass before anything is durably created.
#[derive(Clone)]
pub struct BookingService {
    properties: Arc<dyn PropertyStore>,
    reservations: Arc<dyn ReservationStore>,
    availability: AvailabilityService,
}

impl BookingService {
    pub fn new(
        properties: Arc<dyn PropertyStore>,
        reservations: Arc<dyn ReservationStore>,
        availability: AvailabilityService,
    ) -> Self {
        Self {
            properties,
            reservations,
            availability,
        }
    }

    /// Validate and price a reservation request.
    ///
    /// Cheap local validation runs before anything network-bound, the
    /// internal-overlap check before the external feeds are consulted, and
    /// the override-merged aggregation last, to fail fast on the common
    /// cases. The returned draft is not yet durable; see [`Self::commit`].
    pub async fn try_reserve(
        &self,
        property_id: &str,
        check_in: &str,
        check_out: &str,
        guests: u32,
    ) -> Result<ReservationDraft, RejectionReason> {
        let (check_in, check_out) = parse_window(check_in, check_out)?;
        if check_in >= check_out {
            return Err(invalid("check-out must be after check-in"));
        }
        if check_in < date::today() {
            return Err(invalid("check-in date is in the past"));
        }
        if guests < 1 {
            return Err(invalid("at least one guest is required"));
        }

        let Some(property) = self.properties.property(property_id) else {
            return Err(RejectionReason::PropertyNotFound {
                id: property_id.to_string(),
            });
        };
        if guests > property.max_guests {
            return Err(RejectionReason::GuestCountExceeded {
                requested: guests,
                max: property.max_guests,
            });
        }

        let internally_booked = self
            .reservations
            .blocking_reservations(property_id)
            .iter()
            .any(|r| r.overlaps(check_in, check_out));
        if internally_booked {
            return Err(RejectionReason::InternallyBooked);
        }

        let external = self
            .availability
            .external_blocks(&property, check_in, check_out)
            .await;
        if !external.degraded_urls.is_empty() {
            warn!(
                property_id,
                degraded = external.degraded_urls.len(),
                "Gating reservation with degraded feed sync"
            );
        }
        if days_between(check_in, check_out).any(|day| external.blocks.blocked.contains(&day)) {
            return Err(RejectionReason::ExternallyBooked);
        }

        let quote = self.availability.nightly_with_external(
            &property,
            check_in,
            check_out,
            &external.blocks.blocked,
        );
        if !quote.all_available {
            return Err(RejectionReason::Unavailable);
        }

        let nights = night_count(check_in, check_out);
        let nightly_total: i64 = quote.rows.iter().map(|r| r.price).sum();
        let extra_guest_fee = i64::from(guests.saturating_sub(property.base_guests))
            * property.extra_guest_fee
            * i64::from(nights);

        Ok(ReservationDraft {
            property_id: property.id,
            check_in,
            check_out,
            guests,
            nights,
            nightly_total,
            cleaning_fee: property.cleaning_fee,
            extra_guest_fee,
            total_price: nightly_total + property.cleaning_fee + extra_guest_fee,
        })
    }

    /// Durably record a gated draft as a pending reservation.
    ///
    /// The overlap check re-runs inside the store's write boundary: of two
    /// near-simultaneous winners of the gate, one commit loses with
    /// `InternallyBooked`.
    pub fn commit(
        &self,
        draft: &ReservationDraft,
        reservation_id: &str,
    ) -> Result<Reservation, RejectionReason> {
        let reservation = Reservation {
            id: reservation_id.to_string(),
            property_id: draft.property_id.clone(),
            check_in: draft.check_in,
            check_out: draft.check_out,
            status: ReservationStatus::Pending,
            guests: draft.guests,
        };
        if self
            .reservations
            .insert_if_vacant(reservation.clone())
            .is_err()
        {
            return Err(RejectionReason::InternallyBooked);
        }
        info!(
            reservation_id,
            property_id = %draft.property_id,
            nights = draft.nights,
            "Reservation recorded"
        );
        Ok(reservation)
    }
}

fn invalid(reason: &str) -> RejectionReason {
    RejectionReason::InvalidInput {
        reason: reason.to_string(),
    }
}

fn parse_window(check_in: &str, check_out: &str) -> Result<(DayKey, DayKey), RejectionReason> {
    let parse = |raw: &str, which: &str| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            invalid(&format!("{which} date '{raw}' is not a valid YYYY-MM-DD date"))
        })
    };
    Ok((parse(check_in, "check-in")?, parse(check_out, "check-out")?))
}
