use crate::domain::availability::AvailabilityOverride;
use crate::domain::date::DayKey;
use crate::domain::property::Property;
use crate::domain::reservation::Reservation;

/// Listing configuration, owned by the listing-management collaborator.
pub trait PropertyStore: Send + Sync {
    fn property(&self, id: &str) -> Option<Property>;
}

/// Overlap conflict reported by the durable-write boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapConflict;

/// Reservations recorded by the booking collaborator.
pub trait ReservationStore: Send + Sync {
    /// Pending and confirmed reservations for one property; cancelled stays
    /// are excluded at the source.
    fn blocking_reservations(&self, property_id: &str) -> Vec<Reservation>;

    /// Atomic check-then-insert: refuses the write when any blocking
    /// reservation overlaps the candidate's `[check_in, check_out)`.
    fn insert_if_vacant(&self, reservation: Reservation) -> Result<(), OverlapConflict>;
}

/// Host calendar edits, owned by the host-facing calendar UI.
pub trait OverrideStore: Send + Sync {
    fn override_for(&self, property_id: &str, day: DayKey) -> Option<AvailabilityOverride>;
}
