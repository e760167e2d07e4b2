use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::date::DayKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A stay recorded by the booking collaborator, spanning the half-open
/// interval `[check_in, check_out)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub property_id: String,
    pub check_in: DayKey,
    pub check_out: DayKey,
    pub status: ReservationStatus,
    pub guests: u32,
}

impl Reservation {
    /// Whether this reservation claims nights on the calendar. Cancelled
    /// stays never block.
    pub fn blocks_calendar(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// Half-open interval overlap with `[check_in, check_out)`.
    pub fn overlaps(&self, check_in: DayKey, check_out: DayKey) -> bool {
        self.check_in < check_out && self.check_out > check_in
    }
}

/// Why a reservation attempt was turned away at the conflict gate.
///
/// The variants are mutually exclusive; the booking flow maps each to its
/// own user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RejectionReason {
    #[error("invalid request: {reason}")]
    InvalidInput { reason: String },

    #[error("property not found: {id}")]
    PropertyNotFound { id: String },

    #[error("guest count {requested} exceeds the maximum of {max}")]
    GuestCountExceeded { requested: u32, max: u32 },

    #[error("the requested nights overlap an existing reservation")]
    InternallyBooked,

    #[error("an external channel has already claimed one of the requested nights")]
    ExternallyBooked,

    #[error("the requested nights are not available")]
    Unavailable,
}

/// A priced, validated reservation request that passed the conflict gate.
///
/// Not yet durably written; the booking collaborator commits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub property_id: String,
    pub check_in: DayKey,
    pub check_out: DayKey,
    pub guests: u32,
    pub nights: u32,
    /// Sum of per-night prices over the stay.
    pub nightly_total: i64,
    pub cleaning_fee: i64,
    /// Total surcharge for guests above the property's base count.
    pub extra_guest_fee: i64,
    pub total_price: i64,
}
