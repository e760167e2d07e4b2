use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::availability::AvailabilityOverride;
use crate::domain::date::DayKey;
use crate::domain::property::Property;
use crate::domain::reservation::Reservation;
use crate::ports::stores::{OverlapConflict, OverrideStore, PropertyStore, ReservationStore};

/// In-memory implementations of the collaborator store ports, for tests and
/// single-process embedding.
#[derive(Default)]
pub struct InMemoryPropertyStore {
    properties: RwLock<HashMap<String, Property>>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, property: Property) {
        if let Ok(mut map) = self.properties.write() {
            map.insert(property.id.clone(), property);
        }
    }
}

impl PropertyStore for InMemoryPropertyStore {
    fn property(&self, id: &str) -> Option<Property> {
        self.properties.read().ok()?.get(id).cloned()
    }
}

#[derive(Default)]
pub struct InMemoryReservationStore {
    reservations: RwLock<Vec<Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional insert, for seeding existing state.
    pub fn insert(&self, reservation: Reservation) {
        if let Ok(mut all) = self.reservations.write() {
            all.push(reservation);
        }
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn blocking_reservations(&self, property_id: &str) -> Vec<Reservation> {
        self.reservations
            .read()
            .map(|all| {
                all.iter()
                    .filter(|r| r.property_id == property_id && r.blocks_calendar())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn insert_if_vacant(&self, reservation: Reservation) -> Result<(), OverlapConflict> {
        // Overlap re-check and insert share one write lock: of two
        // near-simultaneous winners of the conflict gate, one insert loses.
        let Ok(mut all) = self.reservations.write() else {
            tracing::error!("Reservation store lock poisoned, refusing insert");
            return Err(OverlapConflict);
        };
        let clash = all.iter().any(|r| {
            r.property_id == reservation.property_id
                && r.blocks_calendar()
                && r.overlaps(reservation.check_in, reservation.check_out)
        });
        if clash {
            return Err(OverlapConflict);
        }
        all.push(reservation);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryOverrideStore {
    overrides: RwLock<HashMap<(String, DayKey), AvailabilityOverride>>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, record: AvailabilityOverride) {
        if let Ok(mut map) = self.overrides.write() {
            map.insert((record.property_id.clone(), record.day), record);
        }
    }
}

impl OverrideStore for InMemoryOverrideStore {
    fn override_for(&self, property_id: &str, day: DayKey) -> Option<AvailabilityOverride> {
        self.overrides
            .read()
            .ok()?
            .get(&(property_id.to_string(), day))
            .cloned()
    }
}
