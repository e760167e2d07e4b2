use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::date::DayKey;

/// Read-only listing configuration, owned by the listing-management
/// collaborator. Prices are minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    /// Nightly base price before seasonal scaling.
    pub base_price: i64,
    /// Seasonal multiplier per calendar month, January first.
    pub monthly_multipliers: [f64; 12],
    pub cleaning_fee: i64,
    /// Guests included in the nightly price.
    pub base_guests: u32,
    pub max_guests: u32,
    /// Nightly fee per guest above `base_guests`.
    pub extra_guest_fee: i64,
    /// External calendar feeds claiming nights on this property.
    #[serde(default)]
    pub feed_urls: Vec<String>,
}

impl Property {
    pub fn seasonal_multiplier(&self, day: DayKey) -> f64 {
        self.monthly_multipliers[day.month0() as usize]
    }

    /// Computed price for one night with no override: the base price scaled
    /// by the month's multiplier, rounded to the nearest unit.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn nightly_price(&self, day: DayKey) -> i64 {
        (self.base_price as f64 * self.seasonal_multiplier(day)).round() as i64
    }
}
