use serde::{Deserialize, Serialize};

use crate::domain::date::DayKey;

/// Host-entered per-day calendar edit: close a day, or reprice it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityOverride {
    pub property_id: String,
    pub day: DayKey,
    pub available: bool,
    /// Replaces the computed seasonal price when set.
    #[serde(default)]
    pub price: Option<i64>,
}

/// One night with its resolved price and availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightlyRate {
    pub day: DayKey,
    pub price: i64,
    pub available: bool,
}

/// Availability + price table for one stay window on one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightlyQuote {
    pub property_id: String,
    pub rows: Vec<NightlyRate>,
    /// Sum of row prices plus the cleaning fee; zero for an empty window.
    pub total_price: i64,
    pub all_available: bool,
}

impl std::fmt::Display for NightlyQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Nightly availability for property {}", self.property_id)?;
        writeln!(f, "{:<12} {:>10} {:>10}", "Date", "Price", "Available")?;
        writeln!(f, "{}", "-".repeat(34))?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<12} {:>10} {:>10}",
                row.day.to_string(),
                row.price,
                if row.available { "Yes" } else { "No" }
            )?;
        }
        write!(f, "Total: {}", self.total_price)?;
        if !self.all_available {
            write!(f, " (window contains unavailable nights)")?;
        }
        Ok(())
    }
}
