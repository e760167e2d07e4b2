use chrono::{DateTime, Local, NaiveDate};

/// Canonical, timezone-free identifier for one calendar day.
///
/// Two `DayKey`s are equal iff they denote the same local calendar day; all
/// set operations in this crate work on `DayKey`, never on raw timestamps.
pub type DayKey = NaiveDate;

/// Truncate a moment to its local calendar day.
///
/// Local wall-clock is the single truncation reference everywhere in this
/// crate. Mixing local and UTC truncation across call sites double-counts
/// nights around midnight boundaries.
pub fn day_key(moment: &DateTime<Local>) -> DayKey {
    moment.date_naive()
}

/// The local calendar day the process considers "today".
pub fn today() -> DayKey {
    Local::now().date_naive()
}

/// Every day in the half-open window `[start, end)`, in order.
///
/// Empty when `start >= end`.
pub fn days_between(start: DayKey, end: DayKey) -> impl Iterator<Item = DayKey> {
    start.iter_days().take_while(move |day| *day < end)
}

/// Number of nights in `[check_in, check_out)`, zero for degenerate input.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn night_count(check_in: DayKey, check_out: DayKey) -> u32 {
    (check_out - check_in).num_days().max(0) as u32
}
