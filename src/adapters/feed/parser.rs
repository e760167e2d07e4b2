use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::date::{DayKey, days_between};
use crate::domain::feed::FeedBlocks;

/// How a feed source encodes its event end marker.
///
/// `ExclusiveEnd` sources mark the day after the last occupied night,
/// matching this crate's own `[check_in, check_out)` convention.
/// `InclusiveEnd` sources mark the last occupied night itself, so their
/// bare-date end markers are shifted forward one day before use. Getting
/// this wrong either strands bookable nights as blocked or frees nights
/// that are actually occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDateConvention {
    ExclusiveEnd,
    InclusiveEnd,
}

/// Vendors known to publish inclusive end markers.
const INCLUSIVE_END_VENDORS: &[&str] = &["vrbo", "homeaway"];

impl EndDateConvention {
    /// Select the convention for a source URL. Unrecognized sources get the
    /// non-adjusted interpretation.
    pub fn for_url(url: &str) -> Self {
        let lowered = url.to_ascii_lowercase();
        if INCLUSIVE_END_VENDORS
            .iter()
            .any(|vendor| lowered.contains(vendor))
        {
            Self::InclusiveEnd
        } else {
            Self::ExclusiveEnd
        }
    }
}

/// Parse a raw calendar feed into per-day block sets for `[from, to)`.
///
/// Tolerant by policy: a malformed record is skipped, an empty or
/// non-matching body yields two empty sets, and nothing here returns an
/// error. "Parse failure" and "no events in window" are indistinguishable
/// to callers, consistent with the fetcher's fail-open handling.
pub fn parse_feed(
    raw: &str,
    from: DayKey,
    to: DayKey,
    convention: EndDateConvention,
) -> FeedBlocks {
    let mut blocks = FeedBlocks::default();
    if from >= to {
        return blocks;
    }

    for event in extract_events(&unfold_lines(raw)) {
        let Some(span) = event_span(&event, convention) else {
            continue;
        };
        if span.end <= span.start || span.end <= from || span.start >= to {
            continue;
        }

        blocks
            .blocked
            .extend(days_between(span.start.max(from), span.end.min(to)));

        // Same-day turnover: a departure may happen on either boundary day
        // of the span, a new arrival may not.
        for transition in [span.start, span.end] {
            if transition >= from && transition < to {
                blocks.checkout_only.insert(transition);
            }
        }
    }
    blocks
}

/// Undo line folding before any field parsing: a line beginning with a
/// space or tab continues the previous line.
fn unfold_lines(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix(' ').or_else(|| line.strip_prefix('\t'))
            && let Some(last) = lines.last_mut()
        {
            last.push_str(rest);
            continue;
        }
        lines.push(line.to_string());
    }
    lines
}

/// Split unfolded lines into independent event records.
///
/// An unterminated record at end of input is dropped. Nested components
/// inside an event (alarms and the like) are opaque and skipped.
fn extract_events(lines: &[String]) -> Vec<Vec<String>> {
    let mut events = Vec::new();
    let mut current: Option<Vec<String>> = None;
    let mut nested_depth = 0usize;

    for line in lines {
        let upper = line.trim().to_ascii_uppercase();
        if current.is_none() {
            if upper == "BEGIN:VEVENT" {
                current = Some(Vec::new());
                nested_depth = 0;
            }
            continue;
        }
        if upper.starts_with("BEGIN:") {
            nested_depth += 1;
        } else if upper == "END:VEVENT" && nested_depth == 0 {
            if let Some(done) = current.take() {
                events.push(done);
            }
        } else if upper.starts_with("END:") {
            nested_depth = nested_depth.saturating_sub(1);
        } else if nested_depth == 0
            && let Some(event) = current.as_mut()
        {
            event.push(line.clone());
        }
    }
    events
}

/// A content line's property name (parameters stripped) and value.
/// `DTSTART;VALUE=DATE:20240610` → (`DTSTART`, `20240610`).
fn property_line(line: &str) -> Option<(String, &str)> {
    let (head, value) = line.split_once(':')?;
    let name = head
        .split(';')
        .next()
        .unwrap_or(head)
        .trim()
        .to_ascii_uppercase();
    Some((name, value.trim()))
}

/// A start or end marker with the day it falls on.
struct Marker {
    moment: NaiveDateTime,
    bare_date: bool,
}

/// Parse a marker in any of the encodings seen in real feeds: `YYYYMMDD`,
/// `YYYYMMDDTHHMMSS`, the UTC-flagged `...Z` variant, and the dashed forms
/// some vendors emit. Sub-day precision survives only long enough to
/// establish the calendar day.
fn parse_marker(value: &str) -> Option<Marker> {
    let value = value.trim();
    let value = value.strip_suffix('Z').unwrap_or(value);

    for fmt in ["%Y%m%dT%H%M%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(moment) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(Marker {
                moment,
                bare_date: false,
            });
        }
    }
    for fmt in ["%Y%m%d", "%Y-%m-%d"] {
        if let Ok(day) = NaiveDate::parse_from_str(value, fmt) {
            return Some(Marker {
                moment: day.and_time(NaiveTime::MIN),
                bare_date: true,
            });
        }
    }
    None
}

/// Parse an ISO-8601 duration subset: weeks, days, hours, minutes,
/// seconds. `P2D` is two days, `PT36H` is 36 hours. Negative, zero, or
/// unparseable input is rejected.
fn parse_duration(value: &str) -> Option<Duration> {
    let rest = value.trim().strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once(['T', 't']) {
        Some((date, time)) => (date, time),
        None => (rest, ""),
    };

    let mut total_secs: i64 = 0;
    for (part, units) in [
        (date_part, [('W', 604_800), ('D', 86_400)].as_slice()),
        (time_part, [('H', 3600), ('M', 60), ('S', 1)].as_slice()),
    ] {
        let mut digits = String::new();
        for ch in part.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }
            let unit = units
                .iter()
                .find(|(marker, _)| ch.eq_ignore_ascii_case(marker))?;
            let n: i64 = digits.parse().ok()?;
            digits.clear();
            total_secs = total_secs.checked_add(n.checked_mul(unit.1)?)?;
        }
        // Trailing digits with no unit marker
        if !digits.is_empty() {
            return None;
        }
    }

    (total_secs > 0)
        .then(|| Duration::try_seconds(total_secs))
        .flatten()
}

/// An event's occupied span as a half-open day interval.
struct EventSpan {
    start: DayKey,
    end: DayKey,
}

/// Resolve one record's span, or `None` when the record is unusable:
/// explicitly cancelled, or missing a start marker.
fn event_span(event: &[String], convention: EndDateConvention) -> Option<EventSpan> {
    let mut start: Option<Marker> = None;
    let mut end: Option<Marker> = None;
    let mut duration: Option<Duration> = None;

    for line in event {
        let Some((name, value)) = property_line(line) else {
            continue;
        };
        match name.as_str() {
            "STATUS" if value.eq_ignore_ascii_case("CANCELLED") => return None,
            "DTSTART" => start = parse_marker(value),
            "DTEND" => end = parse_marker(value),
            "DURATION" => duration = parse_duration(value),
            _ => {}
        }
    }

    let start = start?;
    let start_day = start.moment.date();

    let end_day = if let Some(end) = end {
        let day = end.moment.date();
        // Inclusive-end vendors mark the last occupied night itself; shift
        // bare dates forward so every span here is exclusive. Date-time
        // markers are already instants and need no adjustment.
        if convention == EndDateConvention::InclusiveEnd && end.bare_date {
            day.succ_opt()?
        } else {
            day
        }
    } else if let Some(duration) = duration {
        start.moment.checked_add_signed(duration)?.date()
    } else {
        start_day.succ_opt()?
    };

    Some(EventSpan {
        start: start_day,
        end: end_day,
    })
}
