//! Event-to-day matching.
//!
//! Scans the full collection on every call. The store keeps events in
//! insertion order, so no sorting or secondary index is maintained; at
//! editor scale a linear scan per grid cell is cheap enough.

use crate::model::event::CalendarEvent;
use chrono::NaiveDate;

/// Events whose day range covers `date`, in input order.
pub fn events_on_date(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|event| event.covers_day(date)).collect()
}

/// Events touching any day in `first..=last`, in input order.
///
/// Returns nothing when `last < first`.
pub fn events_in_range(
    events: &[CalendarEvent],
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<&CalendarEvent> {
    if last < first {
        return Vec::new();
    }
    events
        .iter()
        .filter(|event| event.start_day() <= last && first <= event.end_day())
        .collect()
}
