//! Flag events that correspond to conflict ranges, or flag a whole day as busy.
//!
//! Matching is exact: an event is a conflict only when both its local start and
//! end, rendered as `HH:MM`, equal a range's `start24` and `end24`. There is no
//! overlap or fuzzy matching. Only events on the target day are considered.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::conflict::ConflictRange;
use crate::event::Event;

/// Number of same-day events at which the busy-day advisory fires by default.
pub const DEFAULT_BUSY_DAY_THRESHOLD: usize = 3;

/// A generic warning that the target day is crowded, listing all of its events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyDayAdvisory {
    pub date: NaiveDate,
    pub message: String,
    pub events: Vec<Event>,
}

/// Annotate events on `target_date` with `has_conflict`.
///
/// With no ranges the input is returned untouched: no event gains a flag at all.
/// With ranges, every event on the target day gets `Some(true)` or `Some(false)`;
/// an event that already carries `Some(true)` keeps it. Events on other days
/// pass through unchanged.
pub fn mark_conflicts(
    events: Vec<Event>,
    ranges: &[ConflictRange],
    target_date: NaiveDate,
    tz: Tz,
) -> Vec<Event> {
    if ranges.is_empty() {
        return events;
    }

    let marked: Vec<Event> = events
        .into_iter()
        .map(|mut event| {
            if !event.is_on(target_date, tz) {
                return event;
            }

            let start24 = event.local_start(tz).format("%H:%M").to_string();
            let end24 = event.local_end(tz).format("%H:%M").to_string();

            let matched = ranges
                .iter()
                .find(|range| range.start24 == start24 && range.end24 == end24);

            match matched {
                Some(range) => tracing::debug!(
                    title = event.title.as_str(),
                    start = start24.as_str(),
                    end = end24.as_str(),
                    range_start = range.start12.as_str(),
                    range_end = range.end12.as_str(),
                    "event matches conflict range"
                ),
                None => tracing::debug!(
                    title = event.title.as_str(),
                    start = start24.as_str(),
                    end = end24.as_str(),
                    "no conflict range matches event"
                ),
            }

            event.has_conflict = Some(event.is_conflict() || matched.is_some());
            event
        })
        .collect();

    tracing::debug!(
        %target_date,
        ranges = ranges.len(),
        conflicts = conflict_count(&marked),
        "conflict matching finished"
    );

    marked
}

/// Build the busy-day advisory when `threshold` or more events fall on `target_date`.
///
/// This is the fallback used when the caller supplied no conflict ranges; it
/// never sets per-event flags.
pub fn busy_day_advisory(
    events: &[Event],
    target_date: NaiveDate,
    tz: Tz,
    threshold: usize,
) -> Option<BusyDayAdvisory> {
    let day_events: Vec<Event> = events
        .iter()
        .filter(|e| e.is_on(target_date, tz))
        .cloned()
        .collect();

    if day_events.is_empty() || day_events.len() < threshold {
        return None;
    }

    Some(BusyDayAdvisory {
        date: target_date,
        message: format!(
            "Busy day: you have {} events scheduled. Consider leaving buffer time between meetings.",
            day_events.len()
        ),
        events: day_events,
    })
}

/// Count events flagged as conflicts.
pub fn conflict_count(events: &[Event]) -> usize {
    events.iter().filter(|e| e.is_conflict()).count()
}
