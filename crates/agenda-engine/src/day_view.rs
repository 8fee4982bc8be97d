//! Assemble the render model for one day.
//!
//! Pipeline: mark conflicts on the full event list, keep the target day's
//! events, bin them into hourly slots, group each slot by overlap, then order
//! each group by calendar priority. Slots without events carry a
//! [`FreeSlotSelection`] command the presentation layer sends when the user
//! picks that slot.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::AgendaConfig;
use crate::conflict::ConflictRange;
use crate::error::{AgendaError, Result};
use crate::event::Event;
use crate::matcher::{self, BusyDayAdvisory};
use crate::overlap;
use crate::priority::{self, PrioritizedGroup};
use crate::timeline::{self, TimeSlot};

/// Payload for "the user picked this free slot".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlotSelection {
    /// Slot label, e.g. `"2:00 PM"`.
    pub time_slot: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// One hour of the day view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub hour: u32,
    pub time24: String,
    pub label: String,
    pub groups: Vec<PrioritizedGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_slot: Option<FreeSlotSelection>,
}

impl SlotView {
    pub fn is_free(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub heading: String,
    /// Events on the day, including those outside the slot window.
    pub event_count: usize,
    pub conflict_count: usize,
    pub slots: Vec<SlotView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<BusyDayAdvisory>,
}

impl DayView {
    /// No events at all on this day (a valid, successful result).
    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }

    /// `"4 events"`, or `"4 events, 1 conflict detected"` when any are flagged.
    pub fn summary(&self) -> String {
        let events = plural(self.event_count, "event");
        if self.conflict_count > 0 {
            format!(
                "{}, {} detected",
                events,
                plural(self.conflict_count, "conflict")
            )
        } else {
            events
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns `AgendaError::InvalidDate` for anything else, including
/// impossible calendar dates such as `2026-02-30`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| AgendaError::InvalidDate(format!("'{}' ({}); expected YYYY-MM-DD", raw, e)))
}

/// Parse a `YYYY-MM-DD` date parameter, falling back to `today` when it is
/// absent or invalid.
pub fn resolve_target_date(param: Option<&str>, today: NaiveDate) -> NaiveDate {
    match param {
        Some(raw) => parse_date(raw).unwrap_or_else(|e| {
            tracing::warn!(date = raw, error = %e, "invalid date parameter; showing today");
            today
        }),
        None => today,
    }
}

/// `"Today"`, `"Tomorrow"`, `"Yesterday"`, or e.g. `"Monday, March 16, 2026"`.
pub fn day_heading(date: NaiveDate, today: NaiveDate) -> String {
    match date.signed_duration_since(today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%A, %B %d, %Y").to_string(),
    }
}

/// Events whose local start falls on `date`, in input order.
pub fn events_on_date(events: &[Event], date: NaiveDate, tz: Tz) -> Vec<Event> {
    events.iter().filter(|e| e.is_on(date, tz)).cloned().collect()
}

/// Build the day view for `date`.
///
/// `ranges` are the parsed conflict ranges from the upstream caller. When there
/// are none, conflict flags are left off and the busy-day advisory is computed
/// instead.
pub fn build_day_view(
    events: Vec<Event>,
    ranges: &[ConflictRange],
    date: NaiveDate,
    today: NaiveDate,
    config: &AgendaConfig,
) -> DayView {
    let tz = config.timezone;

    let marked = matcher::mark_conflicts(events, ranges, date, tz);
    let day_events = events_on_date(&marked, date, tz);

    let advisory = if ranges.is_empty() {
        matcher::busy_day_advisory(&day_events, date, tz, config.busy_day_threshold)
    } else {
        None
    };

    let slots = timeline::bin_events(&day_events, config.window, tz)
        .into_iter()
        .map(|slot| slot_view(slot, date, config))
        .collect();

    DayView {
        date,
        heading: day_heading(date, today),
        event_count: day_events.len(),
        conflict_count: matcher::conflict_count(&day_events),
        slots,
        advisory,
    }
}

fn slot_view(slot: TimeSlot, date: NaiveDate, config: &AgendaConfig) -> SlotView {
    let groups: Vec<PrioritizedGroup> = overlap::group_overlaps(&slot.events, config.timezone)
        .into_iter()
        .filter_map(|group| priority::resolve_priority(group, &config.priorities))
        .collect();

    let free_slot = groups.is_empty().then(|| FreeSlotSelection {
        time_slot: slot.label.clone(),
        date: date.format("%Y-%m-%d").to_string(),
    });

    SlotView {
        hour: slot.hour,
        time24: slot.time24,
        label: slot.label,
        groups,
        free_slot,
    }
}
