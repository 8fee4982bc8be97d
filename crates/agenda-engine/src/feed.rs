//! Merge per-calendar event lists into the single feed the day view consumes.
//!
//! A deployment reads several calendars. Each calendar's events are tagged with
//! the calendar's id and its configured display name and color, then all
//! calendars are flattened into one list ordered by start.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::CalendarSource;
use crate::error::{AgendaError, Result};
use crate::event::Event;

/// Page size when fetching a single day.
pub const DAY_MAX_RESULTS: u32 = 50;
/// Page size when fetching the default range.
pub const RANGE_MAX_RESULTS: u32 = 250;
/// Days before today covered by the default range.
pub const RANGE_DAYS_BEFORE: i64 = 7;
/// Days after today covered by the default range.
pub const RANGE_DAYS_AFTER: i64 = 30;

/// The events read from one calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarFeed {
    pub calendar_id: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// The time range and page size to request from the calendar provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchWindow {
    pub time_min: NaiveDateTime,
    pub time_max: NaiveDateTime,
    pub max_results: u32,
}

impl FetchWindow {
    /// A whole requested day, or the default range around `now`.
    ///
    /// The default range keeps the time of day: it runs from `now` minus
    /// [`RANGE_DAYS_BEFORE`] to `now` plus [`RANGE_DAYS_AFTER`].
    pub fn for_request(date: Option<NaiveDate>, now: NaiveDateTime) -> Self {
        match date {
            Some(date) => Self {
                time_min: date.and_time(NaiveTime::MIN),
                time_max: date.and_hms_opt(23, 59, 59).unwrap_or(date.and_time(NaiveTime::MIN)),
                max_results: DAY_MAX_RESULTS,
            },
            None => Self {
                time_min: now - Duration::days(RANGE_DAYS_BEFORE),
                time_max: now + Duration::days(RANGE_DAYS_AFTER),
                max_results: RANGE_MAX_RESULTS,
            },
        }
    }
}

/// Tag each feed's events with their calendar and merge them by start.
///
/// Feeds for calendars missing from `sources` keep their events' own name and
/// color. The sort is stable: events starting together keep feed order.
pub fn merge_feeds(feeds: Vec<CalendarFeed>, sources: &[CalendarSource], tz: Tz) -> Vec<Event> {
    let mut merged: Vec<Event> = Vec::new();

    for feed in feeds {
        let source = sources.iter().find(|s| s.id == feed.calendar_id);
        if source.is_none() {
            tracing::debug!(calendar = feed.calendar_id.as_str(), "feed has no configured calendar");
        }
        tracing::debug!(
            calendar = feed.calendar_id.as_str(),
            events = feed.events.len(),
            "merging calendar feed"
        );

        merged.extend(feed.events.into_iter().map(|mut event| {
            event.calendar_id = Some(feed.calendar_id.clone());
            if let Some(source) = source {
                event.calendar_name = Some(source.name.clone());
                event.calendar_color = source.color.clone();
            }
            event
        }));
    }

    merged.sort_by_key(|e| e.start_instant(tz));
    tracing::debug!(events = merged.len(), "merged calendar feeds");
    merged
}

/// Merge every calendar that loaded, skipping the ones that failed.
///
/// Each entry pairs a calendar id with its load outcome. A failed calendar is
/// logged and left out; the others are tagged and merged as in
/// [`merge_feeds`], using [`calendar_sources`] for their metadata.
///
/// # Errors
/// Returns the last calendar's error when every calendar failed. An empty
/// `loads` is `Ok` with no events.
pub fn merge_loaded(
    loads: Vec<(String, Result<EventsPayload>)>,
    configured: &[CalendarSource],
    tz: Tz,
) -> Result<Vec<Event>> {
    let mut feeds: Vec<CalendarFeed> = Vec::new();
    let mut reported: Vec<CalendarSource> = Vec::new();
    let mut last_error = None;

    for (calendar_id, load) in loads {
        match load {
            Ok(payload) => {
                reported.extend(payload.calendars);
                feeds.push(CalendarFeed {
                    calendar_id,
                    events: payload.events,
                });
            }
            Err(e) => {
                tracing::warn!(calendar = calendar_id.as_str(), error = %e, "skipping calendar that failed to load");
                last_error = Some(e);
            }
        }
    }

    if feeds.is_empty() {
        if let Some(e) = last_error {
            return Err(e);
        }
    }

    let sources = calendar_sources(configured, &reported);
    Ok(merge_feeds(feeds, &sources, tz))
}

/// The calendar provider's response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub success: bool,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub calendars: Vec<CalendarSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderResponse {
    /// The events of a successful response.
    ///
    /// # Errors
    /// Returns `AgendaError::Provider` when the provider reported failure. An
    /// empty successful response is `Ok` with no events.
    pub fn into_events(self) -> Result<Vec<Event>> {
        if self.success {
            Ok(self.events)
        } else {
            Err(AgendaError::Provider(
                self.error.unwrap_or_else(|| "Failed to load events".to_string()),
            ))
        }
    }
}

/// A decoded events payload: the events plus any calendar metadata the
/// provider sent alongside them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventsPayload {
    pub events: Vec<Event>,
    /// Empty for a bare array.
    pub calendars: Vec<CalendarSource>,
}

/// Decode either a provider envelope or a bare JSON array of events, keeping
/// the envelope's `calendars`.
///
/// # Errors
/// Returns `AgendaError::Json` for malformed input (including unparseable
/// timestamps) and `AgendaError::Provider` for a failed envelope.
pub fn parse_payload(json: &str) -> Result<EventsPayload> {
    if json.trim_start().starts_with('[') {
        return Ok(EventsPayload {
            events: serde_json::from_str(json)?,
            calendars: Vec::new(),
        });
    }
    let mut response: ProviderResponse = serde_json::from_str(json)?;
    let calendars = std::mem::take(&mut response.calendars);
    Ok(EventsPayload {
        events: response.into_events()?,
        calendars,
    })
}

/// Decode either a provider envelope or a bare JSON array of events.
///
/// # Errors
/// Same as [`parse_payload`].
pub fn parse_events_payload(json: &str) -> Result<Vec<Event>> {
    parse_payload(json).map(|payload| payload.events)
}

/// Calendar metadata for merging: the configured calendars, or when none are
/// configured, the calendars the provider reported, first occurrence per id.
pub fn calendar_sources(configured: &[CalendarSource], reported: &[CalendarSource]) -> Vec<CalendarSource> {
    if !configured.is_empty() {
        return configured.to_vec();
    }

    let mut sources: Vec<CalendarSource> = Vec::new();
    for source in reported {
        if !sources.iter().any(|s| s.id == source.id) {
            sources.push(source.clone());
        }
    }
    sources
}
