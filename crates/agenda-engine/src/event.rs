//! Calendar events as delivered by the calendar provider.
//!
//! Providers send `start`/`end` as ISO 8601 strings in one of three shapes: a
//! zoned date-time (`2026-03-16T09:00:00-04:00`), a floating date-time without an
//! offset (`2026-03-16T09:00:00`) or a bare date for all-day events (`2026-03-16`).
//! [`EventTime`] keeps the raw text so events serialize back exactly as received.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AgendaError, Result};

/// Title shown for events the provider sent without one.
pub const DEFAULT_TITLE: &str = "No Title";

const FLOATING_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// The parsed form of an event timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeValue {
    /// A date-time carrying its own UTC offset.
    Zoned(DateTime<FixedOffset>),
    /// A wall-clock date-time, read in the configured timezone.
    Floating(NaiveDateTime),
    /// An all-day date, read as local midnight.
    AllDay(NaiveDate),
}

/// An event boundary: the provider's raw string plus its parsed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventTime {
    raw: String,
    value: TimeValue,
}

impl EventTime {
    /// Parse an ISO 8601 timestamp.
    ///
    /// # Errors
    /// Returns `AgendaError::InvalidTimestamp` when the string is none of the
    /// accepted shapes.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        let value = if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            TimeValue::Zoned(dt)
        } else if let Some(ndt) = FLOATING_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        {
            TimeValue::Floating(ndt)
        } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            TimeValue::AllDay(date)
        } else {
            return Err(AgendaError::InvalidTimestamp(raw.to_string()));
        };

        Ok(Self {
            raw: raw.to_string(),
            value,
        })
    }

    /// The timestamp exactly as the provider sent it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> TimeValue {
        self.value
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self.value, TimeValue::AllDay(_))
    }

    /// Wall-clock time of this boundary in `tz`.
    pub fn local(&self, tz: Tz) -> NaiveDateTime {
        match self.value {
            TimeValue::Zoned(dt) => dt.with_timezone(&tz).naive_local(),
            TimeValue::Floating(ndt) => ndt,
            TimeValue::AllDay(date) => date.and_time(NaiveTime::MIN),
        }
    }

    /// The absolute instant of this boundary, resolving floating values in `tz`.
    pub fn instant(&self, tz: Tz) -> DateTime<Utc> {
        match self.value {
            TimeValue::Zoned(dt) => dt.with_timezone(&Utc),
            TimeValue::Floating(ndt) => resolve_wall_clock(ndt, tz),
            TimeValue::AllDay(date) => resolve_wall_clock(date.and_time(NaiveTime::MIN), tz),
        }
    }
}

/// Map a wall-clock time to an instant. Ambiguous times take the earlier offset;
/// times inside a DST gap move forward by an hour.
fn resolve_wall_clock(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

impl FromStr for EventTime {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EventTime {
    type Error = AgendaError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<EventTime> for String {
    fn from(time: EventTime) -> Self {
        time.raw
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A single calendar event.
///
/// Every field except `has_conflict` comes from the provider and is never
/// rewritten. `has_conflict` is attached by [`crate::matcher::mark_conflicts`];
/// it stays `None` (and is omitted from JSON) until matching runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "default_title", deserialize_with = "title_or_default")]
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_conflict: Option<bool>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn title_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let title = Option::<String>::deserialize(deserializer)?;
    Ok(title.filter(|t| !t.is_empty()).unwrap_or_else(default_title))
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    /// Create an event with no id, description or calendar metadata.
    pub fn new(title: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        let title = title.into();
        Self {
            id: None,
            title: if title.is_empty() { default_title() } else { title },
            start,
            end,
            description: String::new(),
            calendar_name: None,
            calendar_color: None,
            calendar_id: None,
            has_conflict: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_calendar(mut self, name: impl Into<String>) -> Self {
        self.calendar_name = Some(name.into());
        self
    }

    /// Stable display key: the provider id, or one synthesized from the event's
    /// position in its list.
    pub fn key(&self, index: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("event-{index}"),
        }
    }

    pub fn local_start(&self, tz: Tz) -> NaiveDateTime {
        self.start.local(tz)
    }

    pub fn local_end(&self, tz: Tz) -> NaiveDateTime {
        self.end.local(tz)
    }

    pub fn start_instant(&self, tz: Tz) -> DateTime<Utc> {
        self.start.instant(tz)
    }

    pub fn end_instant(&self, tz: Tz) -> DateTime<Utc> {
        self.end.instant(tz)
    }

    /// The local calendar day the event starts on.
    pub fn local_date(&self, tz: Tz) -> NaiveDate {
        self.local_start(tz).date()
    }

    pub fn is_on(&self, date: NaiveDate, tz: Tz) -> bool {
        self.local_date(tz) == date
    }

    pub fn is_conflict(&self) -> bool {
        self.has_conflict == Some(true)
    }

    /// Display range such as `"9:00 AM - 9:30 AM"`.
    pub fn time_range_label(&self, tz: Tz) -> String {
        format!(
            "{} - {}",
            self.local_start(tz).format("%-I:%M %p"),
            self.local_end(tz).format("%-I:%M %p")
        )
    }
}

