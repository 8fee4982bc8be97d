//! Bucket a day's events into fixed hourly slots for the day view.
//!
//! Each event lands in exactly one slot, chosen by the local hour of its start.
//! An event starting at 19:45 and ending at 20:30 sits in the 19:00 slot only.
//! Events starting outside the window are left out of the timeline.

use chrono::{NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, Result};
use crate::event::Event;

/// The range of hours shown on the timeline, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourWindow {
    pub first_hour: u32,
    pub last_hour: u32,
}

impl Default for HourWindow {
    /// Working hours, 8 AM to 8 PM: thirteen slots.
    fn default() -> Self {
        Self {
            first_hour: 8,
            last_hour: 20,
        }
    }
}

impl HourWindow {
    /// # Errors
    /// Returns `AgendaError::Config` unless `first_hour <= last_hour <= 23`.
    pub fn new(first_hour: u32, last_hour: u32) -> Result<Self> {
        let window = Self {
            first_hour,
            last_hour,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.last_hour > 23 {
            return Err(AgendaError::Config(format!(
                "window.last_hour must be at most 23, got {}",
                self.last_hour
            )));
        }
        if self.first_hour > self.last_hour {
            return Err(AgendaError::Config(format!(
                "window.first_hour ({}) is after window.last_hour ({})",
                self.first_hour, self.last_hour
            )));
        }
        Ok(())
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.first_hour..=self.last_hour).contains(&hour)
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.first_hour..=self.last_hour
    }

    pub fn len(&self) -> usize {
        self.hours().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One hourly bucket of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub hour: u32,
    /// `"08:00"`
    pub time24: String,
    /// `"8:00 AM"`
    pub label: String,
    pub events: Vec<Event>,
}

impl TimeSlot {
    pub fn new(hour: u32) -> Self {
        Self {
            hour,
            time24: format!("{:02}:00", hour),
            label: slot_label(hour),
            events: Vec::new(),
        }
    }
}

/// 12-hour label for the top of an hour, e.g. `"8:00 AM"` or `"12:00 PM"`.
pub fn slot_label(hour: u32) -> String {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => time.format("%-I:%M %p").to_string(),
        None => format!("{:02}:00", hour),
    }
}

/// One empty slot per hour of the window, in order.
pub fn empty_slots(window: HourWindow) -> Vec<TimeSlot> {
    window.hours().map(TimeSlot::new).collect()
}

/// Place each event in the slot of its local start hour.
///
/// Events keep their input order within a slot. Events whose start hour falls
/// outside `window` are dropped.
pub fn bin_events(events: &[Event], window: HourWindow, tz: Tz) -> Vec<TimeSlot> {
    let mut slots = empty_slots(window);

    for event in events {
        let hour = event.local_start(tz).hour();
        if !window.contains(hour) {
            continue;
        }
        let index = (hour - window.first_hour) as usize;
        if let Some(slot) = slots.get_mut(index) {
            slot.events.push(event.clone());
        }
    }

    slots
}
