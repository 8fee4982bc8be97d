//! # agenda-engine
//!
//! Deterministic day-view layout and conflict marking for a scheduling assistant.
//!
//! Given one day's events from a calendar provider, the engine lays them out on an
//! hourly timeline, clusters overlapping events, orders each cluster by calendar
//! priority and marks the events an upstream assistant reported as conflicting.
//! Every function is pure: configuration and the "today" anchor are passed in
//! explicitly, so results are identical however often they are recomputed.
//!
//! ## Modules
//!
//! - [`conflict`] — `"12 PM - 1:30 PM"` tokens → 24-hour conflict ranges
//! - [`matcher`] — Flag events matching conflict ranges, busy-day advisory
//! - [`timeline`] — Bucket events into hourly slots (08:00–20:00 by default)
//! - [`overlap`] — First-match overlap grouping within a slot
//! - [`priority`] — Primary event per group by calendar rank
//! - [`day_view`] — The full render model for one day
//! - [`feed`] — Merge per-calendar feeds, provider envelopes, fetch window
//! - [`contact`] — Contact lookup and contact-card render model
//! - [`config`] — Deployment configuration
//! - [`event`] — Event and timestamp types
//! - [`error`] — Error types

pub mod config;
pub mod conflict;
pub mod contact;
pub mod day_view;
pub mod error;
pub mod event;
pub mod feed;
pub mod matcher;
pub mod overlap;
pub mod priority;
pub mod timeline;

pub use config::{AgendaConfig, CalendarSource};
pub use conflict::{parse_conflict_param, parse_conflict_range, ConflictRange};
pub use contact::{find_contact, Contact, ContactCard};
pub use day_view::{build_day_view, DayView, FreeSlotSelection, SlotView};
pub use error::AgendaError;
pub use event::{Event, EventTime};
pub use feed::{merge_feeds, merge_loaded, parse_events_payload, parse_payload, CalendarFeed, EventsPayload};
pub use matcher::{busy_day_advisory, mark_conflicts, BusyDayAdvisory};
pub use overlap::group_overlaps;
pub use priority::{resolve_priority, CalendarPriority, PrioritizedGroup};
pub use timeline::{bin_events, HourWindow, TimeSlot};
