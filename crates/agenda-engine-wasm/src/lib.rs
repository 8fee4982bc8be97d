//! WASM bindings for agenda-engine.
//!
//! Exposes day-view assembly, conflict parsing, feed merging and contact lookup
//! to the web client via `wasm-bindgen`. All complex types are passed as JSON
//! strings, matching the pattern established by `truth-engine-wasm`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p agenda-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/agenda-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/agenda_engine_wasm.wasm
//! ```

use agenda_engine::config::AgendaConfig;
use agenda_engine::contact::{self, Contact, ContactCard};
use agenda_engine::day_view;
use agenda_engine::feed::{self, CalendarFeed, FetchWindow};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Result of a contact lookup: the card when found, otherwise what was searched.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactLookupDto {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<ContactCard>,
    searched_for: String,
    total_contacts: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    day_view::parse_date(s).map_err(js_error)
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, JsValue> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

/// Parse the optional JSON configuration, falling back to defaults.
fn parse_config(config_json: Option<&str>) -> Result<AgendaConfig, JsValue> {
    match config_json {
        Some(json) if !json.trim().is_empty() => AgendaConfig::from_json_str(json).map_err(js_error),
        _ => Ok(AgendaConfig::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Build the render model for one day.
///
/// # Arguments
/// - `events_json` -- provider envelope `{success, events}` or a bare event array
/// - `date` -- `YYYY-MM-DD` from the route; absent or invalid means `today`
/// - `today` -- the client's current local date, `YYYY-MM-DD`
/// - `conflicts` -- raw `conflicts` query parameter, if present
/// - `config_json` -- optional JSON `AgendaConfig`
///
/// Returns the `DayView` as JSON. Throws when the events payload cannot be
/// decoded or the provider reported failure; an empty day is not an error.
#[wasm_bindgen(js_name = "buildDayView")]
pub fn build_day_view(
    events_json: &str,
    date: Option<String>,
    today: &str,
    conflicts: Option<String>,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let config = parse_config(config_json.as_deref())?;
    let today = parse_date(today)?;
    let date = day_view::resolve_target_date(date.as_deref(), today);
    let events = feed::parse_events_payload(events_json).map_err(js_error)?;
    let ranges = agenda_engine::parse_conflict_param(conflicts.as_deref());

    let view = day_view::build_day_view(events, &ranges, date, today, &config);
    to_json(&view)
}

/// Parse a raw `conflicts` query parameter into a JSON array of ranges.
/// Malformed tokens are skipped.
#[wasm_bindgen(js_name = "parseConflicts")]
pub fn parse_conflicts(param: Option<String>) -> Result<String, JsValue> {
    to_json(&agenda_engine::parse_conflict_param(param.as_deref()))
}

/// Merge a JSON array of `{calendarId, events}` feeds into one event list
/// tagged with the configured calendar names and colors.
#[wasm_bindgen(js_name = "mergeFeeds")]
pub fn merge_feeds(feeds_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_config(config_json.as_deref())?;
    let feeds: Vec<CalendarFeed> = serde_json::from_str(feeds_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid feeds JSON: {}", e)))?;

    let merged = feed::merge_feeds(feeds, &config.calendars, config.timezone);
    to_json(&merged)
}

/// The `{timeMin, timeMax, maxResults}` to request from the calendar provider.
///
/// `now` is the client's current time as `YYYY-MM-DDTHH:MM:SS`; it anchors the
/// default range when no `date` is requested.
#[wasm_bindgen(js_name = "fetchWindow")]
pub fn fetch_window(date: Option<String>, now: &str) -> Result<String, JsValue> {
    let now = parse_datetime(now)?;
    let date = date.as_deref().map(parse_date).transpose()?;
    to_json(&FetchWindow::for_request(date, now))
}

/// Look up a contact by name in a JSON array of contacts.
///
/// Returns `{found, card?, searchedFor, totalContacts}`.
#[wasm_bindgen(js_name = "findContact")]
pub fn find_contact(contacts_json: &str, name: &str) -> Result<String, JsValue> {
    let contacts: Vec<Contact> = serde_json::from_str(contacts_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid contacts JSON: {}", e)))?;

    let card = contact::find_contact(&contacts, name).map(ContactCard::from);
    to_json(&ContactLookupDto {
        found: card.is_some(),
        card,
        searched_for: name.to_string(),
        total_contacts: contacts.len(),
    })
}
