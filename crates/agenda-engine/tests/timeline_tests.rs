//! Tests for hourly timeline binning.

use chrono_tz::Tz;
use agenda_engine::error::AgendaError;
use agenda_engine::event::Event;
use agenda_engine::timeline::{bin_events, empty_slots, slot_label, HourWindow};

fn event(title: &str, start: &str, end: &str) -> Event {
    Event::new(title, start.parse().unwrap(), end.parse().unwrap())
}

fn titles(events: &[Event]) -> Vec<&str> {
    events.iter().map(|e| e.title.as_str()).collect()
}

#[test]
fn default_window_has_thirteen_labelled_slots() {
    let slots = empty_slots(HourWindow::default());

    assert_eq!(slots.len(), 13);
    assert_eq!(slots[0].hour, 8);
    assert_eq!(slots[0].label, "8:00 AM");
    assert_eq!(slots[0].time24, "08:00");
    assert_eq!(slots[4].label, "12:00 PM");
    assert_eq!(slots[12].hour, 20);
    assert_eq!(slots[12].label, "8:00 PM");
    assert!(slots.iter().all(|s| s.events.is_empty()));
}

#[test]
fn slot_labels_cover_midnight_and_noon() {
    assert_eq!(slot_label(0), "12:00 AM");
    assert_eq!(slot_label(12), "12:00 PM");
    assert_eq!(slot_label(13), "1:00 PM");
}

#[test]
fn event_is_binned_by_start_hour_only() {
    let events = vec![event("Evening", "2026-03-16T19:45:00Z", "2026-03-16T20:30:00Z")];

    let slots = bin_events(&events, HourWindow::default(), Tz::UTC);

    let hour_19 = slots.iter().find(|s| s.hour == 19).unwrap();
    let hour_20 = slots.iter().find(|s| s.hour == 20).unwrap();
    assert_eq!(titles(&hour_19.events), vec!["Evening"]);
    assert!(hour_20.events.is_empty(), "no spillover into the next slot");
}

#[test]
fn events_outside_window_are_dropped() {
    let events = vec![
        event("Early", "2026-03-16T07:59:00Z", "2026-03-16T08:30:00Z"),
        event("Late", "2026-03-16T21:00:00Z", "2026-03-16T22:00:00Z"),
        event("All day", "2026-03-16", "2026-03-17"),
        event("Last slot", "2026-03-16T20:59:00Z", "2026-03-16T21:30:00Z"),
    ];

    let slots = bin_events(&events, HourWindow::default(), Tz::UTC);
    let binned: Vec<&str> = slots.iter().flat_map(|s| titles(&s.events)).collect();

    assert_eq!(binned, vec!["Last slot"]);
}

#[test]
fn slot_keeps_input_order() {
    let events = vec![
        event("Second", "2026-03-16T09:30:00Z", "2026-03-16T09:45:00Z"),
        event("First", "2026-03-16T09:00:00Z", "2026-03-16T09:15:00Z"),
        event("Elsewhere", "2026-03-16T11:00:00Z", "2026-03-16T11:15:00Z"),
        event("Third", "2026-03-16T09:10:00Z", "2026-03-16T09:20:00Z"),
    ];

    let slots = bin_events(&events, HourWindow::default(), Tz::UTC);
    let nine = slots.iter().find(|s| s.hour == 9).unwrap();

    assert_eq!(titles(&nine.events), vec!["Second", "First", "Third"]);
}

#[test]
fn binning_uses_local_hour() {
    // 13:00Z is 09:00 in New York.
    let events = vec![event("Standup", "2026-03-16T13:00:00Z", "2026-03-16T13:15:00Z")];

    let slots = bin_events(&events, HourWindow::default(), chrono_tz::America::New_York);
    let nine = slots.iter().find(|s| s.hour == 9).unwrap();
    assert_eq!(titles(&nine.events), vec!["Standup"]);
}

#[test]
fn binning_twice_is_identical() {
    let events = vec![
        event("A", "2026-03-16T09:00:00Z", "2026-03-16T09:30:00Z"),
        event("B", "2026-03-16T14:10:00Z", "2026-03-16T15:00:00Z"),
    ];
    let first = bin_events(&events, HourWindow::default(), Tz::UTC);
    let second = bin_events(&events, HourWindow::default(), Tz::UTC);
    assert_eq!(first, second);
}

#[test]
fn custom_window_narrows_slots() {
    let window = HourWindow::new(9, 17).unwrap();
    assert_eq!(window.len(), 9);

    let events = vec![
        event("Eight", "2026-03-16T08:00:00Z", "2026-03-16T08:30:00Z"),
        event("Nine", "2026-03-16T09:00:00Z", "2026-03-16T09:30:00Z"),
    ];
    let slots = bin_events(&events, window, Tz::UTC);
    assert_eq!(slots.len(), 9);
    assert_eq!(titles(&slots[0].events), vec!["Nine"]);
}

#[test]
fn inverted_or_out_of_range_window_rejected() {
    assert!(matches!(HourWindow::new(18, 9), Err(AgendaError::Config(_))));
    assert!(matches!(HourWindow::new(8, 24), Err(AgendaError::Config(_))));
}
