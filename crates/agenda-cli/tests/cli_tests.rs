//! Integration tests for the `agenda` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the day, conflicts,
//! merge, and contact subcommands through the actual binary, including stdin
//! piping, file I/O, config loading, and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn events_path() -> String {
    fixture("events.json")
}

fn config_path() -> String {
    fixture("agenda.toml")
}

/// Helper: run a command expected to succeed and parse its stdout as JSON.
fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout must be valid JSON")
}

/// Helper: the slot with the given hour from a day-view JSON value.
fn slot(view: &Value, hour: u64) -> &Value {
    view["slots"]
        .as_array()
        .expect("slots array")
        .iter()
        .find(|s| s["hour"] == hour)
        .unwrap_or_else(|| panic!("slot {hour} must exist"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Day subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn day_from_file_lays_out_thirteen_slots() {
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "2026-03-16",
        "--today",
        "2026-03-16",
    ]));

    assert_eq!(view["date"], "2026-03-16");
    assert_eq!(view["heading"], "Today");
    assert_eq!(
        view["eventCount"], 4,
        "late call is on the day even though it is outside the window"
    );
    assert_eq!(view["slots"].as_array().unwrap().len(), 13);
    assert_eq!(slot(&view, 8)["label"], "8:00 AM");
    assert_eq!(slot(&view, 20)["label"], "8:00 PM");
}

#[test]
fn day_from_stdin() {
    let input = std::fs::read_to_string(events_path()).unwrap();

    let view = json_stdout(
        Command::cargo_bin("agenda")
            .unwrap()
            .args(["day", "--date", "2026-03-16", "--today", "2026-03-16"])
            .write_stdin(input),
    );

    assert_eq!(view["eventCount"], 4);
}

#[test]
fn day_without_conflicts_reports_busy_day() {
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "2026-03-16",
        "--today",
        "2026-03-16",
    ]));

    let message = view["advisory"]["message"].as_str().expect("advisory present");
    assert!(message.starts_with("Busy day: you have 4 events scheduled."));
    assert_eq!(view["conflictCount"], 0);
    assert!(
        slot(&view, 12)["groups"][0]["primary"].get("hasConflict").is_none(),
        "no ranges means no conflict flags at all"
    );
}

#[test]
fn day_with_conflicts_flags_exact_match_only() {
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "2026-03-16",
        "--today",
        "2026-03-16",
        "--conflicts",
        "12%20PM%20-%201%20PM",
    ]));

    assert_eq!(view["conflictCount"], 1);
    assert!(view.get("advisory").is_none(), "advisory only without ranges");

    let lunch = &slot(&view, 12)["groups"][0]["primary"];
    assert_eq!(lunch["title"], "Lunch with Sam");
    assert_eq!(lunch["hasConflict"], true);

    let standup = &slot(&view, 9)["groups"][0]["primary"];
    assert_eq!(standup["hasConflict"], false);
}

#[test]
fn day_free_slots_carry_selection_payload() {
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "2026-03-16",
        "--today",
        "2026-03-16",
    ]));

    let free = &slot(&view, 14)["freeSlot"];
    assert_eq!(free["timeSlot"], "2:00 PM");
    assert_eq!(free["date"], "2026-03-16");
    assert!(
        slot(&view, 9).get("freeSlot").is_none(),
        "occupied slots have no selection payload"
    );
}

#[test]
fn day_without_config_keeps_input_order_in_groups() {
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "2026-03-16",
        "--today",
        "2026-03-16",
    ]));

    let group = &slot(&view, 9)["groups"][0];
    assert_eq!(group["primary"]["title"], "Standup");
    assert_eq!(group["alsoScheduled"][0]["title"], "Dentist");
}

#[test]
fn day_with_config_applies_calendar_priority() {
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "2026-03-16",
        "--today",
        "2026-03-16",
        "--config",
        config_path().as_str(),
    ]));

    let group = &slot(&view, 9)["groups"][0];
    assert_eq!(group["primary"]["title"], "Dentist", "Family ranks above Work");
    assert_eq!(group["alsoScheduled"][0]["title"], "Standup");
}

#[test]
fn day_text_format() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args([
            "day",
            "-i",
            events_path().as_str(),
            "--date",
            "2026-03-16",
            "--today",
            "2026-03-16",
            "--config",
            config_path().as_str(),
            "--conflicts",
            "12 PM - 1 PM",
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Today (2026-03-16): 4 events, 1 conflict detected",
        ))
        .stdout(predicate::str::contains("Dentist [Family]"))
        .stdout(predicate::str::contains("Also scheduled: Standup (Work)"))
        .stdout(predicate::str::contains("Lunch with Sam [Work]  CONFLICT"))
        .stdout(predicate::str::contains("(free)"));
}

#[test]
fn day_heading_for_other_dates() {
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "2026-03-17",
        "--today",
        "2026-03-16",
    ]));

    assert_eq!(view["heading"], "Tomorrow");
    assert_eq!(view["eventCount"], 1);
    assert_eq!(
        slot(&view, 10)["groups"][0]["primary"]["title"],
        "No Title",
        "null title defaults"
    );
}

#[test]
fn day_invalid_date_falls_back_to_today() {
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "not-a-date",
        "--today",
        "2026-03-16",
    ]));

    assert_eq!(view["date"], "2026-03-16");
    assert_eq!(view["heading"], "Today");
}

#[test]
fn day_writes_output_file() {
    let output_path = "/tmp/agenda-test-day-output.json";
    let _ = std::fs::remove_file(output_path);

    Command::cargo_bin("agenda")
        .unwrap()
        .args([
            "day",
            "-i",
            events_path().as_str(),
            "--date",
            "2026-03-16",
            "--today",
            "2026-03-16",
            "-o",
            output_path,
        ])
        .assert()
        .success();

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    let view: Value = serde_json::from_str(&content).expect("output must be JSON");
    assert_eq!(view["eventCount"], 4);

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn day_empty_provider_response_is_not_an_error() {
    let view = json_stdout(
        Command::cargo_bin("agenda")
            .unwrap()
            .args(["day", "--date", "2026-03-16", "--today", "2026-03-16"])
            .write_stdin(r#"{"success":true,"events":[]}"#),
    );

    assert_eq!(view["eventCount"], 0);
    assert!(view["slots"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["groups"].as_array().unwrap().is_empty()));
}

#[test]
fn day_failed_provider_response_exits_with_error() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["day", "--today", "2026-03-16"])
        .write_stdin(r#"{"success":false,"error":"Calendar unavailable"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Calendar unavailable"));
}

#[test]
fn day_missing_input_file_fails() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["day", "-i", "/tmp/agenda-no-such-file.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn day_invalid_today_fails() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["day", "-i", events_path().as_str(), "--today", "16/03/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn day_unknown_timezone_fails() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["day", "-i", events_path().as_str(), "--timezone", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timezone"));
}

#[test]
fn day_timezone_override_shifts_local_hours() {
    // 12:00Z is 08:00 in New York during daylight saving time.
    let view = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "day",
        "-i",
        events_path().as_str(),
        "--date",
        "2026-03-16",
        "--today",
        "2026-03-16",
        "--timezone",
        "America/New_York",
    ]));

    assert_eq!(
        slot(&view, 8)["groups"][0]["primary"]["title"],
        "Lunch with Sam"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Conflicts subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_parses_encoded_parameter() {
    let ranges = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "conflicts",
        "12%20PM%20-%201%3A30%20PM%7C3%20PM%20-%204%20PM",
    ]));

    let ranges = ranges.as_array().expect("array of ranges");
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0]["start24"], "12:00");
    assert_eq!(ranges[0]["end24"], "13:30");
    assert_eq!(ranges[1]["start24"], "15:00");
    assert_eq!(ranges[1]["end24"], "16:00");
}

#[test]
fn conflicts_skips_malformed_tokens() {
    let ranges = json_stdout(
        Command::cargo_bin("agenda")
            .unwrap()
            .args(["conflicts", "lunch|9 AM - 10 AM|soon"]),
    );

    let ranges = ranges.as_array().unwrap();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0]["start24"], "09:00");
}

#[test]
fn conflicts_verbose_logs_skipped_tokens_to_stderr() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["-v", "conflicts", "lunch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"))
        .stderr(predicate::str::contains("skipping malformed conflict token"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Merge subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn merge_tags_and_orders_feeds() {
    let merged = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "merge",
        "--feed",
        format!("work@example.com={}", fixture("work.json")).as_str(),
        "--feed",
        format!("family={}", fixture("family.json")).as_str(),
        "--config",
        config_path().as_str(),
    ]));

    let titles: Vec<&str> = merged
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["School run", "Standup", "Design review"]);

    assert_eq!(merged[0]["calendarName"], "Family");
    assert_eq!(merged[0]["calendarId"], "family");
    assert_eq!(merged[1]["calendarName"], "Work");
    assert_eq!(merged[1]["calendarColor"], "#4285F4");
}

#[test]
fn merge_skips_calendar_that_failed() {
    let merged = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "merge",
        "--feed",
        format!("work@example.com={}", fixture("work.json")).as_str(),
        "--feed",
        format!("team={}", fixture("failed.json")).as_str(),
        "--config",
        config_path().as_str(),
    ]));

    let titles: Vec<&str> = merged
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Standup", "Design review"]);
}

#[test]
fn merge_warns_about_the_failed_calendar() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args([
            "merge",
            "--feed",
            format!("work@example.com={}", fixture("work.json")).as_str(),
            "--feed",
            format!("team={}", fixture("failed.json")).as_str(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping calendar that failed to load"))
        .stderr(predicate::str::contains("calendar down"));
}

#[test]
fn merge_fails_when_every_calendar_fails() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args([
            "merge",
            "--feed",
            format!("team={}", fixture("failed.json")).as_str(),
            "--feed",
            "other=/tmp/agenda-no-such-feed.json",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No calendar feed could be loaded"));
}

#[test]
fn merge_rejects_malformed_feed_argument() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["merge", "--feed", "work.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected CALENDAR_ID=PATH"));
}

#[test]
fn merge_requires_a_feed() {
    Command::cargo_bin("agenda")
        .unwrap()
        .arg("merge")
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Contact subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn contact_found_by_partial_name() {
    let card = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "contact",
        "--name",
        "alice",
        "-i",
        fixture("contacts.json").as_str(),
    ]));

    assert_eq!(card["name"], "Alice Smith");
    assert_eq!(card["initial"], "A");
    let details = card["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);
    assert_eq!(details[0]["kind"], "email");
    assert_eq!(details[0]["copy"]["text"], "alice@example.com");
}

#[test]
fn contact_card_omits_missing_details() {
    let card = json_stdout(Command::cargo_bin("agenda").unwrap().args([
        "contact",
        "--name",
        "Bob",
        "-i",
        fixture("contacts.json").as_str(),
    ]));

    assert_eq!(card["details"].as_array().unwrap().len(), 1);
}

#[test]
fn contact_from_provider_response_on_stdin() {
    let response = r#"{"success":true,"contact":{"name":"Carol","phone":"555"}}"#;

    let card = json_stdout(
        Command::cargo_bin("agenda")
            .unwrap()
            .args(["contact", "--name", "Carol"])
            .write_stdin(response),
    );

    assert_eq!(card["name"], "Carol");
    assert_eq!(card["details"][0]["kind"], "phone");
}

#[test]
fn contact_not_found_exits_with_error() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["contact", "--name", "Zed", "-i", fixture("contacts.json").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact not found"));
}
