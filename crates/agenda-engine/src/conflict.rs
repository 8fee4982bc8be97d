//! Parse conflict time ranges supplied by the upstream scheduling assistant.
//!
//! The assistant passes conflicting meeting slots in a `conflicts` query
//! parameter: human-readable 12-hour ranges joined by `|`, for example
//! `"12 PM - 1:30 PM|3:00 PM - 4 PM"`. Each token is searched for the pattern
//! `H[:MM] (AM|PM) - H[:MM] (AM|PM)` (case-insensitive, whitespace optional
//! around the meridiem and the dash) and normalized to 24-hour `HH:MM`.
//! Tokens that do not contain the pattern are skipped.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// `H[:MM] AM|PM - H[:MM] AM|PM` anywhere in a token.
static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([0-9]{1,2}(?::[0-9]{2})?\s*(?:AM|PM))\s*-\s*([0-9]{1,2}(?::[0-9]{2})?\s*(?:AM|PM))",
    )
    .expect("conflict range pattern compiles")
});

/// A whole string holding exactly one 12-hour clock time.
static CLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]{1,2})(?::([0-9]{2}))?\s*(AM|PM)$")
        .expect("clock time pattern compiles")
});

/// A conflicting slot in both 24-hour and original 12-hour form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRange {
    /// Start as zero-padded `HH:MM`.
    pub start24: String,
    /// End as zero-padded `HH:MM`.
    pub end24: String,
    /// Start exactly as matched, e.g. `"12 PM"`.
    pub start12: String,
    /// End exactly as matched, e.g. `"1:30 PM"`.
    pub end12: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// A clock time as written in 12-hour form. The hour is not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockTime {
    hour: u32,
    minute: Option<u32>,
    meridiem: Meridiem,
}

impl ClockTime {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let hour = caps.get(1)?.as_str().parse().ok()?;
        let minute = match caps.get(2) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        let meridiem = if caps.get(3)?.as_str().eq_ignore_ascii_case("am") {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };
        Some(Self {
            hour,
            minute,
            meridiem,
        })
    }

    fn parse(time12: &str) -> Option<Self> {
        Self::from_captures(&CLOCK_PATTERN.captures(time12.trim())?)
    }

    fn to_24_hour(self) -> String {
        let hour = match (self.hour, self.meridiem) {
            (12, Meridiem::Am) => 0,
            (12, Meridiem::Pm) => 12,
            (h, Meridiem::Pm) => h + 12,
            (h, Meridiem::Am) => h,
        };
        format!("{:02}:{:02}", hour, self.minute.unwrap_or(0))
    }
}

/// Convert a single 12-hour clock time (`"1:30 PM"`, `"12 am"`) to `HH:MM`.
///
/// Returns `None` unless the whole string is one clock time.
pub fn to_24_hour(time12: &str) -> Option<String> {
    ClockTime::parse(time12).map(ClockTime::to_24_hour)
}

/// Parse one conflict token such as `"12:00 PM - 1:30 PM"` or `"12 PM - 1:30 PM"`.
///
/// The pattern may appear anywhere in the token; the leftmost match wins.
pub fn parse_conflict_range(token: &str) -> Option<ConflictRange> {
    let caps = RANGE_PATTERN.captures(token)?;
    let start12 = caps.get(1)?.as_str().trim();
    let end12 = caps.get(2)?.as_str().trim();

    Some(ConflictRange {
        start24: ClockTime::parse(start12)?.to_24_hour(),
        end24: ClockTime::parse(end12)?.to_24_hour(),
        start12: start12.to_string(),
        end12: end12.to_string(),
    })
}

/// Split the raw `conflicts` parameter into tokens.
///
/// The value is url-decoded first; a value that does not decode is used as-is.
/// An absent or empty parameter yields no tokens.
pub fn conflict_tokens(param: Option<&str>) -> Vec<String> {
    let raw = match param {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Vec::new(),
    };

    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            tracing::warn!(param = raw, error = %e, "conflict parameter is not valid UTF-8 once decoded; using it verbatim");
            raw.to_string()
        }
    };

    decoded.split('|').map(str::to_string).collect()
}

/// Parse the raw `conflicts` parameter into ranges, skipping malformed tokens.
pub fn parse_conflict_param(param: Option<&str>) -> Vec<ConflictRange> {
    conflict_tokens(param)
        .iter()
        .filter_map(|token| {
            let parsed = parse_conflict_range(token);
            if parsed.is_none() {
                tracing::debug!(token = token.as_str(), "skipping malformed conflict token");
            }
            parsed
        })
        .collect()
}
