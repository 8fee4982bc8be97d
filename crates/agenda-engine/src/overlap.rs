//! Cluster a slot's events into overlap groups for layered rendering.
//!
//! Grouping is first-match: each event joins the first existing group holding
//! any member it overlaps, without checking the other members. A chain such as
//! A∩B, B∩C with A and C disjoint therefore lands in one group when B arrives
//! before C. The result depends on input order.
//!
//! Adjacent events (one ends exactly when the next starts) do not overlap.

use chrono_tz::Tz;

use crate::event::Event;

/// Whether the half-open intervals `[a.start, a.end)` and `[b.start, b.end)` intersect.
pub fn overlaps(a: &Event, b: &Event, tz: Tz) -> bool {
    a.start_instant(tz) < b.end_instant(tz) && a.end_instant(tz) > b.start_instant(tz)
}

/// Partition `events` into ordered, non-empty overlap groups.
///
/// Every input event appears in exactly one group. Groups are ordered by the
/// position of their first member, and members keep their input order.
pub fn group_overlaps(events: &[Event], tz: Tz) -> Vec<Vec<Event>> {
    let mut groups: Vec<Vec<Event>> = Vec::new();

    for event in events {
        let target = groups
            .iter_mut()
            .find(|group| group.iter().any(|member| overlaps(event, member, tz)));

        match target {
            Some(group) => group.push(event.clone()),
            None => groups.push(vec![event.clone()]),
        }
    }

    groups
}
