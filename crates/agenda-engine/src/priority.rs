//! Pick the primary event of an overlap group by calendar priority.
//!
//! The ranking is deployment configuration: a table from calendar display name
//! to rank, where lower ranks sort first. Events from calendars missing from the
//! table, or with no calendar name, rank last.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Rank given to calendars that are not in the priority table.
pub const UNRANKED: i32 = i32::MAX;

/// Calendar display name → priority rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarPriority {
    ranks: BTreeMap<String, i32>,
}

impl CalendarPriority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, calendar_name: impl Into<String>, rank: i32) -> Self {
        self.ranks.insert(calendar_name.into(), rank);
        self
    }

    pub fn rank_of(&self, calendar_name: Option<&str>) -> i32 {
        calendar_name
            .and_then(|name| self.ranks.get(name).copied())
            .unwrap_or(UNRANKED)
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for CalendarPriority {
    fn from_iter<I: IntoIterator<Item = (S, i32)>>(iter: I) -> Self {
        Self {
            ranks: iter.into_iter().map(|(name, rank)| (name.into(), rank)).collect(),
        }
    }
}

/// An overlap group ordered for display: one emphasized event and the rest as
/// "also scheduled" annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedGroup {
    pub primary: Event,
    pub also_scheduled: Vec<Event>,
}

impl PrioritizedGroup {
    pub fn len(&self) -> usize {
        1 + self.also_scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        std::iter::once(&self.primary).chain(self.also_scheduled.iter())
    }

    /// Tooltip text such as `"Also scheduled: Dentist (Family), Sync"`.
    pub fn also_scheduled_summary(&self) -> Option<String> {
        if self.also_scheduled.is_empty() {
            return None;
        }

        let entries: Vec<String> = self
            .also_scheduled
            .iter()
            .map(|e| match &e.calendar_name {
                Some(calendar) => format!("{} ({})", e.title, calendar),
                None => e.title.clone(),
            })
            .collect();

        Some(format!("Also scheduled: {}", entries.join(", ")))
    }
}

/// Order `group` by calendar rank and split off the primary event.
///
/// The sort is stable, so events of equal rank keep their input order.
/// Returns `None` for an empty group.
pub fn resolve_priority(mut group: Vec<Event>, priorities: &CalendarPriority) -> Option<PrioritizedGroup> {
    group.sort_by_key(|e| priorities.rank_of(e.calendar_name.as_deref()));

    let mut events = group.into_iter();
    let primary = events.next()?;

    Some(PrioritizedGroup {
        primary,
        also_scheduled: events.collect(),
    })
}
