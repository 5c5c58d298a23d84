//! Sorting and searching parsed events

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::event::{compare_events, TimelineEvent};

/// Chronological direction of a timeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest first
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    /// Newest first
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortOrder {
    /// The other direction
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Accessible description of the order, as shown on the toggle button
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "Sorted oldest first",
            SortOrder::Descending => "Sorted newest first",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("asc"),
            SortOrder::Descending => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(Error::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Return the events in chronological `order`
///
/// The sort is stable: events on the same date keep their relative order in
/// either direction. The input is left untouched.
pub fn sort_events(events: &[TimelineEvent], order: SortOrder) -> Vec<TimelineEvent> {
    let mut sorted = events.to_vec();
    match order {
        SortOrder::Ascending => sorted.sort_by(compare_events),
        SortOrder::Descending => sorted.sort_by(|a, b| compare_events(b, a)),
    }
    sorted
}

/// Keep events whose title or content contains `query`, ignoring case
///
/// An empty query borrows the input back unchanged.
pub fn filter_events<'a>(events: &'a [TimelineEvent], query: &str) -> Cow<'a, [TimelineEvent]> {
    if query.is_empty() {
        return Cow::Borrowed(events);
    }

    let needle = query.to_lowercase();
    Cow::Owned(
        events
            .iter()
            .filter(|event| matches_query(event, &needle))
            .cloned()
            .collect(),
    )
}

/// Filter by `query`, then sort by `order`
pub fn arrange(events: &[TimelineEvent], query: &str, order: SortOrder) -> Vec<TimelineEvent> {
    let filtered = filter_events(events, query);
    sort_events(&filtered, order)
}

fn matches_query(event: &TimelineEvent, needle: &str) -> bool {
    event.title.to_lowercase().contains(needle) || event.content.to_lowercase().contains(needle)
}
