//! Caller-held state for one displayed timeline
//!
//! A view owns the parsed events plus the current order and search query.
//! Toggling the order or changing the query never touches the events; adding
//! an event produces a new view with a new list.

use std::fmt;

use crate::error::Diagnostic;
use crate::event::TimelineEvent;
use crate::render::{RenderContext, Renderer};
use crate::settings::TimelineSettings;
use crate::sort::{arrange, SortOrder};

/// How many events are visible out of how many were parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub shown: usize,
    pub total: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} shown", self.shown, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineView {
    events: Vec<TimelineEvent>,
    order: SortOrder,
    query: String,
}

impl TimelineView {
    pub fn new(events: Vec<TimelineEvent>, order: SortOrder) -> Self {
        Self {
            events,
            order,
            query: String::new(),
        }
    }

    /// Start with the configured default order
    pub fn from_settings(events: Vec<TimelineEvent>, settings: &TimelineSettings) -> Self {
        Self::new(events, settings.timeline_order)
    }

    /// All events, in source order
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    /// Flip between oldest-first and newest-first, returning the new order
    pub fn toggle_order(&mut self) -> SortOrder {
        self.order = self.order.toggled();
        self.order
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// A new view with `event` appended, keeping order and query
    pub fn with_event(&self, event: TimelineEvent) -> Self {
        let mut events = self.events.clone();
        events.push(event);
        Self {
            events,
            order: self.order,
            query: self.query.clone(),
        }
    }

    /// Events matching the query, in the current order
    pub fn visible(&self) -> Vec<TimelineEvent> {
        arrange(&self.events, &self.query, self.order)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            shown: self.visible().len(),
            total: self.events.len(),
        }
    }

    /// Hand the visible events to a renderer
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R, source_path: &str) -> Result<(), Diagnostic> {
        let visible = self.visible();
        let context = RenderContext {
            source_path,
            order: self.order,
            query: &self.query,
            total: self.events.len(),
        };
        renderer.render_events(&visible, &context)
    }
}
