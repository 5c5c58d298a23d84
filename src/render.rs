//! Rendering adapters
//!
//! The parser, sorter and formatter are pure; presenting their output is the
//! job of a [`Renderer`]. Two are provided: [`TextRenderer`] for terminals and
//! [`JsonRenderer`] for other tools. A renderer that cannot write reports a
//! `render` diagnostic.

use std::io::Write;

use serde::Serialize;

use crate::error::{Diagnostic, DiagnosticKind};
use crate::event::TimelineEvent;
use crate::format::format_date;
use crate::settings::TimelineSettings;
use crate::sort::SortOrder;

/// Example shown alongside diagnostics
pub const FORMAT_HELP: &str = "\
Expected format:

# 2024-03-21
## Event Title
Event content goes here...

---

# -500
## Ancient Event
Content";

/// What the caller knows about the listing being rendered
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Where the timeline came from (a note path, or empty)
    pub source_path: &'a str,
    pub order: SortOrder,
    /// Active search query, empty when not searching
    pub query: &'a str,
    /// Number of events before filtering
    pub total: usize,
}

/// One method per UI surface
pub trait Renderer {
    /// Present an already filtered and sorted list of events
    fn render_events(&mut self, events: &[TimelineEvent], context: &RenderContext<'_>) -> Result<(), Diagnostic>;

    /// Present a parse or validation failure
    fn render_diagnostic(&mut self, diagnostic: &Diagnostic) -> Result<(), Diagnostic>;
}

fn write_failed(err: impl std::fmt::Display) -> Diagnostic {
    Diagnostic::render("Failed to write timeline").with_details(err.to_string())
}

/// Plain-text listing
pub struct TextRenderer<W> {
    out: W,
    date_format: String,
    show_header: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, settings: &TimelineSettings) -> Self {
        Self {
            out,
            date_format: settings.date_format.clone(),
            show_header: settings.show_header_buttons,
        }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_events(&mut self, events: &[TimelineEvent], context: &RenderContext<'_>) -> std::io::Result<()> {
        if self.show_header {
            if !context.source_path.is_empty() {
                writeln!(self.out, "{}", context.source_path)?;
            }
            write!(self.out, "{} | {} of {} shown", context.order.label(), events.len(), context.total)?;
            if !context.query.is_empty() {
                write!(self.out, " | search: {}", context.query)?;
            }
            writeln!(self.out)?;
            writeln!(self.out)?;
        }

        if events.is_empty() {
            if context.query.is_empty() {
                writeln!(self.out, "No events")?;
            } else {
                writeln!(self.out, "No events match '{}'", context.query)?;
            }
            return Ok(());
        }

        for (index, event) in events.iter().enumerate() {
            if index > 0 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "{}  {}", format_date(event, &self.date_format), event.title)?;
            for line in event.content.lines() {
                writeln!(self.out, "    {}", line)?;
            }
        }
        Ok(())
    }

    fn write_diagnostic(&mut self, diagnostic: &Diagnostic) -> std::io::Result<()> {
        writeln!(self.out, "Error ({}): {}", diagnostic.kind, diagnostic.message)?;
        if let Some(line) = diagnostic.line {
            writeln!(self.out, "  at line {}", line)?;
        }
        if let Some(details) = &diagnostic.details {
            writeln!(self.out, "  {}", details)?;
        }
        if diagnostic.kind != DiagnosticKind::Render {
            writeln!(self.out)?;
            writeln!(self.out, "{}", FORMAT_HELP)?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render_events(&mut self, events: &[TimelineEvent], context: &RenderContext<'_>) -> Result<(), Diagnostic> {
        self.write_events(events, context).map_err(write_failed)
    }

    fn render_diagnostic(&mut self, diagnostic: &Diagnostic) -> Result<(), Diagnostic> {
        self.write_diagnostic(diagnostic).map_err(write_failed)
    }
}

#[derive(Serialize)]
struct RenderedEvent<'a> {
    #[serde(flatten)]
    event: &'a TimelineEvent,
    display_date: String,
}

#[derive(Serialize)]
struct EventListing<'a> {
    source: &'a str,
    order: SortOrder,
    query: &'a str,
    total: usize,
    shown: usize,
    events: Vec<RenderedEvent<'a>>,
}

#[derive(Serialize)]
struct DiagnosticReport<'a> {
    error: &'a Diagnostic,
    help: &'static str,
}

/// Pretty-printed JSON output
pub struct JsonRenderer<W> {
    out: W,
    date_format: String,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W, settings: &TimelineSettings) -> Self {
        Self {
            out,
            date_format: settings.date_format.clone(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> Result<(), Diagnostic> {
        serde_json::to_writer_pretty(&mut self.out, value).map_err(write_failed)?;
        writeln!(self.out).map_err(write_failed)
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render_events(&mut self, events: &[TimelineEvent], context: &RenderContext<'_>) -> Result<(), Diagnostic> {
        let listing = EventListing {
            source: context.source_path,
            order: context.order,
            query: context.query,
            total: context.total,
            shown: events.len(),
            events: events
                .iter()
                .map(|event| RenderedEvent {
                    event,
                    display_date: format_date(event, &self.date_format),
                })
                .collect(),
        };
        self.write_json(&listing)
    }

    fn render_diagnostic(&mut self, diagnostic: &Diagnostic) -> Result<(), Diagnostic> {
        self.write_json(&DiagnosticReport {
            error: diagnostic,
            help: FORMAT_HELP,
        })
    }
}
