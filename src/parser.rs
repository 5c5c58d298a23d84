//! Timeline text parser
//!
//! A timeline is a list of sections separated by `---` lines. Each section has
//! a date heading, a title heading and a markdown body:
//!
//! ```text
//! # 2024-03-21
//! ## Event Title
//! Event content goes here...
//!
//! ---
//!
//! # -500
//! ## Ancient Event
//! Content
//! ```
//!
//! Parsing stops at the first problem and reports it as a [`Diagnostic`] with
//! the 1-based line it was found on.

use tracing::{debug, trace};

use crate::error::Diagnostic;
use crate::event::{validate_date, TimelineEvent};

/// Line that separates two sections
pub const SECTION_SEPARATOR: &str = "---";

/// Parse timeline text into events, in source order
///
/// # Example
///
/// ```
/// use markdown_timeline::parser::parse_timeline;
///
/// let events = parse_timeline("# -500\n## Ancient Event\nContent").unwrap();
/// assert_eq!(events[0].year, "-500");
/// assert_eq!(events[0].title, "Ancient Event");
/// ```
pub fn parse_timeline(text: &str) -> Result<Vec<TimelineEvent>, Diagnostic> {
    if text.trim().is_empty() {
        return Err(Diagnostic::parse("Empty timeline content"));
    }

    let mut events = Vec::new();
    for section in split_sections(text) {
        let Some(start) = section.first_line() else {
            continue;
        };
        let event = parse_section(&section, start)?;
        debug!(line = start, year = %event.year, title = %event.title, "parsed timeline section");
        events.push(event);
    }

    if events.is_empty() {
        return Err(Diagnostic::parse("No timeline events found"));
    }

    Ok(events)
}

/// Split the text of a date heading into year, month and day tokens
///
/// A leading `-` is the sign of the year rather than a delimiter, so `-500-03`
/// yields `["-500", "03"]`. Blank text yields no tokens.
pub fn split_date(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };

    let mut tokens: Vec<String> = unsigned.split('-').map(|t| t.trim().to_string()).collect();
    tokens[0].insert_str(0, sign);
    tokens
}

/// One `---`-delimited block of lines, with their 1-based line numbers
struct Section<'a> {
    lines: Vec<(usize, &'a str)>,
}

impl Section<'_> {
    /// Line number of the first non-blank line, or None for a blank section
    fn first_line(&self) -> Option<usize> {
        self.lines
            .iter()
            .find(|(_, line)| !line.trim().is_empty())
            .map(|(number, _)| *number)
    }
}

fn split_sections(text: &str) -> Vec<Section<'_>> {
    let mut sections = vec![Section { lines: Vec::new() }];

    for (index, line) in text.lines().enumerate() {
        if line.trim() == SECTION_SEPARATOR {
            sections.push(Section { lines: Vec::new() });
        } else if let Some(section) = sections.last_mut() {
            section.lines.push((index + 1, line));
        }
    }

    sections
}

fn parse_section(section: &Section<'_>, start: usize) -> Result<TimelineEvent, Diagnostic> {
    let mut date: Option<DateParts> = None;
    let mut title: Option<String> = None;
    let mut content: Vec<&str> = Vec::new();

    for &(number, raw) in &section.lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if date.is_none() {
            if let Some(rest) = heading_text(line, "#") {
                trace!(line = number, "date heading");
                date = Some(parse_date_line(rest, number)?);
                continue;
            }
        }

        if title.is_none() {
            if let Some(rest) = heading_text(line, "##") {
                trace!(line = number, "title heading");
                if rest.is_empty() {
                    return Err(Diagnostic::parse("Empty title").at_line(number));
                }
                title = Some(rest.to_string());
                continue;
            }
        }

        content.push(raw.trim_end());
    }

    let date = date.ok_or_else(|| {
        Diagnostic::parse("Missing date")
            .with_details("Each event must start with a date heading such as '# 2024-03-21'")
            .at_line(start)
    })?;
    let title = title.ok_or_else(|| {
        Diagnostic::parse("Missing title")
            .with_details("Each event needs a title heading such as '## Event Title'")
            .at_line(start)
    })?;
    if content.is_empty() {
        return Err(Diagnostic::parse("Missing content")
            .with_details("Each event needs at least one line of content")
            .at_line(start));
    }

    Ok(TimelineEvent {
        year: date.year,
        month: date.month,
        day: date.day,
        title,
        content: content.join("\n"),
    })
}

/// Text after a heading marker, if `line` is that exact heading level
///
/// The marker must be followed by whitespace or end the line, so `## Title`
/// is not mistaken for a level-1 heading.
fn heading_text<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    if rest.is_empty() {
        Some(rest)
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Year, month and day text of a validated partial date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub year: String,
    pub month: Option<String>,
    pub day: Option<String>,
}

/// Split and validate `YYYY[-MM[-DD]]` text
///
/// A token count other than 1 to 3 is a parse diagnostic; out-of-range values
/// are validation diagnostics. No line is attached.
pub fn parse_date(text: &str) -> Result<DateParts, Diagnostic> {
    let tokens = split_date(text);
    if tokens.is_empty() || tokens.len() > 3 {
        return Err(Diagnostic::parse("Invalid date format")
            .with_details(format!("Expected YYYY[-MM[-DD]], found '{}'", text.trim())));
    }

    let mut tokens = tokens.into_iter();
    let year = tokens.next().unwrap_or_default();
    let month = tokens.next();
    let day = tokens.next();

    validate_date(&year, month.as_deref(), day.as_deref())?;

    Ok(DateParts { year, month, day })
}

fn parse_date_line(text: &str, number: usize) -> Result<DateParts, Diagnostic> {
    parse_date(text).map_err(|d| d.at_line(number))
}
