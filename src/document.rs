//! Timeline text inside markdown notes
//!
//! Notes embed timelines in fenced code blocks:
//!
//! ````text
//! ```timeline
//! # 2024-03-21
//! ## Event Title
//! Event content
//! ```
//! ````
//!
//! This module finds those blocks, parses them with note-relative line
//! numbers, and inserts new events. It only works on strings; reading and
//! writing the note is left to the caller.

use std::ops::Range;

use tracing::{debug, warn};

use crate::error::{Diagnostic, Error, Result};
use crate::event::TimelineEvent;
use crate::parser::{parse_date, parse_timeline, SECTION_SEPARATOR};

/// Opening fence of a timeline block
pub const TIMELINE_FENCE: &str = "```timeline";

const CLOSING_FENCE: &str = "```";

/// A fenced timeline block within a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBlock<'a> {
    /// Text between the fences
    pub body: &'a str,
    /// 1-based line of the first body line
    pub body_line: usize,
    /// Byte range of `body` within the note
    pub range: Range<usize>,
}

/// Find every closed ```` ```timeline ```` block, in note order
pub fn find_timeline_blocks(note: &str) -> Vec<TimelineBlock<'_>> {
    let mut blocks = Vec::new();
    // (body start offset, body first line) of the block being read
    let mut open: Option<(usize, usize)> = None;
    let mut offset = 0;

    for (index, line) in note.split_inclusive('\n').enumerate() {
        let trimmed = line.trim();
        let line_start = offset;
        offset += line.len();

        match open {
            None if is_opening_fence(trimmed) => {
                open = Some((offset, index + 2));
            }
            Some((start, body_line)) if trimmed == CLOSING_FENCE => {
                blocks.push(TimelineBlock {
                    body: &note[start..line_start],
                    body_line,
                    range: start..line_start,
                });
                open = None;
            }
            _ => {}
        }
    }

    debug!(count = blocks.len(), "found timeline blocks");
    blocks
}

fn is_opening_fence(line: &str) -> bool {
    line.strip_prefix(TIMELINE_FENCE)
        .is_some_and(|rest| rest.trim().is_empty())
}

/// Parse all timeline blocks in a note
///
/// A note without fenced blocks is parsed as bare timeline text. Diagnostic
/// lines refer to the note, not to the block.
pub fn parse_note(note: &str) -> std::result::Result<Vec<TimelineEvent>, Diagnostic> {
    let blocks = find_timeline_blocks(note);
    if blocks.is_empty() {
        return parse_timeline(note);
    }

    let mut events = Vec::new();
    for block in blocks {
        let parsed = parse_timeline(block.body).map_err(|d| d.offset_line(block.body_line - 1))?;
        events.extend(parsed);
    }
    Ok(events)
}

/// User input for a new event, as typed into an "add event" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    /// `YYYY[-MM[-DD]]`, year may be negative
    pub date: String,
    pub title: String,
    pub content: String,
}

impl NewEvent {
    /// Validate the input and build the event
    pub fn to_event(&self) -> std::result::Result<TimelineEvent, Diagnostic> {
        let date = self.date.trim();
        if date.is_empty() {
            return Err(Diagnostic::parse("Missing date"));
        }

        let parts = parse_date(date)?;

        if self.title.contains('\n') {
            return Err(Diagnostic::parse("Title must be a single line"));
        }
        if self.content.lines().any(|line| line.trim() == SECTION_SEPARATOR) {
            return Err(Diagnostic::parse("Content cannot contain a '---' line")
                .with_details("'---' separates timeline events"));
        }
        // A fence line would close the enclosing timeline block
        if self.content.lines().any(|line| line.trim_start().starts_with(CLOSING_FENCE)) {
            return Err(Diagnostic::parse("Content cannot contain a code fence")
                .with_details("'```' lines end the timeline block"));
        }

        TimelineEvent::new(parts.year, parts.month, parts.day, self.title.as_str(), self.content.trim_end())
    }

    /// Section text for the new event: `# date`, `## title`, then content
    pub fn to_source(&self) -> std::result::Result<String, Diagnostic> {
        Ok(self.to_event()?.to_source())
    }
}

/// Insert an event section at the top of the note's first timeline block
///
/// The inserted lines use `\r\n` endings when the note does.
pub fn insert_event(note: &str, source: &str) -> Result<String> {
    let Some(block) = find_timeline_blocks(note).into_iter().next() else {
        warn!("note has no timeline block");
        return Err(Error::NoTimelineBlock);
    };

    let newline = if note.contains("\r\n") { "\r\n" } else { "\n" };
    let source = source.replace("\r\n", "\n").replace('\n', newline);
    let insertion = if block.body.trim().is_empty() {
        format!("{}{}", source, newline)
    } else {
        format!("{}{}{}{}", source, newline, SECTION_SEPARATOR, newline)
    };

    let start = block.range.start;
    let mut updated = String::with_capacity(note.len() + insertion.len());
    updated.push_str(&note[..start]);
    updated.push_str(&insertion);
    updated.push_str(&note[start..]);
    Ok(updated)
}

/// Prepend an event section to bare timeline text
pub fn prepend_event(text: &str, source: &str) -> String {
    if text.trim().is_empty() {
        format!("{}\n", source)
    } else {
        format!("{}\n{}\n{}", source, SECTION_SEPARATOR, text)
    }
}

/// Timeline text for a list of events
pub fn serialize_timeline(events: &[TimelineEvent]) -> String {
    let sections: Vec<String> = events.iter().map(TimelineEvent::to_source).collect();
    let mut text = sections.join(&format!("\n\n{}\n\n", SECTION_SEPARATOR));
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "# My note\n\nSome prose.\n\n```timeline\n# 2024-03-21\n## Event\nBody\n```\n\nMore prose.\n";

    #[test]
    fn test_find_blocks() {
        let blocks = find_timeline_blocks(NOTE);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "# 2024-03-21\n## Event\nBody\n");
        assert_eq!(blocks[0].body_line, 6);
    }

    #[test]
    fn test_other_fences_and_unclosed_blocks_are_ignored() {
        let note = "```rust\nfn main() {}\n```\n```timeline\n# 2024\n## T\nbody\n";
        assert!(find_timeline_blocks(note).is_empty());

        let note = "```timelines\n# 2024\n```\n";
        assert!(find_timeline_blocks(note).is_empty());
    }

    #[test]
    fn test_parse_note_lines_are_note_relative() {
        let note = "intro\n\n```timeline\n# 2024\n## T\nbody\n---\n# 2025-02-30\n## U\nbody\n```\n";
        let err = parse_note(note).unwrap_err();
        assert_eq!(err.message, "Invalid day: 30");
        assert_eq!(err.line, Some(8));
    }

    #[test]
    fn test_parse_note_multiple_blocks() {
        let note = "```timeline\n# 1\n## A\na\n```\ntext\n```timeline\n# 2\n## B\nb\n```\n";
        let events = parse_note(note).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].title, "B");
    }

    #[test]
    fn test_parse_note_without_blocks() {
        let events = parse_note("# -500\n## Ancient\nbody").unwrap();
        assert_eq!(events[0].year, "-500");
    }

    #[test]
    fn test_new_event_negative_year() {
        let input = NewEvent {
            date: "-44-03-15".to_string(),
            title: "Ides of March".to_string(),
            content: "Caesar assassinated".to_string(),
        };
        let event = input.to_event().unwrap();
        assert_eq!(event.year, "-44");
        assert_eq!(event.month.as_deref(), Some("03"));
        assert_eq!(event.day.as_deref(), Some("15"));
        assert_eq!(
            input.to_source().unwrap(),
            "# -44-03-15\n## Ides of March\nCaesar assassinated"
        );
    }

    #[test]
    fn test_new_event_rejects_bad_input() {
        let mut input = NewEvent {
            date: "2024-02-30".to_string(),
            title: "T".to_string(),
            content: "c".to_string(),
        };
        assert_eq!(input.to_event().unwrap_err().message, "Invalid day: 30");

        input.date = String::new();
        assert_eq!(input.to_event().unwrap_err().message, "Missing date");

        input.date = "2024".to_string();
        input.content = "a\n---\nb".to_string();
        assert!(input.to_event().is_err());

        input.content = String::new();
        assert_eq!(input.to_event().unwrap_err().message, "Missing content");

        input.date = "2024-01-02-03".to_string();
        input.content = "c".to_string();
        assert_eq!(input.to_event().unwrap_err().message, "Invalid date format");
    }

    #[test]
    fn test_new_event_rejects_code_fence_content() {
        let input = NewEvent {
            date: "2025".to_string(),
            title: "New".to_string(),
            content: "code:\n```\nlet x = 1;\n```".to_string(),
        };
        let err = input.to_event().unwrap_err();
        assert_eq!(err.message, "Content cannot contain a code fence");

        let input = NewEvent {
            content: "code:\n  ```rust\nlet x = 1;".to_string(),
            ..input
        };
        assert!(input.to_source().is_err());

        // Inline backticks are fine and keep the block intact
        let input = NewEvent {
            content: "run `cargo test` first".to_string(),
            ..input
        };
        let updated = insert_event(NOTE, &input.to_source().unwrap()).unwrap();
        assert_eq!(parse_note(&updated).unwrap().len(), 2);
    }

    #[test]
    fn test_insert_event() {
        let updated = insert_event(NOTE, "# 2025\n## New\nFresh").unwrap();
        assert!(updated.contains("```timeline\n# 2025\n## New\nFresh\n---\n# 2024-03-21\n"));

        let events = parse_note(&updated).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "New");
        assert!(updated.ends_with("More prose.\n"));
    }

    #[test]
    fn test_insert_into_empty_block() {
        let note = "```timeline\n```\n";
        let updated = insert_event(note, "# 2025\n## New\nFresh").unwrap();
        assert_eq!(updated, "```timeline\n# 2025\n## New\nFresh\n```\n");
    }

    #[test]
    fn test_insert_keeps_crlf_line_endings() {
        let note = NOTE.replace('\n', "\r\n");
        let updated = insert_event(&note, "# 2025\n## New\nFresh").unwrap();
        assert!(updated.contains("```timeline\r\n# 2025\r\n## New\r\nFresh\r\n---\r\n# 2024-03-21\r\n"));
        assert!(!updated.replace("\r\n", "").contains('\n'));

        let events = parse_note(&updated).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "New");
        assert_eq!(events[1].content, "Body");
    }

    #[test]
    fn test_insert_without_block() {
        let result = insert_event("no timeline here", "# 2025\n## New\nFresh");
        assert!(matches!(result, Err(Error::NoTimelineBlock)));
    }

    #[test]
    fn test_prepend_event() {
        assert_eq!(prepend_event("", "# 1\n## A\na"), "# 1\n## A\na\n");
        assert_eq!(
            prepend_event("# 2\n## B\nb\n", "# 1\n## A\na"),
            "# 1\n## A\na\n---\n# 2\n## B\nb\n"
        );
    }

    #[test]
    fn test_serialize_round_trip() {
        let text = "# 2024-03-21\n## Event Title\nLine one\nLine two   \n---\n# -500\n## Ancient Event\nContent";
        let events = parse_timeline(text).unwrap();
        let reparsed = parse_timeline(&serialize_timeline(&events)).unwrap();
        assert_eq!(events, reparsed);
    }
}
