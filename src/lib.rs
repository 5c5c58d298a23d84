//! Markdown Timeline Library
//!
//! Parses chronological events written in a small markdown dialect and
//! prepares them for display. This library provides functionality to:
//! - Parse timeline text into events, reporting the first problem with its line
//! - Compare partial dates, including negative (BC) years
//! - Sort and search events
//! - Format dates with patterns such as `YYYY-MM-DD` or `MMMM DD, YYYY`
//! - Find and edit timeline blocks inside markdown notes
//!
//! # Example
//!
//! ```
//! use markdown_timeline::parser::parse_timeline;
//! use markdown_timeline::sort::{sort_events, SortOrder};
//! use markdown_timeline::format::format_date;
//!
//! let text = "# 2024-03-21\n## Event Title\nEvent content\n---\n# -500\n## Ancient Event\nContent";
//! let events = parse_timeline(text).expect("valid timeline");
//! let sorted = sort_events(&events, SortOrder::Ascending);
//!
//! assert_eq!(sorted[0].title, "Ancient Event");
//! assert_eq!(format_date(&sorted[1], "DD/MM/YYYY"), "21/03/2024");
//! ```

pub mod document;
pub mod error;
pub mod event;
pub mod format;
pub mod parser;
pub mod render;
pub mod settings;
pub mod sort;
pub mod view;

// Re-export commonly used items
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use event::TimelineEvent;
pub use parser::parse_timeline;
pub use sort::SortOrder;
