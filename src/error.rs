//! Error types for the timeline library
//!
//! Parsing and validation problems are reported as a [`Diagnostic`], which
//! carries the kind of failure and the 1-based line it was found on. Everything
//! else (I/O, settings, globbing) goes through the crate-level [`Error`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Category of a [`Diagnostic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Structural grammar violation (missing date/title/content, bad token count)
    Parse,
    /// Date component with an out-of-range or non-numeric value
    Validation,
    /// Raised by a renderer, never by the parser
    Render,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Parse => "parse",
            DiagnosticKind::Validation => "validation",
            DiagnosticKind::Render => "render",
        };
        f.write_str(name)
    }
}

/// A structured report of why timeline text could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Short human-readable message, e.g. "Missing title"
    pub message: String,
    /// What kind of failure this is
    pub kind: DiagnosticKind,
    /// Optional longer explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// 1-based source line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: DiagnosticKind::Parse,
            details: None,
            line: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: DiagnosticKind::Validation,
            details: None,
            line: None,
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: DiagnosticKind::Render,
            details: None,
            line: None,
        }
    }

    /// Attach an explanation
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach the 1-based line the problem was found on
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Shift the line number by `offset` lines
    ///
    /// Used when the parsed text is a fenced block that starts part-way
    /// through a larger note.
    pub fn offset_line(mut self, offset: usize) -> Self {
        self.line = self.line.map(|line| line + offset);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {})", self.message, line),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Main error type for the timeline library
#[derive(Error, Debug)]
pub enum Error {
    /// Timeline text could not be parsed or validated
    #[error(transparent)]
    Diagnostic(#[from] Diagnostic),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be loaded
    #[error("Settings error: {0}")]
    Config(#[from] config::ConfigError),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No files found matching pattern: {0}")]
    NoFilesMatched(String),

    /// The note has no ```timeline block to write into
    #[error("No timeline block found in note")]
    NoTimelineBlock,

    /// Unknown sort order name
    #[error("Invalid sort order: {0} (expected asc or desc)")]
    InvalidSortOrder(String),
}
