//! Timeline event records and partial-date ordering
//!
//! Dates are kept as the text the author wrote (`-500`, `2024-3`, `2024-03-21`)
//! and compared field by field. No calendar date is ever built, so BC years
//! and years outside any date library's range sort correctly.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;

/// A single event parsed from a timeline section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Signed year text, negative for BC
    pub year: String,
    /// Month text (1-12, padded or not)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Day text (1-31, padded or not); only present with a month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    /// Event title
    pub title: String,
    /// Raw markdown body
    pub content: String,
}

impl TimelineEvent {
    /// Build an event, validating the date and requiring a title and content
    pub fn new(
        year: impl Into<String>,
        month: Option<String>,
        day: Option<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, Diagnostic> {
        let year = year.into();
        validate_date(&year, month.as_deref(), day.as_deref())?;

        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(Diagnostic::parse("Empty title"));
        }

        let content = content.into();
        if content.trim().is_empty() {
            return Err(Diagnostic::parse("Missing content"));
        }

        Ok(Self { year, month, day, title, content })
    }

    /// Numeric year, if the year text parses
    pub fn year_number(&self) -> Option<i64> {
        parse_year(&self.year)
    }

    /// Numeric month, if present and parseable
    pub fn month_number(&self) -> Option<u32> {
        self.month.as_deref().and_then(parse_component)
    }

    /// Numeric day, if present and parseable
    pub fn day_number(&self) -> Option<u32> {
        self.day.as_deref().and_then(parse_component)
    }

    /// The date as written on a `#` line: `year[-month[-day]]`
    pub fn date_text(&self) -> String {
        let mut text = self.year.clone();
        if let Some(month) = &self.month {
            text.push('-');
            text.push_str(month);
            if let Some(day) = &self.day {
                text.push('-');
                text.push_str(day);
            }
        }
        text
    }

    /// The section text for this event
    pub fn to_source(&self) -> String {
        format!("# {}\n## {}\n{}", self.date_text(), self.title, self.content)
    }

    /// Key used for ordering. Missing or unparseable month/day count as 1,
    /// an unparseable year as 0.
    fn sort_key(&self) -> (i64, u32, u32) {
        (
            self.year_number().unwrap_or(0),
            self.month_number().unwrap_or(1),
            self.day_number().unwrap_or(1),
        )
    }
}

/// Compare two events chronologically (year, then month, then day)
///
/// Events on the same date compare equal regardless of title, so a stable
/// sort keeps them in source order.
pub fn compare_events(a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

/// Leap year by the 4/100/400 rule, applied to the absolute year
///
/// BC years are not shifted to astronomical numbering, so -4 is a leap year
/// just like 4.
pub fn is_leap_year(year: i64) -> bool {
    let year = year.unsigned_abs();
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`, or 0 for an invalid month
pub fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Check the components of a partial date
///
/// The returned diagnostic names the offending field and its raw text; the
/// caller attaches the line number.
pub fn validate_date(year: &str, month: Option<&str>, day: Option<&str>) -> Result<(), Diagnostic> {
    let year_value = parse_year(year).ok_or_else(|| {
        Diagnostic::validation(format!("Invalid year: {}", year))
            .with_details("Year must be a whole number, e.g. 2024 or -500")
    })?;

    let Some(month) = month else {
        if let Some(day) = day {
            return Err(Diagnostic::validation(format!("Invalid day: {}", day))
                .with_details("A day requires a month"));
        }
        return Ok(());
    };

    let month_value = parse_component(month)
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| {
            Diagnostic::validation(format!("Invalid month: {}", month))
                .with_details("Month must be a number between 1 and 12")
        })?;

    if let Some(day) = day {
        let max = days_in_month(year_value, month_value);
        parse_component(day)
            .filter(|d| (1..=max).contains(d))
            .ok_or_else(|| {
                Diagnostic::validation(format!("Invalid day: {}", day)).with_details(format!(
                    "Day must be between 1 and {} for {}-{}",
                    max, year, month
                ))
            })?;
    }

    Ok(())
}

fn parse_year(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn parse_component(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    // u32::from_str accepts a leading '+', which is not a month or day
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
