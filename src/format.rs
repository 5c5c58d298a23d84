//! Date formatting with token patterns
//!
//! Patterns use `YYYY`, `MM`, `MMM`, `MMMM` and `DD`. The first run of
//! non-alphanumeric characters in the pattern is its separator, and every
//! separator-delimited segment is rendered on its own. Segments that refer to a
//! field the event does not have are dropped, so `YYYY-MM-DD` renders as
//! `2024-03` for an event without a day.

use chrono::Month;

use crate::event::TimelineEvent;

/// Pattern used when none is configured
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

/// Tokens in match order; longer month tokens first so `MMMM` is never read as `MM`
const TOKENS: [&str; 5] = ["YYYY", "MMMM", "MMM", "MM", "DD"];

/// Render the event's date using `pattern`
///
/// # Example
///
/// ```
/// use markdown_timeline::event::TimelineEvent;
/// use markdown_timeline::format::format_date;
///
/// let event = TimelineEvent::new("2024", Some("3".into()), None, "Title", "Body").unwrap();
/// assert_eq!(format_date(&event, "YYYY-MM-DD"), "2024-03");
/// assert_eq!(format_date(&event, "MMMM YYYY"), "March 2024");
/// ```
pub fn format_date(event: &TimelineEvent, pattern: &str) -> String {
    let Some(separator) = detect_separator(pattern) else {
        return render_segment(pattern, event).unwrap_or_default();
    };

    pattern
        .split(separator)
        .filter_map(|segment| render_segment(segment, event))
        .collect::<Vec<_>>()
        .join(separator)
}

/// English month name, e.g. "March"
pub fn month_name(month: u32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    Month::try_from(month).ok().map(|m| m.name())
}

/// Three-letter English month name, e.g. "Mar"
pub fn short_month_name(month: u32) -> Option<&'static str> {
    month_name(month).map(|name| &name[..3])
}

/// First contiguous run of non-alphanumeric characters
fn detect_separator(pattern: &str) -> Option<&str> {
    let start = pattern.find(|c: char| !c.is_alphanumeric())?;
    let rest = &pattern[start..];
    let len = rest.find(char::is_alphanumeric).unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Substitute tokens in one segment
///
/// Returns None when the segment is empty, refers to a missing field, or has
/// token letters left over that do not form a token (e.g. `YY`).
fn render_segment(segment: &str, event: &TimelineEvent) -> Option<String> {
    let mut output = String::new();
    let mut rest = segment;

    while !rest.is_empty() {
        if let Some(token) = TOKENS.iter().find(|token| rest.starts_with(*token)) {
            output.push_str(&token_value(token, event)?);
            rest = &rest[token.len()..];
            continue;
        }

        let mut chars = rest.chars();
        let c = chars.next()?;
        if matches!(c, 'Y' | 'M' | 'D') {
            return None;
        }
        output.push(c);
        rest = chars.as_str();
    }

    if output.is_empty() {
        None
    } else {
        Some(output)
    }
}

fn token_value(token: &str, event: &TimelineEvent) -> Option<String> {
    match token {
        "YYYY" => Some(event.year.clone()),
        "MMMM" => event.month_number().and_then(month_name).map(str::to_string),
        "MMM" => event.month_number().and_then(short_month_name).map(str::to_string),
        "MM" => event.month_number().map(|m| format!("{:02}", m)),
        "DD" => event.day_number().map(|d| format!("{:02}", d)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(year: &str, month: Option<&str>, day: Option<&str>) -> TimelineEvent {
        TimelineEvent {
            year: year.to_string(),
            month: month.map(str::to_string),
            day: day.map(str::to_string),
            title: "Title".to_string(),
            content: "Content".to_string(),
        }
    }

    #[test]
    fn test_full_date() {
        let e = event("2024", Some("3"), Some("9"));
        assert_eq!(format_date(&e, "YYYY-MM-DD"), "2024-03-09");
        assert_eq!(format_date(&e, "DD/MM/YYYY"), "09/03/2024");
        assert_eq!(format_date(&e, "YYYY.MMM.DD"), "2024.Mar.09");
    }

    #[test]
    fn test_missing_day_drops_segment() {
        let e = event("2024", Some("03"), None);
        assert_eq!(format_date(&e, "YYYY-MM-DD"), "2024-03");
        assert_eq!(format_date(&e, "DD/MM/YYYY"), "03/2024");
    }

    #[test]
    fn test_year_only() {
        let e = event("-500", None, None);
        assert_eq!(format_date(&e, "YYYY-MM-DD"), "-500");
        assert_eq!(format_date(&e, "DD MMMM YYYY"), "-500");
    }

    #[test]
    fn test_month_names() {
        let e = event("1969", Some("07"), Some("20"));
        assert_eq!(format_date(&e, "MMMM DD, YYYY"), "July 20, 1969");
        assert_eq!(format_date(&e, "DD MMM YYYY"), "20 Jul 1969");

        let e = event("1969", Some("07"), None);
        assert_eq!(format_date(&e, "MMMM DD, YYYY"), "July 1969");
    }

    #[test]
    fn test_leftover_tokens_drop_segment() {
        let e = event("2024", Some("3"), Some("1"));
        assert_eq!(format_date(&e, "YYYY-MMMMM-DD"), "2024-01");
        assert_eq!(format_date(&e, "YY-MM"), "03");
    }

    #[test]
    fn test_no_separator() {
        let e = event("2024", Some("3"), Some("1"));
        assert_eq!(format_date(&e, "YYYYMMDD"), "20240301");

        // One segment, and it needs a day
        let e = event("2024", Some("3"), None);
        assert_eq!(format_date(&e, "YYYYMMDD"), "");
    }

    #[test]
    fn test_separator_run_and_empty_segments() {
        let e = event("2024", Some("3"), Some("1"));
        assert_eq!(format_date(&e, "YYYY -- MM -- DD"), "2024 -- 03 -- 01");
        assert_eq!(format_date(&e, "-YYYY-MM"), "2024-03");
        assert_eq!(format_date(&e, ""), "");
    }

    #[test]
    fn test_month_name_lookup() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(13), None);
        assert_eq!(month_name(0), None);
        assert_eq!(short_month_name(9), Some("Sep"));
    }
}
