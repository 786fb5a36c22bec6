//! Text cleanup for scraped fragments.

use chrono::NaiveDate;
use tracing::warn;

/// Normalizes a raw address block from an office card: line breaks become
/// comma-space, and the state abbreviation "CA" is padded with spaces so it
/// cannot collide with a city-name token when the address is later fed to
/// the distance-matrix API.
#[must_use]
pub fn normalize_address(raw: &str) -> String {
    let mut flattened = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        if ch == '\r' || ch == '\n' {
            flattened.push_str(", ");
        } else {
            flattened.push(ch);
        }
    }
    flattened.replace("CA", " CA ")
}

/// Parses the calendar-day texts read from the month widget. Fragments that
/// do not parse under any known format are logged and skipped rather than
/// failing the office.
pub(crate) fn parse_calendar_dates(office: &str, texts: &[String]) -> Vec<NaiveDate> {
    texts
        .iter()
        .filter_map(|text| {
            let parsed = parse_calendar_date(text);
            if parsed.is_none() {
                warn!(office, text, "unparseable calendar date text, skipping");
            }
            parsed
        })
        .collect()
}

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d %Y"];
    let trimmed = text.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
