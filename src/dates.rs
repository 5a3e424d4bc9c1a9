//! Posting-date parsing and normalization
//!
//! Every board writes dates differently: the lister-style boards print
//! "Jan 5, 2026", the aggregator prints "01/05/26" inside a longer text
//! chunk, and the blog feed uses RFC 3339. Everything is normalized to
//! MM/DD/YYYY for the sheet.

use chrono::{Local, NaiveDate};
use regex::Regex;

/// Column format of the shared sheet.
pub const SHEET_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse "Jan 5, 2026" / "Sep 30, 2025".
pub fn parse_month_day_year(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%b %d, %Y").ok()
}

/// Parse "01/05/26".
pub fn parse_short_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%m/%d/%y").ok()
}

/// Find the first MM/DD/YY sequence inside a larger text chunk.
pub fn find_short_date(text: &str) -> Option<NaiveDate> {
    if let Ok(re) = Regex::new(r"\d{2}/\d{2}/\d{2}") {
        if let Some(m) = re.find(text) {
            return parse_short_date(m.as_str());
        }
    }
    None
}

/// Parse a date already in sheet format, MM/DD/YYYY.
pub fn parse_sheet_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), SHEET_DATE_FORMAT).ok()
}

pub fn to_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FORMAT).to_string()
}

/// True when `date` is at most `days` days before `today`. Future dates
/// count as recent.
pub fn posted_within(date: NaiveDate, days: i64, today: NaiveDate) -> bool {
    (today - date).num_days() <= days
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
