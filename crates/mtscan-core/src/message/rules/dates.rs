//! Value date parsing.

use chrono::NaiveDate;

use super::patterns::{DATE_LABEL, VALUE_DATE_HEADER, YYMMDD};

/// Parse a SWIFT `YYMMDD` date. Years are taken in the 2000s.
pub fn parse_yymmdd(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 6 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let year: i32 = s[0..2].parse().ok()?;
    let month: u32 = s[2..4].parse().ok()?;
    let day: u32 = s[4..6].parse().ok()?;

    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

/// Date from a `:32A:` body: `Date: YYMMDD` when labelled, else the first
/// standalone six-digit group that is a valid date.
pub fn date_from_settlement(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_LABEL.captures(text) {
        if let Some(date) = parse_yymmdd(&caps[1]) {
            return Some(date);
        }
    }

    YYMMDD
        .captures_iter(text)
        .find_map(|caps| parse_yymmdd(&caps[1]))
}

/// Date from a `Value Date: dd/mm/yy[yy]` header.
pub fn date_from_header(text: &str) -> Option<NaiveDate> {
    let caps = VALUE_DATE_HEADER.captures(text)?;

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year_str = &caps[3];
    let mut year: i32 = year_str.parse().ok()?;
    if year_str.len() == 2 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}
