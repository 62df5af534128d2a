//! Permissive date parsing for report cells and query bounds.
//!
//! Sales exports write dates in whatever shape the exporting tool preferred
//! (`04-30-22`, `2022-04-30`, `Apr 30, 2022`, ...). [`parse_date`] tries a
//! fixed list of layouts in order and returns the first match. Values without
//! an offset are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Year-first layouts. Only tried when the input starts with a four-digit
/// year, since `%Y` also accepts one to three digits.
const YEAR_FIRST_DATETIME: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

const YEAR_FIRST_DATE: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const MONTH_FIRST_DATETIME: &[&str] = &[
  "%m/%d/%Y %H:%M:%S",
  "%m/%d/%Y %H:%M",
];

/// Two-digit years come before four-digit ones for the same reason.
const MONTH_FIRST_DATE: &[&str] = &[
  "%m-%d-%y",
  "%m-%d-%Y",
  "%m/%d/%y",
  "%m/%d/%Y",
  "%d %B %Y",
  "%B %d, %Y",
  "%B %d %Y",
  "%d-%B-%Y",
];

/// Parse `input` into a UTC timestamp, or `None` if no layout matches.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
  let s = input.trim();
  if s.is_empty() {
    return None;
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }

  let (datetime_formats, date_formats) = if starts_with_year(s) {
    (YEAR_FIRST_DATETIME, YEAR_FIRST_DATE)
  } else {
    (MONTH_FIRST_DATETIME, MONTH_FIRST_DATE)
  };

  datetime_formats
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    .or_else(|| {
      date_formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
    .map(|naive| naive.and_utc())
}

fn starts_with_year(s: &str) -> bool {
  let b = s.as_bytes();
  b.len() > 4 && b[..4].iter().all(u8::is_ascii_digit) && !b[4].is_ascii_digit()
}
