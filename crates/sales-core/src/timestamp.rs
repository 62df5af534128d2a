//! Fixed-width timestamp encoding for stored documents.
//!
//! Stores compare dates as strings, so every timestamp is written in UTC with
//! exactly six fractional digits. Lexicographic order then equals
//! chronological order.
//!
//! Usable as a serde `with` module: `#[serde(with = "sales_core::timestamp")]`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Encode `dt` as e.g. `2022-04-30T00:00:00.000000Z`.
pub fn format(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode any RFC 3339 timestamp into UTC.
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  serializer.serialize_str(&format(*dt))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  parse(&raw).ok_or_else(|| {
    serde::de::Error::custom(format!("invalid timestamp: {raw:?}"))
  })
}
