//! Naive local timestamps as stored in the competition document.
//!
//! Times are wall-clock values of the venue and carry no offset. They are
//! written as `YYYY-MM-DDTHH:MM:SS`; reading also accepts the minute-only
//! form produced by browser `datetime-local` inputs and a space instead of
//! the `T` separator.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Canonical output format.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats accepted when reading, tried in order.
const ACCEPTED: [&str; 5] = [
    FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a document timestamp in any accepted format.
///
/// Returns `None` if no format matches.
pub fn parse(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    ACCEPTED
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Serialize with the canonical format (used via `#[serde(with)]`).
pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(FORMAT))
}

/// Deserialize from any accepted format (used via `#[serde(with)]`).
pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid timestamp `{raw}`, expected YYYY-MM-DDTHH:MM[:SS]"
        ))
    })
}
