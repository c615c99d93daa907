//! Deserializers for loosely typed upstream API fields
//!
//! The geocoding and place-search endpoints encode "no value" as an empty
//! string or an empty array, and return numbers as strings, numbers, or empty
//! arrays depending on the field. Both response envelopes share these
//! helpers.

use serde::{Deserialize, Deserializer};

/// Accept a string, treating empty strings and any non-string shape as None
pub(crate) fn string_or_none<'de, D: Deserializer<'de>>(
    de: D,
) -> std::result::Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Other(serde_json::Value),
    }
    Ok(match Raw::deserialize(de)? {
        Raw::Text(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Accept a number, a numeric string, or anything else as None
pub(crate) fn flexible_f64<'de, D: Deserializer<'de>>(
    de: D,
) -> std::result::Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Other(serde_json::Value),
    }
    Ok(match Raw::deserialize(de)? {
        Raw::Num(n) => Some(n),
        Raw::Text(s) => s.trim().parse().ok(),
        Raw::Other(_) => None,
    })
}

/// Like `flexible_f64`, defaulting to zero for counts
pub(crate) fn flexible_u64<'de, D: Deserializer<'de>>(
    de: D,
) -> std::result::Result<u64, D::Error> {
    Ok(flexible_f64(de)?.map(|n| n as u64).unwrap_or(0))
}
