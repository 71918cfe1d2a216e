//! Packed representations used by the Appointy backend.
//!
//! Availability results come back as base64 strings wrapping either a
//! JSON object of `id -> bool` or a comma-joined list. Durations come
//! back as strings with a unit suffix (`"1800s"`).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Result, SchedulingError};

fn decode_base64(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SchedulingError::format(format!("Invalid base64 payload: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| SchedulingError::format(format!("Payload is not UTF-8: {}", e)))
}

/// Decodes a base64-wrapped JSON object of employee/service id to
/// availability flag.
pub fn decode_identifier_set(encoded: &str) -> Result<HashMap<String, bool>> {
    let json = decode_base64(encoded)?;
    serde_json::from_str(&json)
        .map_err(|e| SchedulingError::format(format!("Invalid identifier set: {}", e)))
}

pub fn encode_identifier_set(ids: &HashMap<String, bool>) -> Result<String> {
    Ok(STANDARD.encode(serde_json::to_string(ids)?))
}

/// Decodes a base64-wrapped comma-joined list. Items are returned
/// exactly as joined; only an empty payload is an empty list.
pub fn decode_delimited_list(encoded: &str) -> Result<Vec<String>> {
    let joined = decode_base64(encoded)?;
    if joined.is_empty() {
        return Ok(vec![]);
    }
    Ok(joined.split(',').map(String::from).collect())
}

pub fn encode_delimited_list<S: AsRef<str>>(items: &[S]) -> String {
    let joined = items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
    STANDARD.encode(joined)
}

/// Strips a single trailing unit marker (`"1800s"` -> `1800`) and parses
/// the remainder as whole seconds.
pub fn strip_duration_suffix(value: &str) -> Result<u64> {
    let value = value.trim();
    let digits = match value.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => &value[..value.len() - 1],
        _ => value,
    };
    digits
        .parse::<u64>()
        .map_err(|_| SchedulingError::format(format!("Invalid duration '{}'", value)))
}

/// A duration in whole seconds. Parsed from the backend's suffixed
/// string form and written back in that form only on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DurationSecs(pub u64);

impl DurationSecs {
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn minutes(&self) -> u64 {
        self.0 / 60
    }
}

impl FromStr for DurationSecs {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self> {
        strip_duration_suffix(s).map(DurationSecs)
    }
}

impl fmt::Display for DurationSecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl Serialize for DurationSecs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DurationSecs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Secs(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Secs(secs) => Ok(DurationSecs(secs)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
