//! Program date-time parsing
//!
//! `EXT-X-PROGRAM-DATE-TIME` values come in two flavours:
//! - strict: the RFC 3339 subset, offsets written as `Z` or `±HH:MM`
//! - lenient: everything strict accepts, plus `±HHMM` and `±HH` offsets
//!
//! Both keep the original offset so that equality compares the same instant.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::error::{PlaylistError, Result};

/// Which grammar the decoder applies to program date-time values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    #[default]
    Lenient,
    Strict,
}

/// Parse a timestamp with the given grammar
pub fn parse(mode: TimestampMode, value: &str) -> Result<DateTime<FixedOffset>> {
    match mode {
        TimestampMode::Lenient => parse_lenient(value),
        TimestampMode::Strict => parse_strict(value),
    }
}

/// RFC 3339 with optional fractional seconds, colon-delimited offsets only
pub fn parse_strict(value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();
    if !regex!(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}[Tt][0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:[Zz]|[+-][0-9]{2}:[0-9]{2})$")
        .is_match(value)
    {
        return Err(PlaylistError::InvalidTimestamp(value.to_string()));
    }
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| PlaylistError::InvalidTimestamp(format!("{}: {}", value, e)))
}

/// Like [`parse_strict`] but also accepts `±HHMM` and `±HH` offsets
pub fn parse_lenient(value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(ts) = parse_strict(value) {
        return Ok(ts);
    }

    let caps = regex!(
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}[Tt][0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?)(?:([Zz])|([+-])([0-9]{2})(?::?([0-9]{2}))?)$"
    )
    .captures(value)
    .ok_or_else(|| PlaylistError::InvalidTimestamp(value.to_string()))?;

    // rewrite `+01`, `+0100` and `+01:00` into the colon form
    let offset = match (caps.get(2), caps.get(3), caps.get(4)) {
        (Some(_), _, _) => "Z".to_string(),
        (None, Some(sign), Some(hours)) => {
            let minutes = caps.get(5).map_or("00", |m| m.as_str());
            format!("{}{}:{}", sign.as_str(), hours.as_str(), minutes)
        }
        _ => return Err(PlaylistError::InvalidTimestamp(value.to_string())),
    };
    let normalized = format!("{}{}", &caps[1], offset);
    DateTime::parse_from_rfc3339(&normalized)
        .map_err(|e| PlaylistError::InvalidTimestamp(format!("{}: {}", value, e)))
}

/// Render a timestamp the way it is written back into a playlist
pub fn format(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
