//! Best-effort parsing of the numeric text fields of a feed.
//!
//! Every field of a GTFS row arrives as text. These helpers are the only
//! place that text becomes a number; they return `None` for anything they
//! cannot accept and leave the fallback to the call site:
//!
//! - coordinates fall back to `0.0` (see [`Stop::location`](crate::Stop::location)),
//! - an unparseable `stop_sequence` takes that stop time out of every
//!   ordering comparison.

/// Parse a `stop_sequence` value as a signed integer. Surrounding
/// whitespace is ignored.
pub fn parse_sequence(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Parse a latitude in decimal degrees, rejecting values outside [-90, 90].
pub fn parse_latitude(raw: &str) -> Option<f64> {
    parse_degrees(raw, 90.0)
}

/// Parse a longitude in decimal degrees, rejecting values outside [-180, 180].
pub fn parse_longitude(raw: &str) -> Option<f64> {
    parse_degrees(raw, 180.0)
}

fn parse_degrees(raw: &str, limit: f64) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value.abs() <= limit).then_some(value)
}
