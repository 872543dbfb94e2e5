//! Timestamp encoding for stored columns.
//!
//! `saved_at` and `created_at` are written as fixed-width UTC instants with
//! millisecond precision (`2024-05-01T09:30:00.000Z`), the same shape the
//! column default produces, so that text ordering equals time ordering.
//! Capture timestamps keep full RFC 3339 precision and offset.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::{Error, Result};

/// Current time truncated to whole milliseconds.
pub fn now_millis() -> OffsetDateTime {
    truncate_millis(OffsetDateTime::now_utc())
}

fn truncate_millis(t: OffsetDateTime) -> OffsetDateTime {
    let nanos = t.nanosecond() / 1_000_000 * 1_000_000;
    t.replace_nanosecond(nanos).unwrap_or(t)
}

/// A write stamp strictly later than `floor`.
///
/// Uses the current time unless the clock has not moved past `floor`, in
/// which case `floor` plus one millisecond is used.
pub fn next_stamp(floor: Option<OffsetDateTime>) -> OffsetDateTime {
    let now = now_millis();
    match floor {
        Some(floor) if now <= floor => truncate_millis(floor) + Duration::milliseconds(1),
        _ => now,
    }
}

/// Format a write stamp (`saved_at`, `created_at`).
pub fn format_stamp(t: OffsetDateTime) -> Result<String> {
    t.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .map_err(|e| Error::InvalidTimestamp(e.to_string()))
}

/// Format a capture timestamp.
pub fn format_rfc3339(t: OffsetDateTime) -> Result<String> {
    t.format(&Rfc3339)
        .map_err(|e| Error::InvalidTimestamp(e.to_string()))
}

/// Parse any stored instant.
///
/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS` form SQLite's
/// `CURRENT_TIMESTAMP` produces (read as UTC).
pub fn parse(s: &str) -> Result<OffsetDateTime> {
    if let Ok(t) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(t);
    }

    PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| Error::InvalidTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_format_stamp_is_fixed_width() {
        let a = format_stamp(datetime!(2024-05-01 09:30:00 UTC)).unwrap();
        let b = format_stamp(datetime!(2024-05-01 09:30:00.5 UTC)).unwrap();
        assert_eq!(a, "2024-05-01T09:30:00.000Z");
        assert_eq!(b, "2024-05-01T09:30:00.500Z");
        assert!(a < b);
    }

    #[test]
    fn test_format_stamp_converts_to_utc() {
        let s = format_stamp(datetime!(2024-05-01 11:30:00 +02:00)).unwrap();
        assert_eq!(s, "2024-05-01T09:30:00.000Z");
    }

    #[test]
    fn test_parse_accepts_both_shapes() {
        assert_eq!(
            parse("2024-05-01T09:30:00.250Z").unwrap(),
            datetime!(2024-05-01 09:30:00.25 UTC)
        );
        assert_eq!(
            parse("2024-05-01 09:30:00").unwrap(),
            datetime!(2024-05-01 09:30:00 UTC)
        );
        assert!(matches!(parse("yesterday"), Err(Error::InvalidTimestamp(_))));
    }

    #[test]
    fn test_rfc3339_round_trip_keeps_precision() {
        let t = datetime!(2024-05-01 09:30:00.123456789 +05:30);
        assert_eq!(parse(&format_rfc3339(t).unwrap()).unwrap(), t);
    }

    #[test]
    fn test_next_stamp_moves_past_future_floor() {
        let floor = now_millis() + Duration::hours(1);
        assert_eq!(next_stamp(Some(floor)), floor + Duration::milliseconds(1));
    }

    #[test]
    fn test_next_stamp_uses_clock_for_past_floor() {
        let floor = datetime!(2000-01-01 00:00:00 UTC);
        assert!(next_stamp(Some(floor)) > floor);
        assert_eq!(next_stamp(None).nanosecond() % 1_000_000, 0);
    }
}
