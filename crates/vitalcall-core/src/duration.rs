use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Elapsed time between a call's start and end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallDuration {
    pub milliseconds: i64,
    pub seconds: i64,
    /// Rounded to two decimal places.
    pub minutes: f64,
}

impl CallDuration {
    /// Negative spans are kept as-is so inconsistent provider data stays visible.
    pub fn from_millis(milliseconds: i64) -> Self {
        // Half-way values round toward +inf.
        let minutes = (milliseconds as f64 / 600.0 + 0.5).floor() / 100.0;
        Self {
            milliseconds,
            seconds: milliseconds.div_euclid(1000),
            minutes,
        }
    }
}

/// Duration between two RFC 3339 timestamps.
///
/// `None` means unknown: either timestamp is missing or unparseable. It is
/// never collapsed to a zero duration.
pub fn compute_duration(started_at: Option<&str>, ended_at: Option<&str>) -> Option<CallDuration> {
    let start = OffsetDateTime::parse(started_at?, &Rfc3339).ok()?;
    let end = OffsetDateTime::parse(ended_at?, &Rfc3339).ok()?;
    let millis = (end - start).whole_milliseconds();
    Some(CallDuration::from_millis(millis as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_and_a_half_minutes() {
        let d = compute_duration(Some("2024-01-01T00:00:00Z"), Some("2024-01-01T00:05:30Z"))
            .unwrap();
        assert_eq!(d.milliseconds, 330_000);
        assert_eq!(d.seconds, 330);
        assert_eq!(d.minutes, 5.5);
    }

    #[test]
    fn fractional_seconds_and_rounding() {
        let d = compute_duration(
            Some("2024-01-01T00:00:00.000Z"),
            Some("2024-01-01T00:01:04.999Z"),
        )
        .unwrap();
        assert_eq!(d.milliseconds, 64_999);
        assert_eq!(d.seconds, 64);
        assert_eq!(d.minutes, 1.08);
    }

    #[test]
    fn missing_end_is_unknown_not_zero() {
        assert_eq!(compute_duration(Some("2024-01-01T00:00:00Z"), None), None);
        assert_eq!(compute_duration(None, Some("2024-01-01T00:00:00Z")), None);
    }

    #[test]
    fn unparseable_timestamp_is_unknown() {
        assert_eq!(
            compute_duration(Some("yesterday"), Some("2024-01-01T00:00:00Z")),
            None
        );
    }

    #[test]
    fn negative_span_passes_through() {
        let d = compute_duration(Some("2024-01-01T00:00:10Z"), Some("2024-01-01T00:00:00.500Z"))
            .unwrap();
        assert_eq!(d.milliseconds, -9_500);
        assert_eq!(d.seconds, -10);
        assert_eq!(d.minutes, -0.16);
    }

    #[test]
    fn offsets_are_respected() {
        let d = compute_duration(
            Some("2024-01-01T01:00:00+01:00"),
            Some("2024-01-01T00:00:30Z"),
        )
        .unwrap();
        assert_eq!(d.seconds, 30);
    }
}
