//! Half-open time intervals on the UTC timeline.

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{CalendarError, CalendarResult};

/// Wall-clock layouts accepted when the input carries no offset.
const WALL_CLOCK_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A validated `[start, end)` interval. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    #[serde(rename = "startTime")]
    start: DateTime<Utc>,
    #[serde(rename = "endTime")]
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range from two date+time inputs interpreted in `timezone`.
    ///
    /// Inputs with an explicit offset (`2024-01-08T09:00:00Z`,
    /// `2024-01-08T09:00:00+02:00`) are already absolute and keep their
    /// instant. Anything else is a wall-clock value localized in `timezone`.
    pub fn parse(start: &str, end: &str, timezone: &str) -> CalendarResult<Self> {
        Self::parse_in(start, end, parse_timezone(timezone)?)
    }

    /// Like `parse`, with the timezone already resolved.
    pub fn parse_in(start: &str, end: &str, tz: Tz) -> CalendarResult<Self> {
        let start = parse_instant(start, tz)?;
        let end = parse_instant(end, tz)?;
        Self::new(start, end)
    }

    /// Build a range from absolute instants.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarResult<Self> {
        if start >= end {
            return Err(CalendarError::InvalidTimeRange(
                "Start time must be before end time".to_string(),
            ));
        }
        Ok(TimeRange { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True if the two intervals intersect. Touching endpoints do not count.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `instant` falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Resolve an IANA timezone identifier such as `Europe/Berlin`.
pub fn parse_timezone(timezone: &str) -> CalendarResult<Tz> {
    timezone
        .trim()
        .parse::<Tz>()
        .map_err(|_| CalendarError::InvalidTimeRange(format!("Unknown timezone '{timezone}'")))
}

fn parse_instant(input: &str, tz: Tz) -> CalendarResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    // RFC 3339 requires seconds; accept `2024-01-08T09:00Z` as well
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M%#z") {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = WALL_CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| {
            CalendarError::InvalidTimeRange(format!(
                "Invalid date/time '{input}'. Expected YYYY-MM-DDTHH:MM[:SS]"
            ))
        })?;

    localize(naive, tz)
}

fn localize(naive: NaiveDateTime, tz: Tz) -> CalendarResult<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => {
            tracing::warn!(%naive, %tz, "ambiguous local time, picking earliest");
            Ok(earliest.with_timezone(&Utc))
        }
        LocalResult::None => Err(CalendarError::InvalidTimeRange(format!(
            "'{naive}' does not exist in {tz}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end, "UTC").unwrap()
    }

    #[test]
    fn test_parse_wall_clock_in_utc() {
        let r = range("2024-01-08T09:00", "2024-01-08T09:15");
        assert_eq!(r.start(), utc(2024, 1, 8, 9, 0));
        assert_eq!(r.end(), utc(2024, 1, 8, 9, 15));
        assert_eq!(r.duration(), Duration::minutes(15));
    }

    #[test]
    fn test_parse_accepts_seconds_and_space_separator() {
        let r = range("2024-01-08 09:00:30", "2024-01-08T10:00:00.500");
        assert_eq!(r.start(), utc(2024, 1, 8, 9, 0) + Duration::seconds(30));
        assert_eq!(r.end(), utc(2024, 1, 8, 10, 0) + Duration::milliseconds(500));
    }

    #[test]
    fn test_parse_normalizes_named_timezone() {
        // EST is UTC-5 in January
        let r = TimeRange::parse("2024-01-08T09:00", "2024-01-08T10:00", "America/New_York")
            .unwrap();
        assert_eq!(r.start(), utc(2024, 1, 8, 14, 0));
        assert_eq!(r.end(), utc(2024, 1, 8, 15, 0));
    }

    #[test]
    fn test_explicit_offset_wins_over_timezone() {
        let r = TimeRange::parse(
            "2024-01-08T09:00:00Z",
            "2024-01-08T12:00:00+02:00",
            "Asia/Tokyo",
        )
        .unwrap();
        assert_eq!(r.start(), utc(2024, 1, 8, 9, 0));
        assert_eq!(r.end(), utc(2024, 1, 8, 10, 0));
    }

    #[test]
    fn test_offset_without_seconds() {
        let r = range("2024-01-08T09:00Z", "2024-01-08T09:30Z");
        assert_eq!(r.start(), utc(2024, 1, 8, 9, 0));
    }

    #[test]
    fn test_rejects_end_before_or_equal_start() {
        let equal = TimeRange::parse("2024-01-08T09:00", "2024-01-08T09:00", "UTC");
        assert!(matches!(equal, Err(CalendarError::InvalidTimeRange(_))));

        let reversed = TimeRange::parse("2024-01-08T10:00", "2024-01-08T09:00", "UTC");
        assert!(matches!(reversed, Err(CalendarError::InvalidTimeRange(_))));
    }

    #[test]
    fn test_rejects_unparseable_input() {
        let result = TimeRange::parse("next tuesday", "2024-01-08T09:00", "UTC");
        assert!(matches!(result, Err(CalendarError::InvalidTimeRange(_))));

        let result = TimeRange::parse("2024-02-30T09:00", "2024-03-01T09:00", "UTC");
        assert!(matches!(result, Err(CalendarError::InvalidTimeRange(_))));
    }

    #[test]
    fn test_rejects_unknown_timezone() {
        let result = TimeRange::parse("2024-01-08T09:00", "2024-01-08T10:00", "Mars/Olympus");
        assert!(matches!(result, Err(CalendarError::InvalidTimeRange(_))));
    }

    #[test]
    fn test_rejects_time_in_dst_gap() {
        // 02:30 never happens on 2024-03-10 in New York
        let result = TimeRange::parse(
            "2024-03-10T02:30",
            "2024-03-10T04:00",
            "America/New_York",
        );
        assert!(matches!(result, Err(CalendarError::InvalidTimeRange(_))));
    }

    #[test]
    fn test_ambiguous_time_picks_earliest() {
        // 01:30 happens twice on 2024-11-03 in New York; the first is EDT (UTC-4)
        let r = TimeRange::parse("2024-11-03T01:30", "2024-11-03T03:00", "America/New_York")
            .unwrap();
        assert_eq!(r.start(), utc(2024, 11, 3, 5, 30));
    }

    #[test]
    fn test_overlap_partial_and_symmetric() {
        let a = range("2024-01-08T10:00", "2024-01-08T11:00");
        let b = range("2024-01-08T10:30", "2024-01-08T11:30");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let a = range("2024-01-08T10:00", "2024-01-08T11:00");
        let b = range("2024-01-08T11:00", "2024-01-08T12:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = range("2024-01-08T08:00", "2024-01-08T18:00");
        let inner = range("2024-01-08T12:00", "2024-01-08T13:00");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&outer));
    }

    #[test]
    fn test_overlap_across_timezones() {
        // 09:00 in Berlin (UTC+1) is 08:00 UTC
        let berlin =
            TimeRange::parse("2024-01-08T09:00", "2024-01-08T10:00", "Europe/Berlin").unwrap();
        let utc_range = range("2024-01-08T08:30", "2024-01-08T08:45");
        assert!(berlin.overlaps(&utc_range));
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = range("2024-01-08T10:00", "2024-01-08T11:00");
        assert!(r.contains(utc(2024, 1, 8, 10, 0)));
        assert!(r.contains(utc(2024, 1, 8, 10, 59)));
        assert!(!r.contains(utc(2024, 1, 8, 11, 0)));
    }

    #[test]
    fn test_serializes_as_utc_instants() {
        let r = TimeRange::parse("2024-01-08T09:00", "2024-01-08T10:00", "Europe/Berlin").unwrap();
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["startTime"], "2024-01-08T08:00:00Z");
        assert_eq!(json["endTime"], "2024-01-08T09:00:00Z");
    }
}
