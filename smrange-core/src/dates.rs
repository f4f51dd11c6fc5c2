use crate::error::{Result, SitemapError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Inclusive time window articles are selected against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        TimeWindow { start, end }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        self.start <= dt && dt <= self.end
    }
}

/// Normalize a raw sitemap timestamp into a comparable value.
///
/// A trailing `Z` is stripped rather than treated as a zone conversion, so
/// `2024-01-05T10:00:00Z` and `2024-01-05T10:00:00` normalize identically.
/// Accepts ISO-8601 date-times with either a `T` or a space separator,
/// bare dates (midnight), and offset-carrying values. For the latter,
/// `strip_timezone` keeps the wall-clock time and drops the offset;
/// otherwise the value is converted to UTC so feeds that mix offset-aware
/// and offset-naive entries stay comparable.
pub fn parse_timestamp(raw: &str, strip_timezone: bool) -> Result<NaiveDateTime> {
    let s = raw.trim();
    let s = s.strip_suffix('Z').unwrap_or(s);

    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(date) = s.parse::<NaiveDate>() {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    match DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z"))
    {
        Ok(dt) if strip_timezone => Ok(dt.naive_local()),
        Ok(dt) => Ok(dt.naive_utc()),
        Err(_) => Err(SitemapError::DateFormat(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn z_suffix_is_a_noop() {
        assert_eq!(
            parse_timestamp("2024-01-05T10:00:00Z", false).unwrap(),
            parse_timestamp("2024-01-05T10:00:00", false).unwrap()
        );
    }

    #[test]
    fn bare_date_normalizes_to_midnight() {
        assert_eq!(
            parse_timestamp("2024-01-15", false).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_time(NaiveTime::MIN)
        );
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        assert!(parse_timestamp("2023-10-18T05:40:04.7435930", false).is_ok());
    }

    #[test]
    fn space_separator_is_accepted() {
        assert_eq!(
            parse_timestamp("2024-01-05 10:00:00", false).unwrap(),
            dt("2024-01-05T10:00:00")
        );
        assert_eq!(
            parse_timestamp("2024-01-05 10:00:00+05:00", false).unwrap(),
            dt("2024-01-05T05:00:00")
        );
    }

    #[test]
    fn offset_is_dropped_when_stripping() {
        // wall-clock time survives, offset does not
        assert_eq!(
            parse_timestamp("2024-01-05T10:00:00+05:00", true).unwrap(),
            dt("2024-01-05T10:00:00")
        );
    }

    #[test]
    fn offset_converts_to_utc_when_not_stripping() {
        assert_eq!(
            parse_timestamp("2024-01-05T10:00:00+05:00", false).unwrap(),
            dt("2024-01-05T05:00:00")
        );
    }

    #[test]
    fn garbage_is_a_date_format_error() {
        for raw in ["yesterday", "2024-13-40", "", "05/01/2024"] {
            let err = parse_timestamp(raw, false).unwrap_err();
            assert!(matches!(err, SitemapError::DateFormat(_)), "raw: {raw:?}");
        }
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = TimeWindow::new(dt("2024-01-01T00:00:00"), dt("2024-01-10T00:00:00"));
        assert!(window.contains(dt("2024-01-01T00:00:00")));
        assert!(window.contains(dt("2024-01-10T00:00:00")));
        assert!(window.contains(dt("2024-01-05T12:00:00")));
        assert!(!window.contains(dt("2024-01-10T00:00:01")));
        assert!(!window.contains(dt("2023-12-31T23:59:59")));
    }
}
