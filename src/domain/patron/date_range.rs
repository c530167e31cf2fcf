//! Board term value object.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Longest term a single range may cover, in calendar years.
pub const MAX_TERM_YEARS: u32 = 10;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A closed interval `[start, end]` with `start < end`, spanning at most
/// [`MAX_TERM_YEARS`] calendar years.
///
/// # Invariants
///
/// - `start` is strictly before `end`
/// - `end` is not after `start` plus ten calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: Timestamp,
    end: Timestamp,
}

/// Unchecked wire shape; only reachable through [`DateRange::new`].
#[derive(Deserialize)]
struct RawDateRange {
    start: Timestamp,
    end: Timestamp,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = ValidationError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if !start.is_before(&end) {
            return Err(ValidationError::business_rule(
                "Start date must be before end date",
            ));
        }
        let limit = start.add_years(MAX_TERM_YEARS).ok_or_else(|| {
            ValidationError::business_rule("Start date is outside the supported range")
        })?;
        if end.is_after(&limit) {
            return Err(ValidationError::business_rule(format!(
                "Date range cannot exceed {} years",
                MAX_TERM_YEARS
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Whole days covered, rounding partial days up.
    pub fn duration_in_days(&self) -> i64 {
        ceil_days(self.end.duration_since(&self.start).num_milliseconds())
    }

    /// Calendar month difference, ignoring the day of month.
    pub fn duration_in_months(&self) -> i32 {
        let start = self.start.as_datetime();
        let end = self.end.as_datetime();
        let years = end.year() - start.year();
        let months = end.month() as i32 - start.month() as i32;
        years * 12 + months
    }

    pub fn duration_in_years(&self) -> f64 {
        f64::from(self.duration_in_months()) / 12.0
    }

    /// `start <= now <= end`.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.contains(now)
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Timestamp::now())
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.is_after(&self.end)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }

    pub fn is_upcoming_at(&self, now: Timestamp) -> bool {
        now.is_before(&self.start)
    }

    pub fn is_upcoming(&self) -> bool {
        self.is_upcoming_at(Timestamp::now())
    }

    /// Days left until `end`, zero once expired.
    pub fn days_until_expiry_at(&self, now: Timestamp) -> i64 {
        if self.is_expired_at(now) {
            return 0;
        }
        ceil_days(self.end.duration_since(&now).num_milliseconds())
    }

    /// Days elapsed since `end`, zero while not expired.
    pub fn days_since_expiry_at(&self, now: Timestamp) -> i64 {
        if !self.is_expired_at(now) {
            return 0;
        }
        ceil_days(now.duration_since(&self.end).num_milliseconds())
    }

    pub fn contains(&self, instant: Timestamp) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// True when the two closed intervals share at least one instant.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

fn ceil_days(millis: i64) -> i64 {
    (millis + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY)
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start.date_string(), self.end.date_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    }

    fn range(start: Timestamp, end: Timestamp) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    #[test]
    fn rejects_start_not_before_end() {
        let day = at(2024, 1, 1);
        assert!(DateRange::new(day, day).is_err());
        assert!(DateRange::new(at(2024, 2, 1), day).is_err());
    }

    #[test]
    fn exactly_ten_years_is_allowed() {
        assert!(DateRange::new(at(2020, 1, 1), at(2030, 1, 1)).is_ok());
    }

    #[test]
    fn more_than_ten_years_is_rejected() {
        let err = DateRange::new(at(2020, 1, 1), at(2030, 1, 2)).unwrap_err();
        assert_eq!(err.to_string(), "Date range cannot exceed 10 years");
    }

    #[test]
    fn durations() {
        let r = range(at(2024, 1, 15), at(2025, 3, 1));
        assert_eq!(r.duration_in_months(), 14);
        assert!((r.duration_in_years() - 14.0 / 12.0).abs() < f64::EPSILON);

        let r = range(at(2024, 1, 1), at(2024, 1, 11));
        assert_eq!(r.duration_in_days(), 10);
    }

    #[test]
    fn partial_days_round_up() {
        let start = at(2024, 1, 1);
        let end = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap());
        assert_eq!(range(start, end).duration_in_days(), 2);
    }

    #[test]
    fn status_relative_to_now() {
        let r = range(at(2024, 1, 1), at(2024, 12, 31));

        assert!(r.is_upcoming_at(at(2023, 6, 1)));
        assert!(r.is_active_at(at(2024, 1, 1)));
        assert!(r.is_active_at(at(2024, 12, 31)));
        assert!(r.is_expired_at(at(2025, 1, 1)));
        assert!(!r.is_active_at(at(2025, 1, 1)));
    }

    #[test]
    fn expiry_counters() {
        let r = range(at(2024, 1, 1), at(2024, 1, 31));

        assert_eq!(r.days_until_expiry_at(at(2024, 1, 21)), 10);
        assert_eq!(r.days_since_expiry_at(at(2024, 1, 21)), 0);
        assert_eq!(r.days_until_expiry_at(at(2024, 2, 5)), 0);
        assert_eq!(r.days_since_expiry_at(at(2024, 2, 5)), 5);
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = range(at(2024, 1, 1), at(2024, 6, 1));
        let b = range(at(2024, 6, 1), at(2024, 12, 1));
        let c = range(at(2024, 7, 1), at(2024, 12, 1));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn displays_as_dates() {
        let r = range(at(2024, 1, 1), at(2026, 1, 1));
        assert_eq!(r.to_string(), "2024-01-01 to 2026-01-01");
    }

    #[test]
    fn deserializing_goes_through_validation() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-01T00:00:00Z","end":"2026-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(ok, range(at(2024, 1, 1), at(2026, 1, 1)));

        let inverted = serde_json::from_str::<DateRange>(
            r#"{"start":"2030-01-01T00:00:00Z","end":"2020-01-01T00:00:00Z"}"#,
        );
        assert!(inverted.is_err());

        let too_long = serde_json::from_str::<DateRange>(
            r#"{"start":"2000-01-01T00:00:00Z","end":"2099-01-01T00:00:00Z"}"#,
        );
        assert!(too_long.is_err());
    }
}
