//! Serial encodings of calendar values.
//!
//! Dates and date-times are carried as epoch seconds so they can take part in
//! numeric computation next to plain numbers.
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

pub const DAY_SECONDS: i64 = 24 * 60 * 60;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemporalError {
    #[error("Invalid Date/DateTime String: {0}")]
    InvalidString(String),
    #[error("Epoch value out of range: {0}")]
    OutOfRange(i64),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SerialTemporal {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl SerialTemporal {
    /// Parses `YYYY-MM-DD` into a date or `YYYY-MM-DDTHH:MM:SS` into a date-time.
    pub fn parse(value: &str) -> Result<Self, TemporalError> {
        let invalid = || TemporalError::InvalidString(value.to_string());
        match value.len() {
            10 => NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(SerialTemporal::Date)
                .map_err(|_| invalid()),
            19 => NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
                .map(SerialTemporal::DateTime)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// Whole days come back as a date, anything else as a date-time.
    pub fn of_seconds(epoch_seconds: i64) -> Result<Self, TemporalError> {
        if epoch_seconds.rem_euclid(DAY_SECONDS) == 0 {
            Self::of_days(epoch_seconds.div_euclid(DAY_SECONDS))
        } else {
            chrono::DateTime::from_timestamp(epoch_seconds, 0)
                .map(|dt| SerialTemporal::DateTime(dt.naive_utc()))
                .ok_or(TemporalError::OutOfRange(epoch_seconds))
        }
    }

    pub fn of_days(epoch_days: i64) -> Result<Self, TemporalError> {
        Duration::try_days(epoch_days)
            .and_then(|d| epoch().checked_add_signed(d))
            .map(SerialTemporal::Date)
            .ok_or(TemporalError::OutOfRange(epoch_days))
    }

    pub fn epoch_seconds(&self) -> i64 {
        match self {
            SerialTemporal::Date(d) => (*d - epoch()).num_days() * DAY_SECONDS,
            SerialTemporal::DateTime(dt) => dt.and_utc().timestamp(),
        }
    }

    /// Shifts by whole days. Fails when the result leaves chrono's range.
    pub fn add_days(&self, days: i64) -> Result<Self, TemporalError> {
        let shifted = Duration::try_days(days).and_then(|delta| match self {
            SerialTemporal::Date(d) => d.checked_add_signed(delta).map(SerialTemporal::Date),
            SerialTemporal::DateTime(dt) => dt.checked_add_signed(delta).map(SerialTemporal::DateTime),
        });
        shifted.ok_or(TemporalError::OutOfRange(days))
    }

    pub fn to_date(&self) -> NaiveDate {
        match self {
            SerialTemporal::Date(d) => *d,
            SerialTemporal::DateTime(dt) => dt.date(),
        }
    }

    pub fn to_date_time(&self) -> NaiveDateTime {
        match self {
            SerialTemporal::Date(d) => d.and_time(chrono::NaiveTime::MIN),
            SerialTemporal::DateTime(dt) => *dt,
        }
    }

    pub fn year(&self) -> i32 {
        self.to_date().year()
    }

    pub fn to_date_string(&self) -> String {
        match self {
            SerialTemporal::Date(d) => d.format(DATE_FORMAT).to_string(),
            SerialTemporal::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
        }
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

impl PartialEq for SerialTemporal {
    fn eq(&self, other: &Self) -> bool {
        self.epoch_seconds() == other.epoch_seconds()
    }
}

impl Eq for SerialTemporal {}

impl Hash for SerialTemporal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch_seconds().hash(state);
    }
}

impl PartialOrd for SerialTemporal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SerialTemporal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_seconds().cmp(&other.epoch_seconds())
    }
}

impl fmt::Display for SerialTemporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_date_string())
    }
}

impl From<NaiveDate> for SerialTemporal {
    fn from(value: NaiveDate) -> Self {
        SerialTemporal::Date(value)
    }
}

impl From<NaiveDateTime> for SerialTemporal {
    fn from(value: NaiveDateTime) -> Self {
        SerialTemporal::DateTime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_date_encodes_whole_days() {
        let date = SerialTemporal::parse("1970-01-03").unwrap();
        assert_eq!(date.epoch_seconds(), 2 * DAY_SECONDS);
        assert!(matches!(date, SerialTemporal::Date(_)));
    }

    #[test]
    fn test_date_time_encodes_utc_seconds() {
        let dt = SerialTemporal::parse("1970-01-01T01:00:30").unwrap();
        assert_eq!(dt.epoch_seconds(), 3630);
        assert_eq!(dt.to_date_string(), "1970-01-01T01:00:30");
    }

    #[rstest]
    #[case("2024-13-01")]
    #[case("2024/01/01")]
    #[case("2024-01-01 10:00:00")]
    #[case("")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(SerialTemporal::parse(input), Err(TemporalError::InvalidString(_))));
    }

    #[test]
    fn test_of_seconds_picks_variant() {
        let date = SerialTemporal::of_seconds(19_000 * DAY_SECONDS).unwrap();
        assert!(matches!(date, SerialTemporal::Date(_)));
        let dt = SerialTemporal::of_seconds(19_000 * DAY_SECONDS + 5).unwrap();
        assert!(matches!(dt, SerialTemporal::DateTime(_)));
        assert_eq!(dt.epoch_seconds(), 19_000 * DAY_SECONDS + 5);
    }

    #[test]
    fn test_add_days_keeps_variant() {
        let date = SerialTemporal::parse("2024-02-28").unwrap().add_days(2).unwrap();
        assert_eq!(date.to_date_string(), "2024-03-01");
        let dt = SerialTemporal::parse("2024-02-28T12:00:00").unwrap().add_days(1).unwrap();
        assert_eq!(dt.to_date_string(), "2024-02-29T12:00:00");
    }

    #[rstest]
    #[case(i64::MAX)]
    #[case(i64::MIN)]
    #[case(400_000_000)]
    fn test_add_days_out_of_range_fails(#[case] days: i64) {
        let date = SerialTemporal::parse("2024-02-28").unwrap();
        assert_eq!(date.add_days(days), Err(TemporalError::OutOfRange(days)));
        let dt = SerialTemporal::parse("2024-02-28T12:00:00").unwrap();
        assert_eq!(dt.add_days(days), Err(TemporalError::OutOfRange(days)));
        assert!(matches!(SerialTemporal::of_days(days), Err(TemporalError::OutOfRange(_))));
    }

    #[test]
    fn test_date_equals_midnight_date_time() {
        let date = SerialTemporal::parse("2023-06-01").unwrap();
        let midnight = SerialTemporal::parse("2023-06-01T00:00:00").unwrap();
        let noon = SerialTemporal::parse("2023-06-01T12:00:00").unwrap();
        assert_eq!(date, midnight);
        assert!(date < noon);
    }
}
