//! # Time
//!
//! Millisecond timestamps, the injectable clock, calendar helpers for daily
//! stock rows and reward periods.

use crate::errors::ValidationError;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Milliseconds since the Unix epoch (UTC).
pub type Timestamp = u64;

pub const SECOND_MS: u64 = 1_000;
pub const MINUTE_MS: u64 = 60 * SECOND_MS;
pub const HOUR_MS: u64 = 60 * MINUTE_MS;
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Day 1 of the sequential day numbering: 2026-01-01T00:00:00Z.
pub const DAY_NUMBER_EPOCH_MS: Timestamp = 1_767_225_600_000;

/// Clock abstraction so that expiry logic can be tested deterministically.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Manually driven clock for tests.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    time: AtomicU64,
}

impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(Ordering::SeqCst)
    }
}

fn to_datetime(ts: Timestamp) -> DateTime<Utc> {
    i64::try_from(ts)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn to_timestamp(dt: DateTime<Utc>) -> Timestamp {
    u64::try_from(dt.timestamp_millis()).unwrap_or(0)
}

/// UTC calendar date of a timestamp.
pub fn date_of(ts: Timestamp) -> NaiveDate {
    to_datetime(ts).date_naive()
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> Timestamp {
    to_timestamp(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

/// Human-readable day ordinal: 2026-01-01 is day 1.
pub fn sequential_day(ts: Timestamp) -> i64 {
    let offset = ts as i128 - DAY_NUMBER_EPOCH_MS as i128;
    let days = offset.div_euclid(DAY_MS as i128);
    i64::try_from(days + 1).unwrap_or(i64::MAX)
}

/// RFC 3339 rendering used in API payloads.
pub fn to_rfc3339(ts: Timestamp) -> String {
    to_datetime(ts).to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Inclusive time window `[start, end]` over which rewards are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Period {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::Invalid {
                field: "period",
                reason: "end is before start".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        (self.start..=self.end).contains(&ts)
    }

    /// The UTC calendar month `year-month`.
    pub fn month(year: i32, month: u32) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::Invalid {
            field: "month",
            reason: format!("{year:04}-{month:02} is not a calendar month"),
        };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        Ok(Self {
            start: start_of_day(first),
            end: start_of_day(next).saturating_sub(1),
        })
    }

    /// Calendar month containing `ts`.
    pub fn month_of(ts: Timestamp) -> Self {
        let date = date_of(ts);
        Self::month(date.year(), date.month()).unwrap_or(Self { start: ts, end: ts })
    }

    /// Parses `YYYY-MM`.
    pub fn parse_month(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::Invalid {
            field: "month",
            reason: format!("expected YYYY-MM, got {raw:?}"),
        };
        let (y, m) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::month(year, month)
    }
}
