//! Wall-clock timestamps used by notes and archived records.
//!
//! # Responsibility
//! - Format/parse the persisted `YYYY-MM-DDTHH:MM:SS` shape.
//! - Provide an injectable clock so retention logic stays testable.
//!
//! # Invariants
//! - Persisted timestamps are local time, second precision, no zone suffix.
//! - Timestamps produced by `now()` carry no sub-second component, so a
//!   format/parse round trip is lossless.

use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound, TimeDelta};

/// Persisted timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Display format used by archive listings.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

pub type Timestamp = NaiveDateTime;

/// Source of "now" for set-level operations.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Local wall clock truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Current local time, second precision.
pub fn now() -> Timestamp {
    Local::now().naive_local().trunc_subsecs(0)
}

pub fn format_timestamp(value: &Timestamp) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Stand-in date for archived records whose `deleted_at` is missing or
/// unreadable. Old enough that any positive retention expires it.
pub fn legacy_epoch() -> Timestamp {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// `now - days`, or `None` when the subtraction leaves chrono's range.
pub fn days_before(now: Timestamp, days: i64) -> Option<Timestamp> {
    TimeDelta::try_days(days).and_then(|delta| now.checked_sub_signed(delta))
}
