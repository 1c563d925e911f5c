//! Calendar window sampling and the on-disk timestamp formats.

use crate::{rng::SubsystemRng, types::Timestamp};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serializer;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A closed span of wall-clock time that timestamps are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        debug_assert!(start <= end, "window start after end");
        Self { start, end }
    }

    /// Window from midnight of `start` to midnight of `end`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(midnight(start), midnight(end))
    }

    pub fn span_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Uniform timestamp in [start, end], second granularity.
    pub fn sample(&self, rng: &mut SubsystemRng) -> Timestamp {
        let offset = rng.range_inclusive(0, self.span_seconds());
        self.start + Duration::seconds(offset)
    }

    /// Uniform timestamp in [start, end), second granularity.
    pub fn sample_exclusive(&self, rng: &mut SubsystemRng) -> Timestamp {
        let offset = rng.range_inclusive(0, (self.span_seconds() - 1).max(0));
        self.start + Duration::seconds(offset)
    }
}

pub fn midnight(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN)
}

pub fn format_datetime(ts: &Timestamp) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Literal calendar date for built-in defaults.
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

// ── serde field helpers (CSV / JSON output) ───────────────────────

pub fn serialize_datetime<S: Serializer>(ts: &Timestamp, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(DATETIME_FORMAT))
}

pub fn serialize_opt_datetime<S: Serializer>(
    ts: &Option<Timestamp>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => s.collect_str(&ts.format(DATETIME_FORMAT)),
        None => s.serialize_none(),
    }
}

/// Writes only the date part of a full timestamp.
pub fn serialize_date_part<S: Serializer>(ts: &Timestamp, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.date().format(DATE_FORMAT))
}

pub fn serialize_date<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(DATE_FORMAT))
}
