//! Inclusive calendar-day ranges used to filter reports.
//!
//! A range covers every instant from 00:00:00.000 on the start day to
//! 23:59:59.999 on the end day, evaluated in a fixed UTC offset. Bounds
//! that fall outside chrono's range clamp to its first or last instant.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, Utc,
};
use thiserror::Error;

/// Date format accepted by [`DateRange::parse`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Milliseconds from midnight to 23:59:59.999.
const END_OF_DAY_MILLIS: i64 = 86_399_999;

/// Errors that can occur while building a date range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    offset: FixedOffset,
}

impl DateRange {
    /// Create a range evaluated in UTC.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            offset: Utc.fix(),
        }
    }

    /// Evaluate the day boundaries in the given offset instead of UTC.
    #[must_use]
    pub const fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Build a range from optional `YYYY-MM-DD` bounds.
    ///
    /// Returns `Ok(None)` unless both bounds are present, which callers treat
    /// as "no filtering".
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidDate` if a present bound does not parse.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, PeriodError> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());

        let (Some(start), Some(end)) = (start, end) else {
            return Ok(None);
        };

        Ok(Some(Self::new(parse_day(start)?, parse_day(end)?)))
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Offset the day boundaries are evaluated in.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Earliest instant included in the range.
    #[must_use]
    pub fn first_instant(&self) -> DateTime<Utc> {
        self.to_utc(self.start.and_time(NaiveTime::MIN))
    }

    /// Latest instant included in the range (23:59:59.999 on the end day).
    #[must_use]
    pub fn last_instant(&self) -> DateTime<Utc> {
        let end_of_day = NaiveTime::MIN + TimeDelta::milliseconds(END_OF_DAY_MILLIS);
        self.to_utc(self.end.and_time(end_of_day))
    }

    /// Whether the instant falls inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.first_instant() <= at && at <= self.last_instant()
    }

    /// Shift a local wall time into UTC, clamping to the representable range.
    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let shift = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        match local.checked_sub_signed(shift) {
            Some(utc) => utc.and_utc(),
            None if shift < TimeDelta::zero() => DateTime::<Utc>::MAX_UTC,
            None => DateTime::<Utc>::MIN_UTC,
        }
    }
}

fn parse_day(value: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| PeriodError::InvalidDate(value.to_owned()))
}
