//! Calendar-day helpers
//!
//! All day boundaries are taken in a single fixed offset. Timestamps are
//! stored in UTC and converted here before any "which day is this" question
//! is answered.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Wall-clock time of a stored timestamp in the given offset
pub fn local_datetime(timestamp: &DateTime<Utc>, offset: &FixedOffset) -> NaiveDateTime {
    timestamp.with_timezone(offset).naive_local()
}

/// Calendar day of a stored timestamp in the given offset
pub fn local_date(timestamp: &DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    local_datetime(timestamp, offset).date()
}

/// Most recent Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_sunday = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(days_from_sunday)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Midnight at the start of `date`
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// `now` expressed as local wall-clock time
pub fn now_local(now: &DateTime<FixedOffset>) -> NaiveDateTime {
    now.naive_local()
}
