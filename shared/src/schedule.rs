//! Training schedule inference
//!
//! Answers "is this a planned training day?" from a declared weekly
//! frequency alone. The weekday slots are a fixed table: downstream
//! "missed workout" messaging is keyed to exactly these days.

use crate::calendar;
use crate::models::ActivityRecord;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Training weekdays for 1 through 6 sessions per week
const WEEKLY_SCHEDULES: [&[Weekday]; 6] = [
    &[Weekday::Mon],
    &[Weekday::Mon, Weekday::Thu],
    &[Weekday::Mon, Weekday::Wed, Weekday::Fri],
    &[Weekday::Mon, Weekday::Tue, Weekday::Thu, Weekday::Fri],
    &[
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ],
    &[
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ],
];

/// Weekdays scheduled for the given weekly frequency
pub fn training_weekdays(days_per_week: i32) -> &'static [Weekday] {
    const EVERY_DAY: &[Weekday] = &[
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    match days_per_week {
        n if n >= 7 => EVERY_DAY,
        n if n <= 0 => &[],
        n => WEEKLY_SCHEDULES[(n - 1) as usize],
    }
}

/// Whether `date` is a planned training day
pub fn is_training_day(date: NaiveDate, days_per_week: i32) -> bool {
    training_weekdays(days_per_week).contains(&date.weekday())
}

/// One day of the current week's plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDay {
    pub date: NaiveDate,
    pub is_training_day: bool,
    pub has_workout: bool,
    /// Planned, already started or past, and nothing completed
    pub missed: bool,
}

/// Sunday through Saturday of the week containing `now`
pub fn week_schedule(
    records: &[ActivityRecord],
    days_per_week: i32,
    now: DateTime<FixedOffset>,
) -> Vec<ScheduledDay> {
    let offset = now.offset();
    let today = now.date_naive();
    let start = calendar::week_start(today);

    let active_days: HashSet<NaiveDate> = records
        .iter()
        .filter(|r| r.completed)
        .map(|r| calendar::local_date(&r.date, offset))
        .collect();

    (0..7)
        .map(|i| {
            let date = start + Duration::days(i);
            let training = is_training_day(date, days_per_week);
            let has_workout = active_days.contains(&date);
            ScheduledDay {
                date,
                is_training_day: training,
                has_workout,
                missed: training && !has_workout && date <= today,
            }
        })
        .collect()
}
