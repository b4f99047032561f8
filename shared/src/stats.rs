//! Workout statistics
//!
//! Counters are recomputed from the full activity log on every call; no
//! incremental state is kept between calls.

use crate::calendar;
use crate::models::{ActivityRecord, Stats};
use chrono::{DateTime, FixedOffset};

/// Derive workout counters from the log as of `now`
///
/// Only completed records count. The week runs from the most recent Sunday
/// at local midnight through `now`, the month from the first day of the
/// current month through `now`, both inclusive.
pub fn compute_stats(
    records: &[ActivityRecord],
    weekly_goal: u32,
    now: DateTime<FixedOffset>,
) -> Stats {
    let offset = now.offset();
    let now_local = calendar::now_local(&now);
    let today = now_local.date();
    let week_start = calendar::start_of_day(calendar::week_start(today));
    let month_start = calendar::start_of_day(calendar::month_start(today));

    let mut stats = Stats::empty(weekly_goal);
    let mut timed_workouts = 0u32;

    for record in records.iter().filter(|r| r.completed) {
        stats.total_workouts += 1;

        if let Some(minutes) = record.duration_minutes {
            stats.total_minutes += minutes;
            timed_workouts += 1;
        }
        stats.total_calories += record.calories_burned.unwrap_or(0.0);

        let local = calendar::local_datetime(&record.date, offset);
        if local >= week_start && local <= now_local {
            stats.workouts_this_week += 1;
        }
        if local >= month_start && local <= now_local {
            stats.workouts_this_month += 1;
        }
    }

    if timed_workouts > 0 {
        stats.average_workout_duration = Some(stats.total_minutes / timed_workouts as f64);
    }
    stats.weekly_goal_percent = weekly_goal_percent(stats.workouts_this_week, weekly_goal);

    stats
}

/// Share of the weekly goal reached, rounded and capped at 100
pub fn weekly_goal_percent(workouts_this_week: u32, weekly_goal: u32) -> u32 {
    if weekly_goal == 0 {
        return 0;
    }
    let percent = (workouts_this_week as f64 / weekly_goal as f64 * 100.0).round();
    percent.min(100.0) as u32
}
