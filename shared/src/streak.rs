//! Workout streak tracking
//!
//! The streak walks distinct active days from the newest backwards:
//! - a day no more than one day before the cursor extends the streak
//! - a day exactly two days before the cursor is tolerated: the walk
//!   continues past it but the day itself is not counted
//! - anything further back ends the walk

use crate::calendar;
use crate::models::{ActivityRecord, StreakState};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use std::collections::BTreeSet;

/// Recompute the streak state from the full log as of `now`
///
/// `previous` supplies the longest streak seen so far and the weekly goal;
/// everything else is derived from `records`.
pub fn compute_streak(
    records: &[ActivityRecord],
    previous: &StreakState,
    now: DateTime<FixedOffset>,
) -> StreakState {
    let offset = now.offset();

    let last_activity_date = records
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.date)
        .max();

    let Some(last_activity_date) = last_activity_date else {
        return StreakState {
            current_streak: 0,
            longest_streak: previous.longest_streak,
            last_activity_date: None,
            weekly_goal: previous.weekly_goal,
            monthly_completed_days: 0,
        };
    };

    // One entry per calendar day
    let active_days: BTreeSet<NaiveDate> = records
        .iter()
        .filter(|r| r.completed)
        .map(|r| calendar::local_date(&r.date, offset))
        .collect();

    let current_streak = walk_streak(&active_days, now.date_naive());

    StreakState {
        current_streak,
        longest_streak: previous.longest_streak.max(current_streak),
        last_activity_date: Some(last_activity_date),
        weekly_goal: previous.weekly_goal,
        monthly_completed_days: monthly_completed_days(records, now),
    }
}

/// Count the streak ending at `today` over deduplicated active days
fn walk_streak(active_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut check_date = today;

    for &day in active_days.iter().rev() {
        let days_diff = (check_date - day).num_days();

        if days_diff <= 1 {
            streak += 1;
            check_date = day - Duration::days(1);
        } else if days_diff == 2 {
            check_date = day - Duration::days(1);
        } else {
            break;
        }
    }

    streak
}

/// Distinct days in the current month, up to `now`, with a completed workout
fn monthly_completed_days(records: &[ActivityRecord], now: DateTime<FixedOffset>) -> u32 {
    let offset = now.offset();
    let now_local = calendar::now_local(&now);
    let month_start = calendar::start_of_day(calendar::month_start(now_local.date()));

    records
        .iter()
        .filter(|r| r.completed)
        .map(|r| calendar::local_datetime(&r.date, offset))
        .filter(|local| *local >= month_start && *local <= now_local)
        .map(|local| local.date())
        .collect::<BTreeSet<_>>()
        .len() as u32
}
