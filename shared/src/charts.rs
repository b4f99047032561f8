//! Chart-ready projections of the activity log
//!
//! These are read-only views derived on demand; nothing here is stored.

use crate::calendar;
use crate::models::{ActivityRecord, BodyMetricSnapshot};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default trailing window for body-metric charts
pub const METRIC_CHART_WINDOW_DAYS: i64 = 90;

/// Default length of the workout heatmap
pub const HEATMAP_DAYS: u32 = 30;

/// Body metric plotted in a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Weight,
    BodyFat,
    MuscleMass,
}

impl MetricField {
    fn value(&self, snapshot: &BodyMetricSnapshot) -> Option<f64> {
        match self {
            MetricField::Weight => snapshot.weight,
            MetricField::BodyFat => snapshot.body_fat_percent,
            MetricField::MuscleMass => snapshot.muscle_mass,
        }
    }
}

/// One point of a metric series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

/// One heatmap cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub count: u32,
    pub has_workout: bool,
}

/// Oldest-first series of `field` over the trailing `window_days`
///
/// Snapshots without the field are skipped.
pub fn metric_series(
    snapshots: &[BodyMetricSnapshot],
    field: MetricField,
    window_days: i64,
    now: DateTime<FixedOffset>,
) -> Vec<ChartPoint> {
    let cutoff = now.with_timezone(&Utc) - Duration::days(window_days);

    let mut points: Vec<ChartPoint> = snapshots
        .iter()
        .filter(|s| s.recorded_at >= cutoff)
        .filter_map(|s| {
            field.value(s).map(|value| ChartPoint {
                date: s.recorded_at,
                value,
            })
        })
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// Completed workouts per local day for the trailing `days`, oldest first
pub fn workout_frequency(
    records: &[ActivityRecord],
    days: u32,
    now: DateTime<FixedOffset>,
) -> Vec<DailyActivity> {
    let offset = now.offset();
    let today = now.date_naive();

    let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
    for record in records.iter().filter(|r| r.completed) {
        *per_day
            .entry(calendar::local_date(&record.date, offset))
            .or_insert(0) += 1;
    }

    (0..days as i64)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let count = per_day.get(&date).copied().unwrap_or(0);
            DailyActivity {
                date,
                count,
                has_workout: count > 0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Measurements;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 6, 30, 12, 0, 0)
            .unwrap()
    }

    fn snapshot(days_ago: i64, weight: Option<f64>, body_fat: Option<f64>) -> BodyMetricSnapshot {
        BodyMetricSnapshot {
            id: Uuid::new_v4(),
            recorded_at: now().with_timezone(&Utc) - Duration::days(days_ago),
            weight,
            body_fat_percent: body_fat,
            muscle_mass: None,
            height: None,
            measurements: Measurements::default(),
        }
    }

    #[test]
    fn test_metric_series_window_filter_and_order() {
        let snapshots = vec![
            snapshot(5, Some(80.0), None),
            snapshot(120, Some(90.0), Some(25.0)),
            snapshot(30, Some(82.0), Some(21.0)),
            snapshot(10, None, Some(20.0)),
        ];

        let weight = metric_series(&snapshots, MetricField::Weight, 90, now());
        let values: Vec<f64> = weight.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![82.0, 80.0]);

        let body_fat = metric_series(&snapshots, MetricField::BodyFat, 90, now());
        let values: Vec<f64> = body_fat.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![21.0, 20.0]);
    }

    #[test]
    fn test_metric_series_empty() {
        assert!(metric_series(&[], MetricField::Weight, 90, now()).is_empty());
    }

    #[test]
    fn test_workout_frequency_covers_trailing_days() {
        let today = Utc.with_ymd_and_hms(2025, 6, 30, 7, 0, 0).unwrap();
        let mut skipped = ActivityRecord::completed_at(today);
        skipped.completed = false;
        let records = vec![
            ActivityRecord::completed_at(today),
            ActivityRecord::completed_at(today + Duration::hours(3)),
            ActivityRecord::completed_at(today - Duration::days(29)),
            ActivityRecord::completed_at(today - Duration::days(30)),
            skipped,
        ];

        let heatmap = workout_frequency(&records, 30, now());
        assert_eq!(heatmap.len(), 30);
        assert_eq!(heatmap[0].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(heatmap[29].date, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        assert_eq!(heatmap[29].count, 2);
        assert!(heatmap[29].has_workout);
        assert_eq!(heatmap[0].count, 1);
        assert!(!heatmap[15].has_workout);
        let total: u32 = heatmap.iter().map(|d| d.count).sum();
        assert_eq!(total, 3);
    }
}
