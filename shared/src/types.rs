//! API request and response types

use crate::charts::{ChartPoint, DailyActivity};
use crate::health_metrics::BmiResult;
use crate::models::{
    ActivityRecord, BodyMetricSnapshot, Goals, GoalsUpdate, Measurements, Stats, StreakState,
};
use crate::schedule::ScheduledDay;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_completed() -> bool {
    true
}

// ============================================================================
// Mutations
// ============================================================================

/// Workout log request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogWorkoutRequest {
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default = "default_completed")]
    pub completed: bool,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub exercise_count: Option<u32>,
    /// strength, cardio, flexibility or mixed (default)
    #[serde(default)]
    pub workout_type: Option<String>,
    #[serde(default)]
    pub calories_burned: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body metrics log request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogBodyMetricsRequest {
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub body_fat_percent: Option<f64>,
    #[serde(default)]
    pub muscle_mass: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub measurements: Measurements,
}

/// `POST /progress` body: `{ "type": "workout" | "metrics" | "goal", "data": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ProgressMutation {
    Workout(LogWorkoutRequest),
    Metrics(LogBodyMetricsRequest),
    Goal(GoalsUpdate),
}

/// Sub-resource returned by a mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressMutationResponse {
    Workout(ActivityRecord),
    Metrics(BodyMetricSnapshot),
    Goal(Goals),
}

// ============================================================================
// Reads
// ============================================================================

/// `GET /progress` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressQuery {
    /// Set to false to get 404 instead of lazily creating the aggregate
    #[serde(default)]
    pub create: Option<bool>,
}

/// Chart series for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub weight: Vec<ChartPoint>,
    pub body_fat: Vec<ChartPoint>,
    pub muscle_mass: Vec<ChartPoint>,
    pub workout_frequency: Vec<DailyActivity>,
}

/// Full progress view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub stats: Stats,
    pub streak_data: StreakState,
    pub goals: Goals,
    pub recent_metrics: Vec<BodyMetricSnapshot>,
    pub recent_workouts: Vec<ActivityRecord>,
    pub chart_data: ChartData,
    /// Present when the user's profile declares a weekly frequency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduledDay>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<BmiResult>,
}

/// Workout deletion result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteWorkoutResponse {
    pub deleted: bool,
}
