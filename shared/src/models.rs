//! Data models for progress tracking
//!
//! The per-user [`ProgressAggregate`] is a plain data struct. It owns the
//! activity log (workouts and body-metric snapshots) and the derived streak
//! and stats, which are always recomputed from the full log.

use crate::errors::ProgressError;
use crate::{stats, streak};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Weekly workout target for a freshly created aggregate
pub const DEFAULT_WEEKLY_GOAL: u32 = 3;

// ============================================================================
// Activity log
// ============================================================================

/// Kind of logged workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Flexibility,
    #[default]
    Mixed,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Strength => "strength",
            WorkoutType::Cardio => "cardio",
            WorkoutType::Flexibility => "flexibility",
            WorkoutType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strength" => Ok(WorkoutType::Strength),
            "cardio" => Ok(WorkoutType::Cardio),
            "flexibility" => Ok(WorkoutType::Flexibility),
            "mixed" => Ok(WorkoutType::Mixed),
            other => Err(ProgressError::validation(format!(
                "Unknown workout type '{}'. Expected strength, cardio, flexibility or mixed",
                other
            ))),
        }
    }
}

/// One logged workout. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_count: Option<u32>,
    #[serde(default)]
    pub workout_type: WorkoutType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ActivityRecord {
    /// Completed workout of the default type with nothing else filled in
    pub fn completed_at(date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            completed: true,
            duration_minutes: None,
            exercise_count: None,
            workout_type: WorkoutType::default(),
            calories_burned: None,
            notes: None,
        }
    }

    pub fn with_duration(mut self, minutes: f64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

/// Girth measurements in centimeters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hips: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bicep: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thigh: Option<f64>,
}

impl Measurements {
    /// Present girth values with their names
    pub fn present(&self) -> Vec<(&'static str, f64)> {
        [
            ("chest", self.chest),
            ("waist", self.waist),
            ("hips", self.hips),
            ("bicep", self.bicep),
            ("thigh", self.thigh),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// One body measurement event. Superseded by later snapshots, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMetricSnapshot {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    /// Body weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
    /// Muscle mass in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_mass: Option<f64>,
    /// Height in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub measurements: Measurements,
}

// ============================================================================
// Goals
// ============================================================================

/// User-editable targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub target_weight: Option<f64>,
    pub target_body_fat: Option<f64>,
    pub target_muscle_mass: Option<f64>,
    pub weekly_workouts: Option<u32>,
    pub deadline: Option<NaiveDate>,
}

/// Partial goals update. Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalsUpdate {
    #[serde(default)]
    pub target_weight: Option<f64>,
    #[serde(default)]
    pub target_body_fat: Option<f64>,
    #[serde(default)]
    pub target_muscle_mass: Option<f64>,
    #[serde(default)]
    pub weekly_workouts: Option<u32>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

impl Goals {
    /// Shallow merge of the provided fields
    pub fn merge(&mut self, update: GoalsUpdate) {
        if let Some(v) = update.target_weight {
            self.target_weight = Some(v);
        }
        if let Some(v) = update.target_body_fat {
            self.target_body_fat = Some(v);
        }
        if let Some(v) = update.target_muscle_mass {
            self.target_muscle_mass = Some(v);
        }
        if let Some(v) = update.weekly_workouts {
            self.weekly_workouts = Some(v);
        }
        if let Some(v) = update.deadline {
            self.deadline = Some(v);
        }
    }
}

// ============================================================================
// Training profile
// ============================================================================

/// Program a user signed up for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    Rehabilitation,
    Sedentary,
    TrainingDiet,
}

impl FromStr for Program {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rehabilitation" => Ok(Program::Rehabilitation),
            "sedentary" => Ok(Program::Sedentary),
            "training_diet" => Ok(Program::TrainingDiet),
            other => Err(ProgressError::validation(format!("Unknown program '{}'", other))),
        }
    }
}

/// Per-program profile fields the progress view reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProfile {
    pub program: Program,
    pub days_per_week: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<String>,
}

// ============================================================================
// Derived state
// ============================================================================

/// Streak state. Recomputed from the log, never trusted as ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    /// High-water mark of `current_streak`; never decreases
    pub longest_streak: u32,
    pub last_activity_date: Option<DateTime<Utc>>,
    pub weekly_goal: u32,
    pub monthly_completed_days: u32,
}

impl Default for StreakState {
    fn default() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            monthly_completed_days: 0,
        }
    }
}

/// Aggregated workout counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_workouts: u32,
    pub total_minutes: f64,
    /// Absent when no completed workout has a duration
    pub average_workout_duration: Option<f64>,
    pub workouts_this_week: u32,
    pub workouts_this_month: u32,
    pub total_calories: f64,
    pub weekly_goal: u32,
    /// Share of the weekly goal reached, capped at 100
    pub weekly_goal_percent: u32,
}

impl Stats {
    pub fn empty(weekly_goal: u32) -> Self {
        Self {
            total_workouts: 0,
            total_minutes: 0.0,
            average_workout_duration: None,
            workouts_this_week: 0,
            workouts_this_month: 0,
            total_calories: 0.0,
            weekly_goal,
            weekly_goal_percent: 0,
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Everything tracked for one user, stored as a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressAggregate {
    pub user_id: Uuid,
    #[serde(default)]
    pub workouts: Vec<ActivityRecord>,
    #[serde(default)]
    pub body_metrics: Vec<BodyMetricSnapshot>,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub streak: StreakState,
    pub stats: Stats,
    /// Optimistic concurrency token; 0 means never persisted
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressAggregate {
    /// Fresh aggregate with default goals and zero streaks
    pub fn new(user_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            workouts: Vec::new(),
            body_metrics: Vec::new(),
            goals: Goals::default(),
            streak: StreakState::default(),
            stats: Stats::empty(DEFAULT_WEEKLY_GOAL),
            version: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// Append a workout to the log
    pub fn append_workout(&mut self, record: ActivityRecord) -> &ActivityRecord {
        self.workouts.push(record);
        &self.workouts[self.workouts.len() - 1]
    }

    /// Remove a workout by id, returning it if it existed
    pub fn remove_workout(&mut self, id: Uuid) -> Option<ActivityRecord> {
        let index = self.workouts.iter().position(|w| w.id == id)?;
        Some(self.workouts.remove(index))
    }

    /// Append a body-metric snapshot
    pub fn append_body_metrics(&mut self, snapshot: BodyMetricSnapshot) -> &BodyMetricSnapshot {
        self.body_metrics.push(snapshot);
        &self.body_metrics[self.body_metrics.len() - 1]
    }

    /// Apply a partial goals update. A new weekly target also becomes the
    /// streak's weekly goal.
    pub fn update_goals(&mut self, update: GoalsUpdate) -> &Goals {
        if let Some(weekly) = update.weekly_workouts {
            self.streak.weekly_goal = weekly;
        }
        self.goals.merge(update);
        &self.goals
    }

    /// Newest workouts first, at most `limit`
    pub fn recent_workouts(&self, limit: usize) -> Vec<&ActivityRecord> {
        let mut sorted: Vec<&ActivityRecord> = self.workouts.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.truncate(limit);
        sorted
    }

    /// Newest snapshots first, at most `limit`
    pub fn recent_metrics(&self, limit: usize) -> Vec<&BodyMetricSnapshot> {
        let mut sorted: Vec<&BodyMetricSnapshot> = self.body_metrics.iter().collect();
        sorted.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        sorted.truncate(limit);
        sorted
    }

    /// Most recent snapshot by `recorded_at`
    pub fn latest_metrics(&self) -> Option<&BodyMetricSnapshot> {
        self.body_metrics.iter().max_by_key(|m| m.recorded_at)
    }

    /// Recompute stats and streak from the full workout log
    pub fn recompute(&mut self, now: DateTime<FixedOffset>) {
        self.streak = streak::compute_streak(&self.workouts, &self.streak, now);
        self.stats = stats::compute_stats(&self.workouts, self.streak.weekly_goal, now);
    }
}
