//! Progress service
//!
//! Orchestrates the per-user progress aggregate:
//! - lazy creation with default goals and zero streaks
//! - workout, body-metric and goal mutations as read-modify-write
//! - synchronous streak and stats recomputation after workout changes
//! - the dashboard view (stats, streak, charts, schedule, BMI)
//!
//! Payloads are validated before anything is loaded, and a mutation is only
//! reported as successful once the store has accepted the write.

use crate::config::ProgressConfig;
use crate::repositories::{ProfileStore, ProgressStore};
use chrono::{DateTime, FixedOffset, Utc};
use fitness_progress_shared::charts::{metric_series, workout_frequency, MetricField};
use fitness_progress_shared::health_metrics::bmi_for_display;
use fitness_progress_shared::schedule::week_schedule;
use fitness_progress_shared::validation;
use fitness_progress_shared::{
    ActivityRecord, BodyMetricSnapshot, ChartData, Goals, GoalsUpdate, LogBodyMetricsRequest,
    LogWorkoutRequest, ProgressAggregate, ProgressError, ProgressMutation,
    ProgressMutationResponse, ProgressResponse, ProgressResult,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Progress facade over the injected stores
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
    profiles: Arc<dyn ProfileStore>,
    settings: ProgressConfig,
    clock: Clock,
}

impl ProgressService {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        profiles: Arc<dyn ProfileStore>,
        settings: ProgressConfig,
    ) -> Self {
        Self {
            store,
            profiles,
            settings,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current time in the configured day-boundary offset
    fn now(&self) -> DateTime<FixedOffset> {
        (self.clock)().with_timezone(&self.settings.offset())
    }

    /// Verify the backing store is reachable
    pub async fn health_check(&self) -> ProgressResult<()> {
        self.store.health_check().await
    }

    /// Existing aggregate, or a freshly persisted one with defaults
    pub async fn get_or_create(&self, user_id: Uuid) -> ProgressResult<ProgressAggregate> {
        if let Some(aggregate) = self.store.load(user_id).await? {
            return Ok(aggregate);
        }

        let aggregate = ProgressAggregate::new(user_id, (self.clock)());
        let saved = self.store.save(&aggregate).await?;
        info!(user_id = %user_id, "Created progress record");
        Ok(saved)
    }

    /// Existing aggregate; `NotFound` if none was ever created
    pub async fn get(&self, user_id: Uuid) -> ProgressResult<ProgressAggregate> {
        self.store
            .load(user_id)
            .await?
            .ok_or(ProgressError::NotFound(user_id))
    }

    /// Dashboard view, recomputed from the full log
    #[instrument(skip(self))]
    pub async fn get_progress(&self, user_id: Uuid, create: bool) -> ProgressResult<ProgressResponse> {
        let mut aggregate = if create {
            self.get_or_create(user_id).await?
        } else {
            self.get(user_id).await?
        };
        let profile = self.profiles.training_profile(user_id).await?;

        let now = self.now();
        aggregate.recompute(now);

        let window = self.settings.chart_window_days;
        let chart_data = ChartData {
            weight: metric_series(&aggregate.body_metrics, MetricField::Weight, window, now),
            body_fat: metric_series(&aggregate.body_metrics, MetricField::BodyFat, window, now),
            muscle_mass: metric_series(&aggregate.body_metrics, MetricField::MuscleMass, window, now),
            workout_frequency: workout_frequency(&aggregate.workouts, self.settings.heatmap_days, now),
        };

        let schedule = profile
            .as_ref()
            .and_then(|p| p.days_per_week)
            .map(|days| week_schedule(&aggregate.workouts, days, now));

        let latest = aggregate.latest_metrics();
        let weight = latest
            .and_then(|m| m.weight)
            .or_else(|| profile.as_ref().and_then(|p| p.weight_kg));
        let height = latest
            .and_then(|m| m.height)
            .or_else(|| profile.as_ref().and_then(|p| p.height_cm));

        debug!(
            current_streak = aggregate.streak.current_streak,
            workouts_this_week = aggregate.stats.workouts_this_week,
            "Progress computed"
        );

        Ok(ProgressResponse {
            recent_metrics: aggregate
                .recent_metrics(self.settings.recent_metrics_limit)
                .into_iter()
                .cloned()
                .collect(),
            recent_workouts: aggregate
                .recent_workouts(self.settings.recent_workouts_limit)
                .into_iter()
                .cloned()
                .collect(),
            bmi: bmi_for_display(weight, height),
            stats: aggregate.stats,
            streak_data: aggregate.streak,
            goals: aggregate.goals,
            chart_data,
            schedule,
        })
    }

    /// Append a workout, recompute streak and stats, persist
    #[instrument(skip(self, request))]
    pub async fn add_workout(
        &self,
        user_id: Uuid,
        request: LogWorkoutRequest,
    ) -> ProgressResult<ActivityRecord> {
        let workout_type = validation::validate_workout(&request).map_err(ProgressError::Validation)?;
        let now = self.now();

        let record = ActivityRecord {
            id: Uuid::new_v4(),
            date: request.date.unwrap_or_else(|| now.with_timezone(&Utc)),
            completed: request.completed,
            duration_minutes: request.duration_minutes,
            exercise_count: request.exercise_count,
            workout_type,
            calories_burned: request.calories_burned,
            notes: request.notes,
        };

        let mut aggregate = self.get_or_create(user_id).await?;
        aggregate.append_workout(record.clone());
        aggregate.recompute(now);
        let saved = self.persist(aggregate).await?;

        info!(
            workout_id = %record.id,
            workout_type = %record.workout_type,
            current_streak = saved.streak.current_streak,
            "Workout logged"
        );
        Ok(record)
    }

    /// Remove a workout and recompute; `false` if it did not exist
    #[instrument(skip(self))]
    pub async fn remove_workout(&self, user_id: Uuid, workout_id: Uuid) -> ProgressResult<bool> {
        let Some(mut aggregate) = self.store.load(user_id).await? else {
            return Ok(false);
        };
        if aggregate.remove_workout(workout_id).is_none() {
            return Ok(false);
        }

        aggregate.recompute(self.now());
        self.persist(aggregate).await?;
        info!(workout_id = %workout_id, "Workout removed");
        Ok(true)
    }

    /// Append a body-metric snapshot; streak and stats are left alone
    #[instrument(skip(self, request))]
    pub async fn add_body_metrics(
        &self,
        user_id: Uuid,
        request: LogBodyMetricsRequest,
    ) -> ProgressResult<BodyMetricSnapshot> {
        validation::validate_body_metrics(&request).map_err(ProgressError::Validation)?;

        let snapshot = BodyMetricSnapshot {
            id: Uuid::new_v4(),
            recorded_at: request.recorded_at.unwrap_or_else(|| (self.clock)()),
            weight: request.weight,
            body_fat_percent: request.body_fat_percent,
            muscle_mass: request.muscle_mass,
            height: request.height,
            measurements: request.measurements,
        };

        let mut aggregate = self.get_or_create(user_id).await?;
        aggregate.append_body_metrics(snapshot.clone());
        self.persist(aggregate).await?;

        info!(snapshot_id = %snapshot.id, "Body metrics logged");
        Ok(snapshot)
    }

    /// Merge the provided goal fields; any subset may be overwritten
    #[instrument(skip(self, update))]
    pub async fn update_goals(&self, user_id: Uuid, update: GoalsUpdate) -> ProgressResult<Goals> {
        let weekly_changed = update.weekly_workouts.is_some();
        let mut aggregate = self.get_or_create(user_id).await?;
        aggregate.update_goals(update);
        if weekly_changed {
            aggregate.recompute(self.now());
        }

        let saved = self.persist(aggregate).await?;
        info!("Goals updated");
        Ok(saved.goals)
    }

    /// Dispatch a tagged mutation
    pub async fn apply(
        &self,
        user_id: Uuid,
        mutation: ProgressMutation,
    ) -> ProgressResult<ProgressMutationResponse> {
        match mutation {
            ProgressMutation::Workout(request) => self
                .add_workout(user_id, request)
                .await
                .map(ProgressMutationResponse::Workout),
            ProgressMutation::Metrics(request) => self
                .add_body_metrics(user_id, request)
                .await
                .map(ProgressMutationResponse::Metrics),
            ProgressMutation::Goal(update) => self
                .update_goals(user_id, update)
                .await
                .map(ProgressMutationResponse::Goal),
        }
    }

    async fn persist(&self, mut aggregate: ProgressAggregate) -> ProgressResult<ProgressAggregate> {
        aggregate.updated_at = (self.clock)();
        self.store.save(&aggregate).await
    }
}
